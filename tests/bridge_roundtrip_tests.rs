mod common;

use common::{
    CLIENT_IP, LogCapture, create_address_book, create_test_query, create_test_query_with_id,
    create_test_response, script_view,
};
use dnsbridge::DNSPacket;
use dnsbridge::dns::enums::{DNSResourceClass, DNSResourceType};
use dnsbridge::dns::question::DNSQuestion;
use dnsbridge::dns::resource::{DNSResource, DNSResourceData};
use dnsbridge::error::CodecError;
use dnsbridge::script::{
    DefaultRecordCodec, FieldValue, NoAddressBook, RecordCodec, ScriptQuery, Section,
};

#[test]
fn test_unmodified_response_round_trips() {
    let packet = create_test_response();
    let (query, report) = ScriptQuery::from_packet_with_report(
        &packet,
        CLIENT_IP,
        &NoAddressBook,
        &DefaultRecordCodec,
    );
    assert!(report.is_clean());
    assert!(!query.was_modified());

    let (rebuilt, report) = query.to_packet_with_report(&DefaultRecordCodec);
    assert!(report.is_clean());
    assert_eq!(rebuilt, packet);
}

#[test]
fn test_sections_keep_order_and_size() {
    let packet = create_test_response();
    let query = script_view(&packet);

    assert_eq!(query.answers.len(), packet.answers.len());
    assert_eq!(query.nameservers.len(), packet.authorities.len());
    assert_eq!(query.extras.len(), packet.resources.len());
    assert_eq!(query.questions.len(), packet.questions.len());

    let answer_types: Vec<_> = query
        .answers
        .iter()
        .map(|rr| rr["Header"].as_map().unwrap()["Rrtype"].clone())
        .collect();
    let expected: Vec<_> = packet
        .answers
        .iter()
        .map(|rr| FieldValue::Int(u16::from(rr.rtype).into()))
        .collect();
    assert_eq!(answer_types, expected);
}

#[test]
fn test_header_and_compress_are_copied() {
    let packet = create_test_response();
    let query = script_view(&packet);

    assert_eq!(query.header.id, 0xBEEF);
    assert!(query.header.response);
    assert!(query.header.authoritative);
    assert!(!query.header.truncated);
    assert!(query.header.recursion_desired);
    assert!(query.header.recursion_available);
    assert!(!query.header.zero);
    assert!(query.header.authenticated_data);
    assert!(!query.header.checking_disabled);
    assert_eq!(query.header.opcode, 0);
    assert_eq!(query.header.rcode, 0);
    assert!(query.compress);
}

#[test]
fn test_questions_carry_exactly_name_type_class() {
    let packet = create_test_query("example.com.", DNSResourceType::AAAA);
    let query = script_view(&packet);

    let question = &query.questions[0];
    assert_eq!(question.len(), 3);
    assert_eq!(question["Name"], FieldValue::Str("example.com.".to_string()));
    assert_eq!(question["Qtype"], FieldValue::Int(28));
    assert_eq!(question["Qclass"], FieldValue::Int(1));
}

#[test]
fn test_client_resolved_from_address_book() {
    let packet = create_test_query("example.com.", DNSResourceType::A);
    let book = create_address_book();

    let known = ScriptQuery::from_packet(&packet, CLIENT_IP, &book, &DefaultRecordCodec);
    assert_eq!(known.client.ip, CLIENT_IP);
    assert_eq!(known.client.mac, "aa:bb:cc:dd:ee:ff");
    assert_eq!(known.client.alias, "laptop");

    let stranger = ScriptQuery::from_packet(&packet, "10.9.8.7", &book, &DefaultRecordCodec);
    assert_eq!(stranger.client.ip, "10.9.8.7");
    assert_eq!(stranger.client.mac, "");
    assert_eq!(stranger.client.alias, "");
}

#[test]
fn test_recursion_desired_flip() {
    let packet = create_test_query_with_id(42, "example.com.", DNSResourceType::A);
    let mut query = script_view(&packet);
    assert!(!query.was_modified());

    query.header.recursion_desired = false;
    assert!(query.was_modified());

    let rebuilt = query.to_packet(&DefaultRecordCodec);
    assert!(!rebuilt.header.rd);
    assert_eq!(rebuilt.header.id, 42);
    assert_eq!(rebuilt.questions, packet.questions);
    assert!(rebuilt.answers.is_empty());
}

#[test]
fn test_view_is_detached_from_source_packet() {
    let packet = create_test_response();
    let original = packet.clone();
    let mut query = script_view(&packet);

    query.answers.clear();
    query.header.id = 1;

    assert_eq!(packet, original);
    let rebuilt = query.to_packet(&DefaultRecordCodec);
    assert!(rebuilt.answers.is_empty());
    assert_eq!(rebuilt.header.id, 1);
}

#[test]
fn test_encode_failure_drops_only_that_record() {
    let mut packet = create_test_response();
    // MX data under an A type cannot be represented
    let mut broken = DNSResource::new(
        "broken.example.com.",
        60,
        DNSResourceData::MX(5, "mx.example.com.".into()),
    );
    broken.rtype = DNSResourceType::A;
    packet.answers.insert(1, broken);

    let (query, report) = ScriptQuery::from_packet_with_report(
        &packet,
        CLIENT_IP,
        &NoAddressBook,
        &DefaultRecordCodec,
    );

    assert_eq!(query.answers.len(), packet.answers.len() - 1);
    assert_eq!(query.nameservers.len(), packet.authorities.len());
    assert_eq!(query.extras.len(), packet.resources.len());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].section, Section::Answer);
    assert_eq!(report.failures[0].index, 1);
    assert!(matches!(
        report.failures[0].error,
        CodecError::TypeMismatch { rtype: 1, kind: "MX" }
    ));
    assert!(!query.was_modified());
}

#[test]
fn test_decode_failure_isolated_to_one_answer() {
    let packet = create_test_response();
    let mut query = script_view(&packet);
    let total = query.answers.len();

    query.answers[0].insert("A".to_string(), "not-an-address".into());

    let logs = LogCapture::default();
    let (rebuilt, report) = logs.capture(tracing::Level::ERROR, || {
        query.to_packet_with_report(&DefaultRecordCodec)
    });
    let logged = logs.contents();
    assert_eq!(logged.lines().count(), 1);
    assert!(logged.contains("Failed to convert resource record"));
    assert!(logged.contains("answers"));

    assert_eq!(rebuilt.answers.len(), total - 1);
    assert_eq!(rebuilt.answers[..], packet.answers[1..]);
    assert_eq!(rebuilt.authorities, packet.authorities);
    assert_eq!(rebuilt.resources, packet.resources);
    assert_eq!(rebuilt.questions, packet.questions);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures_in(Section::Answer).count(), 1);
    assert_eq!(report.failures_in(Section::Authority).count(), 0);
    assert_eq!(report.failures_in(Section::Additional).count(), 0);
}

#[test]
fn test_script_can_inject_records() {
    let packet = create_test_query("example.com.", DNSResourceType::A);
    let mut query = script_view(&packet);

    let injected = DNSResource::new(
        "example.com.",
        60,
        DNSResourceData::A("10.0.0.1".parse().unwrap()),
    );
    query
        .answers
        .push(DefaultRecordCodec.encode(&injected).unwrap());
    query.header.response = true;
    assert!(query.was_modified());

    let rebuilt = query.to_packet(&DefaultRecordCodec);
    assert_eq!(rebuilt.answers, vec![injected]);
    assert!(rebuilt.header.qr);
}

#[test]
fn test_malformed_injected_record_does_not_abort() {
    let packet = create_test_response();
    let mut query = script_view(&packet);

    let mut garbage = dnsbridge::script::FieldMap::new();
    garbage.insert("Header".to_string(), FieldValue::Str("nope".to_string()));
    query.extras.push(garbage);

    let (rebuilt, report) = query.to_packet_with_report(&DefaultRecordCodec);
    assert_eq!(rebuilt.resources, packet.resources);
    assert_eq!(rebuilt.answers, packet.answers);
    let failures: Vec<_> = report.failures_in(Section::Additional).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, packet.resources.len());
}

#[test]
fn test_root_and_escaped_names_round_trip() {
    let mut dotted = DNSResource::new(
        "example.",
        300,
        DNSResourceData::A("192.0.2.1".parse().unwrap()),
    );
    dotted.labels = vec!["a.b".to_string(), "example".to_string(), String::new()];

    let packet = DNSPacket {
        questions: vec![DNSQuestion::new(".", DNSResourceType::NS, DNSResourceClass::IN)],
        answers: vec![dotted],
        ..Default::default()
    };
    let query = script_view(&packet);

    assert_eq!(query.questions[0]["Name"], FieldValue::Str(".".to_string()));
    let header = query.answers[0]["Header"].as_map().unwrap();
    assert_eq!(header["Name"], FieldValue::Str(r"a\.b.example.".to_string()));

    assert!(!query.was_modified());
    assert_eq!(query.to_packet(&DefaultRecordCodec), packet);
}

#[test]
fn test_script_root_name_is_single_empty_label() {
    let packet = create_test_query("example.com.", DNSResourceType::A);
    let mut query = script_view(&packet);

    query.questions[0].insert("Name".to_string(), ".".into());
    let rebuilt = query.to_packet(&DefaultRecordCodec);
    assert_eq!(rebuilt.questions[0].labels, vec![""]);
}

#[test]
fn test_header_codes_limited_to_wire_width() {
    let packet = create_test_query("example.com.", DNSResourceType::A);
    let mut query = script_view(&packet);

    query.header.opcode = 0x1F;
    query.header.rcode = 0xF003;
    let rebuilt = query.to_packet(&DefaultRecordCodec);
    assert_eq!(rebuilt.header.opcode, 0x0F);
    assert_eq!(rebuilt.header.rcode, 0x003);
}
