//! Shared builders for the dnsbridge integration tests

#![allow(dead_code)] // Not every test file uses every builder

use std::io;
use std::sync::{Arc, Mutex};

use dnsbridge::dns::{
    DNSPacket,
    enums::{DNSResourceClass, DNSResourceType},
    header::DNSHeader,
    question::DNSQuestion,
    resource::{DNSResource, DNSResourceData, SoaData, SrvData},
};
use dnsbridge::script::{
    DefaultRecordCodec, Endpoint, NoAddressBook, ScriptQuery, StaticAddressBook,
};

use tracing_subscriber::fmt::MakeWriter;

pub const CLIENT_IP: &str = "192.168.1.20";

/// Create a basic recursive query for `domain`
pub fn create_test_query(domain: &str, qtype: DNSResourceType) -> DNSPacket {
    create_test_query_with_id(1234, domain, qtype)
}

pub fn create_test_query_with_id(id: u16, domain: &str, qtype: DNSResourceType) -> DNSPacket {
    DNSPacket {
        header: DNSHeader {
            id,
            rd: true,
            ..Default::default()
        },
        questions: vec![DNSQuestion::new(domain, qtype, DNSResourceClass::IN)],
        ..Default::default()
    }
}

/// A response touching every record type the default codec knows, plus
/// opaque payloads and an OPT pseudo-record
pub fn create_test_response() -> DNSPacket {
    let mut opaque_a =
        DNSResource::new("raw.example.com.", 30, DNSResourceData::Unknown(vec![10, 0, 0, 1]));
    opaque_a.rtype = DNSResourceType::A;

    let mut unknown = DNSResource::new(
        "unknown.example.com.",
        120,
        DNSResourceData::Unknown(vec![0xde, 0xad, 0xbe, 0xef]),
    );
    unknown.rtype = DNSResourceType::from(65280);

    let mut opt = DNSResource::new(".", 0, DNSResourceData::Unknown(vec![]));
    opt.rtype = DNSResourceType::OPT;
    opt.rclass = DNSResourceClass::from(1232);

    let mut chaos_txt = DNSResource::new(
        "version.bind.",
        0,
        DNSResourceData::TXT(vec!["dnsbridge".to_string()]),
    );
    chaos_txt.rclass = DNSResourceClass::CH;

    DNSPacket {
        header: DNSHeader {
            id: 0xBEEF,
            qr: true,
            opcode: 0,
            aa: true,
            tc: false,
            rd: true,
            ra: true,
            z: false,
            ad: true,
            cd: false,
            rcode: 0,
        },
        questions: vec![
            DNSQuestion::new("example.com.", DNSResourceType::A, DNSResourceClass::IN),
            DNSQuestion::new(
                "example.com.",
                DNSResourceType::Unknown(65280),
                DNSResourceClass::IN,
            ),
        ],
        answers: vec![
            DNSResource::new(
                "example.com.",
                300,
                DNSResourceData::A("93.184.216.34".parse().unwrap()),
            ),
            DNSResource::new(
                "example.com.",
                300,
                DNSResourceData::AAAA("2606:2800:220:1::248".parse().unwrap()),
            ),
            DNSResource::new(
                "www.example.com.",
                60,
                DNSResourceData::CNAME("example.com.".to_string()),
            ),
            DNSResource::new(
                "example.com.",
                3600,
                DNSResourceData::MX(10, "mail.example.com.".to_string()),
            ),
            DNSResource::new(
                "34.216.184.93.in-addr.arpa.",
                86400,
                DNSResourceData::PTR("example.com.".to_string()),
            ),
            DNSResource::new(
                "_sip._udp.example.com.",
                600,
                DNSResourceData::SRV(SrvData {
                    priority: 10,
                    weight: 60,
                    port: 5060,
                    target: "sip.example.com.".to_string(),
                }),
            ),
            DNSResource::new(
                "example.com.",
                300,
                DNSResourceData::TXT(vec!["v=spf1 -all".to_string(), String::new()]),
            ),
            chaos_txt,
            opaque_a,
            unknown,
        ],
        authorities: vec![
            DNSResource::new(
                "example.com.",
                86400,
                DNSResourceData::NS("a.iana-servers.net.".to_string()),
            ),
            DNSResource::new(
                "example.com.",
                3600,
                DNSResourceData::SOA(SoaData {
                    mname: "ns.icann.org.".to_string(),
                    rname: "noc.dns.icann.org.".to_string(),
                    serial: 2024081501,
                    refresh: 7200,
                    retry: 3600,
                    expire: 1209600,
                    minimum: 3600,
                }),
            ),
        ],
        resources: vec![
            DNSResource::new(
                "mail.example.com.",
                300,
                DNSResourceData::A("93.184.216.35".parse().unwrap()),
            ),
            opt,
        ],
        compress: true,
    }
}

pub fn create_address_book() -> StaticAddressBook {
    let mut book = StaticAddressBook::new();
    book.insert(
        CLIENT_IP.parse().unwrap(),
        Endpoint {
            hw_address: "aa:bb:cc:dd:ee:ff".to_string(),
            alias: "laptop".to_string(),
        },
    );
    book
}

/// Script view of `packet` with no address book behind it
pub fn script_view(packet: &DNSPacket) -> ScriptQuery {
    ScriptQuery::from_packet(packet, CLIENT_IP, &NoAddressBook, &DefaultRecordCodec)
}

/// Collects formatted log output so tests can count emitted events
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Run `f` with every event at `level` or above written into this capture
    pub fn capture<T>(&self, level: tracing::Level, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(level)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
