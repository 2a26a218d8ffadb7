use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::dns::DNSPacket;
use crate::dns::header::DNSHeader;
use crate::dns::question::{DNSQuestion, labels_from_name};
use crate::error::CodecError;

use super::address_book::AddressBook;
use super::coerce::{prop_to_string, prop_to_u16};
use super::fingerprint::{Fingerprint, FingerprintBuilder};
use super::record::RecordCodec;
use super::value::FieldMap;

/// Header flags and codes as a script sees them.
///
/// `Opcode` is 4 bits and `Rcode` 12 bits (4 in the header, 8 in OPT) on the
/// wire. Higher bits a script sets are dropped when the header is rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScriptHeader {
    pub authenticated_data: bool,
    pub authoritative: bool,
    pub checking_disabled: bool,
    pub id: u16,
    pub opcode: u8,
    pub rcode: u16,
    pub recursion_available: bool,
    pub recursion_desired: bool,
    pub response: bool,
    pub truncated: bool,
    pub zero: bool,
}

impl From<&DNSHeader> for ScriptHeader {
    fn from(header: &DNSHeader) -> Self {
        ScriptHeader {
            authenticated_data: header.ad,
            authoritative: header.aa,
            checking_disabled: header.cd,
            id: header.id,
            opcode: header.opcode,
            rcode: header.rcode,
            recursion_available: header.ra,
            recursion_desired: header.rd,
            response: header.qr,
            truncated: header.tc,
            zero: header.z,
        }
    }
}

const OPCODE_MASK: u8 = 0x0F;
const RCODE_MASK: u16 = 0x0FFF;

impl From<&ScriptHeader> for DNSHeader {
    fn from(header: &ScriptHeader) -> Self {
        DNSHeader {
            id: header.id,
            qr: header.response,
            opcode: header.opcode & OPCODE_MASK,
            aa: header.authoritative,
            tc: header.truncated,
            rd: header.recursion_desired,
            ra: header.recursion_available,
            z: header.zero,
            ad: header.authenticated_data,
            cd: header.checking_disabled,
            rcode: header.rcode & RCODE_MASK,
        }
    }
}

/// Who sent the message. Resolved once when the query is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptClient {
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "MAC")]
    pub mac: String,
    #[serde(rename = "Alias")]
    pub alias: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Answer,
    Authority,
    Additional,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Answer => write!(f, "answers"),
            Section::Authority => write!(f, "nameservers"),
            Section::Additional => write!(f, "extras"),
        }
    }
}

/// A record that was dropped during conversion. `index` is its position in
/// the source section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub section: Section,
    pub index: usize,
    pub error: CodecError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub failures: Vec<RecordFailure>,
}

impl ConversionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures_in(&self, section: Section) -> impl Iterator<Item = &RecordFailure> {
        self.failures.iter().filter(move |f| f.section == section)
    }
}

/// Script-facing view of a DNS message.
///
/// Built from a [`DNSPacket`], edited in place by a script, and turned back
/// into a fresh packet with [`ScriptQuery::to_packet`]. The view and the
/// packet it came from are independent once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScriptQuery {
    pub answers: Vec<FieldMap>,
    pub client: ScriptClient,
    pub compress: bool,
    pub extras: Vec<FieldMap>,
    pub header: ScriptHeader,
    pub nameservers: Vec<FieldMap>,
    pub questions: Vec<FieldMap>,

    #[serde(skip)]
    ref_hash: Fingerprint,
}

impl ScriptQuery {
    /// Builds the view of `packet` for a message sent by `client_ip`.
    /// Records the codec cannot encode are logged and left out.
    pub fn from_packet<A, C>(
        packet: &DNSPacket,
        client_ip: &str,
        address_book: &A,
        codec: &C,
    ) -> Self
    where
        A: AddressBook + ?Sized,
        C: RecordCodec + ?Sized,
    {
        Self::from_packet_with_report(packet, client_ip, address_book, codec).0
    }

    pub fn from_packet_with_report<A, C>(
        packet: &DNSPacket,
        client_ip: &str,
        address_book: &A,
        codec: &C,
    ) -> (Self, ConversionReport)
    where
        A: AddressBook + ?Sized,
        C: RecordCodec + ?Sized,
    {
        let mut report = ConversionReport::default();

        let answers = convert_section(Section::Answer, &packet.answers, &mut report, |rr| {
            codec.encode(rr)
        });
        let extras = convert_section(Section::Additional, &packet.resources, &mut report, |rr| {
            codec.encode(rr)
        });
        let nameservers =
            convert_section(Section::Authority, &packet.authorities, &mut report, |rr| {
                codec.encode(rr)
            });

        let questions = packet.questions.iter().map(question_to_fields).collect();

        let endpoint = address_book.lookup_by_ip(client_ip).unwrap_or_default();
        let client = ScriptClient {
            ip: client_ip.to_string(),
            mac: endpoint.hw_address,
            alias: endpoint.alias,
        };

        let mut query = ScriptQuery {
            answers,
            client,
            compress: packet.compress,
            extras,
            header: ScriptHeader::from(&packet.header),
            nameservers,
            questions,
            ref_hash: Fingerprint::default(),
        };
        query.update_hash();

        debug!(
            id = query.header.id,
            client = %query.client.ip,
            questions = query.questions.len(),
            records = query.answers.len() + query.nameservers.len() + query.extras.len(),
            dropped = report.failures.len(),
            "Built script view of DNS message"
        );

        (query, report)
    }

    /// Rebuilds a wire message from the current state of the view. Records
    /// the codec rejects are logged and left out; question fields of the
    /// wrong shape fall back to empty names and zero codes.
    pub fn to_packet<C: RecordCodec + ?Sized>(&self, codec: &C) -> DNSPacket {
        self.to_packet_with_report(codec).0
    }

    pub fn to_packet_with_report<C: RecordCodec + ?Sized>(
        &self,
        codec: &C,
    ) -> (DNSPacket, ConversionReport) {
        let mut report = ConversionReport::default();

        let answers = convert_section(Section::Answer, &self.answers, &mut report, |fields| {
            codec.decode(fields)
        });
        let resources = convert_section(Section::Additional, &self.extras, &mut report, |fields| {
            codec.decode(fields)
        });
        let authorities =
            convert_section(Section::Authority, &self.nameservers, &mut report, |fields| {
                codec.decode(fields)
            });

        let questions = self.questions.iter().map(question_from_fields).collect();

        let packet = DNSPacket {
            header: DNSHeader::from(&self.header),
            questions,
            answers,
            authorities,
            resources,
            compress: self.compress,
        };

        debug!(
            id = packet.header.id,
            questions = packet.questions.len(),
            records = packet.record_count(),
            dropped = report.failures.len(),
            "Rebuilt DNS message from script view"
        );

        (packet, report)
    }

    /// Current digest of the script-visible state. Does not touch the
    /// stored baseline.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut builder = FingerprintBuilder::new();
        builder
            .json(&self.answers)
            .text(&self.client.ip)
            .flag(self.compress)
            .json(&self.extras)
            .json(&self.header)
            .json(&self.nameservers)
            .json(&self.questions);
        builder.finish()
    }

    /// Stores the current digest as the baseline for [`Self::was_modified`].
    pub fn update_hash(&mut self) {
        self.ref_hash = self.fingerprint();
        trace!(fingerprint = %self.ref_hash, "Stored script view baseline");
    }

    pub fn was_modified(&self) -> bool {
        self.fingerprint() != self.ref_hash
    }

    pub fn ref_hash(&self) -> &Fingerprint {
        &self.ref_hash
    }

    /// Takes over every script-visible field of `edited`, as handed back by
    /// a script, while keeping the baseline of `self`.
    pub fn apply_script_state(&mut self, edited: ScriptQuery) {
        self.answers = edited.answers;
        self.client = edited.client;
        self.compress = edited.compress;
        self.extras = edited.extras;
        self.header = edited.header;
        self.nameservers = edited.nameservers;
        self.questions = edited.questions;
    }
}

fn question_to_fields(question: &DNSQuestion) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("Name".to_string(), question.name().into());
    fields.insert("Qtype".to_string(), u16::from(question.qtype).into());
    fields.insert("Qclass".to_string(), u16::from(question.qclass).into());
    fields
}

fn question_from_fields(fields: &FieldMap) -> DNSQuestion {
    DNSQuestion {
        labels: labels_from_name(&prop_to_string(fields, "Name")),
        qtype: prop_to_u16(fields, "Qtype").into(),
        qclass: prop_to_u16(fields, "Qclass").into(),
    }
}

fn convert_section<S, T, F>(
    section: Section,
    items: &[S],
    report: &mut ConversionReport,
    mut convert: F,
) -> Vec<T>
where
    F: FnMut(&S) -> Result<T, CodecError>,
{
    let mut converted = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match convert(item) {
            Ok(value) => converted.push(value),
            Err(e) => {
                error!(section = %section, index, error = %e, "Failed to convert resource record");
                report.failures.push(RecordFailure {
                    section,
                    index,
                    error: e,
                });
            }
        }
    }
    converted
}
