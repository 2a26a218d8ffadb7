use std::net::{Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

use super::enums::{DNSResourceClass, DNSResourceType};
use super::question::{labels_from_name, name_from_labels};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DNSResource {
    pub labels: Vec<String>,
    pub rtype: DNSResourceType,
    pub rclass: DNSResourceClass,
    pub ttl: u32,
    pub rdata: DNSResourceData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoaData {
    pub mname: String,
    pub rname: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvData {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DNSResourceData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    NS(String),
    CNAME(String),
    PTR(String),
    MX(u16, String),
    SOA(SoaData),
    SRV(SrvData),
    TXT(Vec<String>),
    /// Raw RDATA of a type without structured support (RFC 3597)
    Unknown(Vec<u8>),
}

impl Default for DNSResourceData {
    fn default() -> Self {
        DNSResourceData::Unknown(Vec::new())
    }
}

impl DNSResourceData {
    /// The record type this payload belongs to, `None` for opaque payloads
    /// which may accompany any type.
    pub fn record_type(&self) -> Option<DNSResourceType> {
        match self {
            DNSResourceData::A(_) => Some(DNSResourceType::A),
            DNSResourceData::AAAA(_) => Some(DNSResourceType::AAAA),
            DNSResourceData::NS(_) => Some(DNSResourceType::NS),
            DNSResourceData::CNAME(_) => Some(DNSResourceType::CNAME),
            DNSResourceData::PTR(_) => Some(DNSResourceType::PTR),
            DNSResourceData::MX(..) => Some(DNSResourceType::MX),
            DNSResourceData::SOA(_) => Some(DNSResourceType::SOA),
            DNSResourceData::SRV(_) => Some(DNSResourceType::SRV),
            DNSResourceData::TXT(_) => Some(DNSResourceType::TXT),
            DNSResourceData::Unknown(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DNSResourceData::A(_) => "A",
            DNSResourceData::AAAA(_) => "AAAA",
            DNSResourceData::NS(_) => "NS",
            DNSResourceData::CNAME(_) => "CNAME",
            DNSResourceData::PTR(_) => "PTR",
            DNSResourceData::MX(..) => "MX",
            DNSResourceData::SOA(_) => "SOA",
            DNSResourceData::SRV(_) => "SRV",
            DNSResourceData::TXT(_) => "TXT",
            DNSResourceData::Unknown(_) => "opaque",
        }
    }
}

impl DNSResource {
    /// Builds an `IN` class record whose type follows from the payload.
    /// Opaque payloads default to type `A`; set `rtype` afterwards.
    pub fn new(name: &str, ttl: u32, rdata: DNSResourceData) -> Self {
        DNSResource {
            labels: labels_from_name(name),
            rtype: rdata.record_type().unwrap_or_default(),
            rclass: DNSResourceClass::IN,
            ttl,
            rdata,
        }
    }

    pub fn name(&self) -> String {
        name_from_labels(&self.labels)
    }
}
