use std::net::{Ipv4Addr, Ipv6Addr};

use crate::dns::enums::{DNSResourceClass, DNSResourceType};
use crate::dns::question::labels_from_name;
use crate::dns::resource::{DNSResource, DNSResourceData, SoaData, SrvData};
use crate::error::CodecError;

use super::coerce::{as_str, as_u16, as_u32};
use super::value::{FieldMap, FieldValue};

/// Converts a single resource record to and from its script-facing field
/// mapping.
pub trait RecordCodec {
    fn encode(&self, record: &DNSResource) -> Result<FieldMap, CodecError>;
    fn decode(&self, fields: &FieldMap) -> Result<DNSResource, CodecError>;
}

/// Field layout:
///
/// ```text
/// Header  { Name, Rrtype, Class, Ttl }
/// A       { A }                    AAAA  { AAAA }
/// CNAME   { Target }               NS    { Ns }
/// PTR     { Ptr }                  MX    { Preference, Mx }
/// SRV     { Priority, Weight, Port, Target }
/// SOA     { Ns, Mbox, Serial, Refresh, Retry, Expire, Minttl }
/// TXT     { Txt: [string] }
/// other   { Rdata: hex }
/// ```
///
/// Decoding is strict: a missing or mistyped field fails the record.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRecordCodec;

impl RecordCodec for DefaultRecordCodec {
    fn encode(&self, record: &DNSResource) -> Result<FieldMap, CodecError> {
        if let Some(expected) = record.rdata.record_type() {
            if expected != record.rtype {
                return Err(CodecError::TypeMismatch {
                    rtype: record.rtype.into(),
                    kind: record.rdata.kind(),
                });
            }
        }

        let mut header = FieldMap::new();
        header.insert("Name".to_string(), record.name().into());
        header.insert("Rrtype".to_string(), u16::from(record.rtype).into());
        header.insert("Class".to_string(), u16::from(record.rclass).into());
        header.insert("Ttl".to_string(), record.ttl.into());

        let mut fields = FieldMap::new();
        fields.insert("Header".to_string(), FieldValue::Map(header));

        match &record.rdata {
            DNSResourceData::A(addr) => {
                fields.insert("A".to_string(), addr.to_string().into());
            }
            DNSResourceData::AAAA(addr) => {
                fields.insert("AAAA".to_string(), addr.to_string().into());
            }
            DNSResourceData::CNAME(target) => {
                fields.insert("Target".to_string(), target.as_str().into());
            }
            DNSResourceData::NS(ns) => {
                fields.insert("Ns".to_string(), ns.as_str().into());
            }
            DNSResourceData::PTR(ptr) => {
                fields.insert("Ptr".to_string(), ptr.as_str().into());
            }
            DNSResourceData::MX(preference, exchange) => {
                fields.insert("Preference".to_string(), (*preference).into());
                fields.insert("Mx".to_string(), exchange.as_str().into());
            }
            DNSResourceData::SOA(soa) => {
                fields.insert("Ns".to_string(), soa.mname.as_str().into());
                fields.insert("Mbox".to_string(), soa.rname.as_str().into());
                fields.insert("Serial".to_string(), soa.serial.into());
                fields.insert("Refresh".to_string(), soa.refresh.into());
                fields.insert("Retry".to_string(), soa.retry.into());
                fields.insert("Expire".to_string(), soa.expire.into());
                fields.insert("Minttl".to_string(), soa.minimum.into());
            }
            DNSResourceData::SRV(srv) => {
                fields.insert("Priority".to_string(), srv.priority.into());
                fields.insert("Weight".to_string(), srv.weight.into());
                fields.insert("Port".to_string(), srv.port.into());
                fields.insert("Target".to_string(), srv.target.as_str().into());
            }
            DNSResourceData::TXT(parts) => {
                let parts = parts.iter().map(|p| p.as_str().into()).collect();
                fields.insert("Txt".to_string(), FieldValue::List(parts));
            }
            DNSResourceData::Unknown(raw) => {
                fields.insert("Rdata".to_string(), hex::encode(raw).into());
            }
        }

        Ok(fields)
    }

    fn decode(&self, fields: &FieldMap) -> Result<DNSResource, CodecError> {
        let header = field(fields, "Header")?
            .as_map()
            .ok_or_else(|| CodecError::invalid("Header", "expected a mapping"))?;

        let name = string_field(header, "Name")?;
        let rtype = DNSResourceType::from(u16_field(header, "Rrtype")?);
        let rclass = DNSResourceClass::from(u16_field(header, "Class")?);
        let ttl = u32_field(header, "Ttl")?;

        // An opaque payload wins over the type so that records of any type
        // encoded as raw RDATA come back unchanged.
        let rdata = if fields.contains_key("Rdata") {
            let raw = string_field(fields, "Rdata")?;
            let bytes =
                hex::decode(raw).map_err(|e| CodecError::invalid("Rdata", e.to_string()))?;
            DNSResourceData::Unknown(bytes)
        } else {
            decode_rdata(rtype, fields)?
        };

        Ok(DNSResource {
            labels: labels_from_name(&name),
            rtype,
            rclass,
            ttl,
            rdata,
        })
    }
}

fn decode_rdata(
    rtype: DNSResourceType,
    fields: &FieldMap,
) -> Result<DNSResourceData, CodecError> {
    let rdata = match rtype {
        DNSResourceType::A => {
            let addr = string_field(fields, "A")?;
            let addr: Ipv4Addr = addr
                .parse()
                .map_err(|_| CodecError::invalid("A", format!("not an IPv4 address: {addr}")))?;
            DNSResourceData::A(addr)
        }
        DNSResourceType::AAAA => {
            let addr = string_field(fields, "AAAA")?;
            let addr: Ipv6Addr = addr.parse().map_err(|_| {
                CodecError::invalid("AAAA", format!("not an IPv6 address: {addr}"))
            })?;
            DNSResourceData::AAAA(addr)
        }
        DNSResourceType::CNAME => DNSResourceData::CNAME(string_field(fields, "Target")?),
        DNSResourceType::NS => DNSResourceData::NS(string_field(fields, "Ns")?),
        DNSResourceType::PTR => DNSResourceData::PTR(string_field(fields, "Ptr")?),
        DNSResourceType::MX => DNSResourceData::MX(
            u16_field(fields, "Preference")?,
            string_field(fields, "Mx")?,
        ),
        DNSResourceType::SOA => DNSResourceData::SOA(SoaData {
            mname: string_field(fields, "Ns")?,
            rname: string_field(fields, "Mbox")?,
            serial: u32_field(fields, "Serial")?,
            refresh: u32_field(fields, "Refresh")?,
            retry: u32_field(fields, "Retry")?,
            expire: u32_field(fields, "Expire")?,
            minimum: u32_field(fields, "Minttl")?,
        }),
        DNSResourceType::SRV => DNSResourceData::SRV(SrvData {
            priority: u16_field(fields, "Priority")?,
            weight: u16_field(fields, "Weight")?,
            port: u16_field(fields, "Port")?,
            target: string_field(fields, "Target")?,
        }),
        DNSResourceType::TXT => {
            let parts = field(fields, "Txt")?
                .as_list()
                .ok_or_else(|| CodecError::invalid("Txt", "expected a list of strings"))?;
            let parts = parts
                .iter()
                .map(|p| {
                    as_str(p).map(str::to_string).ok_or_else(|| {
                        CodecError::invalid("Txt", format!("{} entry", p.type_name()))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            DNSResourceData::TXT(parts)
        }
        _ => return Err(CodecError::MissingField("Rdata".to_string())),
    };

    Ok(rdata)
}

fn field<'a>(fields: &'a FieldMap, key: &str) -> Result<&'a FieldValue, CodecError> {
    fields
        .get(key)
        .ok_or_else(|| CodecError::MissingField(key.to_string()))
}

fn string_field(fields: &FieldMap, key: &str) -> Result<String, CodecError> {
    let value = field(fields, key)?;
    as_str(value).map(str::to_string).ok_or_else(|| {
        CodecError::invalid(key, format!("expected a string, got {}", value.type_name()))
    })
}

fn u16_field(fields: &FieldMap, key: &str) -> Result<u16, CodecError> {
    let value = field(fields, key)?;
    as_u16(value).ok_or_else(|| {
        CodecError::invalid(key, format!("expected an unsigned 16-bit integer, got {value:?}"))
    })
}

fn u32_field(fields: &FieldMap, key: &str) -> Result<u32, CodecError> {
    let value = field(fields, key)?;
    as_u32(value).ok_or_else(|| {
        CodecError::invalid(key, format!("expected an unsigned 32-bit integer, got {value:?}"))
    })
}
