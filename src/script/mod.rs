//! Script-facing representation of DNS messages.
//!
//! A [`ScriptQuery`] mirrors a [`crate::dns::DNSPacket`] as plain field
//! mappings that an embedded script may read and rewrite. The query keeps a
//! fingerprint of the state it was built with, so the caller can tell
//! whether the script changed anything before paying for a rebuild.

pub mod address_book;
pub mod coerce;
pub mod fingerprint;
pub mod query;
pub mod record;
pub mod value;

pub use address_book::{AddressBook, Endpoint, NoAddressBook, StaticAddressBook};
pub use fingerprint::Fingerprint;
pub use query::{
    ConversionReport, RecordFailure, ScriptClient, ScriptHeader, ScriptQuery, Section,
};
pub use record::{DefaultRecordCodec, RecordCodec};
pub use value::{FieldMap, FieldValue};
