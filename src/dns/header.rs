use serde::{Deserialize, Serialize};

/// Decoded DNS message header.
///
/// Section counts are not stored: they always follow from the lengths of the
/// record lists carried by [`super::DNSPacket`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DNSHeader {
    pub id: u16,
    pub qr: bool,
    pub opcode: u8,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    pub z: bool,
    pub ad: bool,
    pub cd: bool,
    /// Response code, including the EDNS extended bits
    pub rcode: u16,
}
