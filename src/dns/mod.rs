pub mod enums;
pub mod header;
pub mod question;
pub mod resource;

use header::DNSHeader;
use question::DNSQuestion;
use resource::DNSResource;
use serde::{Deserialize, Serialize};

/// An already decoded DNS message.
///
/// Record order within every section is significant and is preserved by
/// everything that consumes or produces a packet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DNSPacket {
    pub header: DNSHeader,
    pub questions: Vec<DNSQuestion>,
    pub answers: Vec<DNSResource>,
    pub authorities: Vec<DNSResource>,
    pub resources: Vec<DNSResource>,
    /// Whether name compression is used when the packet goes back on the wire
    #[serde(default)]
    pub compress: bool,
}

impl DNSPacket {
    pub fn record_count(&self) -> usize {
        self.answers.len() + self.authorities.len() + self.resources.len()
    }
}
