pub mod config;
pub mod dns;
pub mod error;
pub mod script;

pub use dns::DNSPacket;
pub use script::ScriptQuery;
