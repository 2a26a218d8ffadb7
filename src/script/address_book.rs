use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{BridgeError, Result};

/// A known device on the local network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub hw_address: String,
    pub alias: String,
}

/// Resolves a client address to the endpoint it belongs to.
pub trait AddressBook {
    fn lookup_by_ip(&self, ip: &str) -> Option<Endpoint>;
}

/// Address book that knows nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAddressBook;

impl AddressBook for NoAddressBook {
    fn lookup_by_ip(&self, _ip: &str) -> Option<Endpoint> {
        None
    }
}

#[derive(Debug, Deserialize)]
struct AddressBookFile {
    #[serde(default)]
    endpoint: Vec<EndpointEntry>,
}

#[derive(Debug, Deserialize)]
struct EndpointEntry {
    ip: String,
    #[serde(default)]
    mac: String,
    #[serde(default)]
    alias: String,
}

/// In-memory address book, usually loaded from a TOML file of
/// `[[endpoint]]` tables:
///
/// ```toml
/// [[endpoint]]
/// ip = "192.168.1.20"
/// mac = "aa:bb:cc:dd:ee:ff"
/// alias = "laptop"
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticAddressBook {
    endpoints: HashMap<IpAddr, Endpoint>,
}

impl StaticAddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ip: IpAddr, endpoint: Endpoint) {
        self.endpoints.insert(ip, endpoint);
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: AddressBookFile = toml::from_str(content)?;
        let mut book = Self::new();

        for entry in file.endpoint {
            let ip: IpAddr = entry.ip.parse().map_err(|_| {
                BridgeError::AddressBook(format!("invalid IP address: {}", entry.ip))
            })?;
            if book.endpoints.contains_key(&ip) {
                warn!(ip = %ip, "Duplicate address book entry, keeping the last one");
            }
            book.insert(
                ip,
                Endpoint {
                    hw_address: entry.mac,
                    alias: entry.alias,
                },
            );
        }

        debug!(endpoints = book.len(), "Address book loaded");
        Ok(book)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

impl AddressBook for StaticAddressBook {
    fn lookup_by_ip(&self, ip: &str) -> Option<Endpoint> {
        let ip: IpAddr = ip.parse().ok()?;
        self.endpoints.get(&ip).cloned()
    }
}
