use std::fmt;

use ring::digest::{Context, SHA256};
use serde::Serialize;

/// Digest of everything a script can observe and change in a
/// [`super::ScriptQuery`]. Only compared for equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True until a digest has been stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Feeds length-prefixed parts into a SHA-256 context, so adjacent parts
/// can never run into each other.
pub struct FingerprintBuilder {
    context: Context,
}

impl FingerprintBuilder {
    pub fn new() -> Self {
        FingerprintBuilder {
            context: Context::new(&SHA256),
        }
    }

    pub fn bytes(&mut self, part: &[u8]) -> &mut Self {
        self.context.update(&(part.len() as u64).to_be_bytes());
        self.context.update(part);
        self
    }

    pub fn text(&mut self, part: &str) -> &mut Self {
        self.bytes(part.as_bytes())
    }

    pub fn flag(&mut self, part: bool) -> &mut Self {
        self.bytes(&[part as u8])
    }

    /// Adds the canonical JSON text of `value`. Mappings have sorted keys
    /// and lists keep their order.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> &mut Self {
        match serde_json::to_vec(value) {
            Ok(encoded) => self.bytes(&encoded),
            Err(e) => self.text(&e.to_string()),
        }
    }

    pub fn finish(self) -> Fingerprint {
        Fingerprint(hex::encode(self.context.finish()))
    }
}

impl Default for FingerprintBuilder {
    fn default() -> Self {
        Self::new()
    }
}
