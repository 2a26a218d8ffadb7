use thiserror::Error;

/// Failure to convert a single resource record between its wire and
/// script-facing forms. Never aborts a whole message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("invalid value for field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("record type {rtype} cannot carry {kind} data")]
    TypeMismatch { rtype: u16, kind: &'static str },
}

impl CodecError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CodecError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid address book path: {0}")]
    InvalidAddressBook(String),
}

/// Errors of the file and command-line surfaces around the bridge. The
/// conversions themselves are best effort and never produce one.
#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Address book error: {0}")]
    AddressBook(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Json(err.to_string())
    }
}

impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::AddressBook(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
