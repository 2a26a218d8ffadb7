use crate::error::ConfigError;
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Default tracing filter level; `RUST_LOG` takes precedence
    pub log_level: String,

    /// TOML address book used to resolve client addresses (None = no lookups)
    pub address_book_path: Option<String>,

    /// Whether JSON output is pretty-printed
    pub pretty_output: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            address_book_path: None,
            pretty_output: true,
        }
    }
}

impl BridgeConfig {
    /// Create a BridgeConfig from environment variables
    /// Returns Err if a value is present but invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_address_book(None)
    }

    /// Like [`Self::from_env`], but an explicit `address_book` replaces
    /// `DNSBRIDGE_ADDRESS_BOOK` before anything is validated
    pub fn from_env_with_address_book(address_book: Option<String>) -> Result<Self, ConfigError> {
        let config = Self::read_env().with_address_book(address_book);
        config.validate()?;

        Ok(config)
    }

    /// Replace the address book path when `path` is given
    pub fn with_address_book(mut self, path: Option<String>) -> Self {
        if path.is_some() {
            self.address_book_path = path;
        }
        self
    }

    fn read_env() -> Self {
        let mut config = Self::default();

        if let Ok(log_level) = std::env::var("DNSBRIDGE_LOG_LEVEL") {
            config.log_level = log_level.trim().to_lowercase();
        }

        if let Ok(address_book) = std::env::var("DNSBRIDGE_ADDRESS_BOOK") {
            if !address_book.is_empty() {
                config.address_book_path = Some(address_book);
            }
        }

        if let Ok(pretty_output) = std::env::var("DNSBRIDGE_PRETTY_OUTPUT") {
            config.pretty_output = parse_bool(&pretty_output, true);
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        if let Some(path) = &self.address_book_path {
            if !Path::new(path).is_file() {
                return Err(ConfigError::InvalidAddressBook(format!(
                    "{} is not a readable file",
                    path
                )));
            }
        }

        Ok(())
    }
}

/// Parse a boolean from a string, with a default value for invalid input
fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}
