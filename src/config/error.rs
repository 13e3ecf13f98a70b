use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from configuration loading and validation.
pub enum ConfigError {
    /// The port variable was not a number.
    #[error("invalid port '{value}': {source}")]
    PortParseError {
        /// Raw variable value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::num::ParseIntError,
    },

    /// Port 0 is not a usable listen port.
    #[error("invalid port: {value}")]
    InvalidPort {
        /// Raw variable value.
        value: String,
    },

    /// The bind address could not be parsed.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        /// Raw variable value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },

    /// A URL-valued setting is empty or malformed.
    #[error("invalid value for {name}: '{value}'")]
    InvalidValue {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}
