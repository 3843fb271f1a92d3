#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Invalid domain name '{0}': {1}")]
    InvalidName(String, String),

    #[error("Unknown record type '{rtype}' for host {host}")]
    UnknownRecordType { host: String, rtype: String },

    #[error("Malformed {rtype} record for {host}: '{value}' ({reason})")]
    MalformedRecord {
        host: String,
        rtype: String,
        value: String,
        reason: String,
    },
}
