// error.rs: error types for id parsing and builder configuration
use thiserror::Error;

/// Errors produced while parsing a hex BrowserID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    /// Hex input must contain two digits per byte.
    #[error("invalid syntax: odd-length browser id ({len} characters)")]
    OddLength { len: usize },

    /// A two-character group is not hexadecimal.
    #[error("invalid syntax: non-hex byte {pair:?} at offset {index}")]
    InvalidDigit { index: usize, pair: String },
}

/// Errors produced while loading a builder configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read builder config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse builder config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported builder config version: {0}")]
    UnsupportedVersion(u32),
}
