//! Error types for table reconstruction and key/value harvesting.
//!
//! Only configuration and I/O problems surface as errors. Data conditions such
//! as orphaned key rows or fragments outside every column are logged and
//! recovered where they occur.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting tables or form values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No strategy is registered under the requested name
    #[error("Unknown key/value strategy: {0}")]
    UnknownStrategy(String),

    /// Strategy configuration is contradictory or incomplete
    #[error("Invalid key/value strategy '{name}': {reason}")]
    InvalidStrategy {
        /// Name the strategy was registered or requested under
        name: String,
        /// Why the configuration was rejected
        reason: String,
    },

    /// Key extraction pattern failed to compile
    #[error("Invalid key pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Malformed page or line range expression
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Malformed configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The fragment source failed to deliver a page
    #[error("Fragment source error: {0}")]
    Source(String),
}
