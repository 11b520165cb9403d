use thiserror::Error;

/// Errors that can occur while crawling and indexing recipes
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Failed to fetch a page (network failure, timeout, bad URL)
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// A configured CSS selector could not be compiled
    #[error("Invalid selector: {0}")]
    Selector(String),

    /// The search backend did not answer the liveness probe
    #[error("Could not connect to search backend: {0}")]
    IndexConnection(String),

    /// The search backend rejected an index operation
    #[error("Index operation failed with status {status}: {reason}")]
    IndexOperation { status: u16, reason: String },

    /// A document or query could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A link or backend address is not a valid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
