use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    // Cache errors
    #[error("Cache miss: {0}")]
    CacheMiss(String),

    // Extraction errors
    #[error("Ambiguous result: selector '{selector}' matched {count} nodes, expected one")]
    AmbiguousResult { selector: String, count: usize },

    #[error("Missing required field '{field}': {detail}")]
    MissingRequiredField { field: String, detail: String },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parsing failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid feed name: '{0}' has no alphanumeric characters")]
    InvalidFeedName(String),

    // Output errors
    #[error("RSS build failed: {0}")]
    Build(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    pub fn missing_field(field: &str, detail: impl Into<String>) -> Self {
        ScrapeError::MissingRequiredField {
            field: field.to_string(),
            detail: detail.into(),
        }
    }

    /// Expired and absent cache records both surface as a miss.
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, ScrapeError::CacheMiss(_))
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
