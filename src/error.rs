use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Unexpected page structure: {0}")]
    Structure(String),

    #[error("Invalid selector '{0}'")]
    Selector(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;

/// Failure of the free-text address tokenizer. Never leaves `parse_location`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("address text contains no tokens")]
    Empty,

    #[error("label {label} repeated at token '{token}'")]
    RepeatedLabel { label: String, token: String },
}
