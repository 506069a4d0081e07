use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("No URL provided")]
    MissingUrl,

    #[error("Wrong URL format provided: {0}")]
    MalformedUrl(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Incorrect input to process: empty target URL")]
    InvalidTarget,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ScanError {
    /// True for errors raised while validating user input, before any crawling.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ScanError::MissingUrl | ScanError::MalformedUrl(_) | ScanError::InvalidUrl(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
