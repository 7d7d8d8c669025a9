use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // reqwest errors embed the request URL, which may carry query terms
            Error::Http(_) => "External HTTP request failed".to_string(),

            Error::Api { status, message } => {
                if message.to_lowercase().contains("token") {
                    format!("Search API error ({status}): details redacted")
                } else {
                    format!("Search API error ({status}): {message}")
                }
            }

            Error::Internal(msg) => {
                if msg.to_lowercase().contains("token") || msg.to_lowercase().contains("secret") {
                    "Internal error (details redacted)".to_string()
                } else {
                    format!("Internal error: {msg}")
                }
            }

            Error::Json(_) => "Malformed JSON payload".to_string(),
            Error::Csv(e) => format!("CSV error: {e}"),
            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),
            Error::Config(msg) => format!("Configuration error: {msg}"),
        }
    }

    /// Whether the failure happened before any request or file was touched
    pub fn is_startup(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
