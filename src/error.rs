use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProwlError>;

#[derive(Debug, Error)]
pub enum ProwlError {
    #[error("invalid parameter: {0}")]
    InvalidParams(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("cookie file {path}: {reason}")]
    Cookies { path: String, reason: String },

    /// Input artifact could not be read or is not a JSON array.
    #[error("unreadable input artifact {path}: {reason}")]
    Input { path: String, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/* Conversions so `?` works smoothly inside the browser driver */
impl From<chromiumoxide::error::CdpError> for ProwlError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        ProwlError::Browser(e.to_string())
    }
}

impl ProwlError {
    pub fn navigation(url: &str, reason: impl ToString) -> Self {
        ProwlError::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn input(path: &std::path::Path, reason: impl ToString) -> Self {
        ProwlError::Input {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
