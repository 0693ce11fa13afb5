use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("browser protocol error: {0}")]
    Cdp(String),

    #[error("timed out after {timeout_ms}ms waiting for {target}")]
    NavigationTimeout { target: String, timeout_ms: u64 },

    #[error("no element matches selector \"{selector}\"")]
    SelectorMismatch { selector: String },

    #[error("page script returned unexpected data for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<chromiumoxide::error::CdpError> for ScraperError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ScraperError::Cdp(err.to_string())
    }
}
