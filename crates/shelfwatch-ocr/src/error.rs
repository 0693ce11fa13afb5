use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server asked to slow down fetching {url} (HTTP 429)")]
    RateLimited { url: String },

    #[error("unexpected HTTP status {status} fetching {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("bitmap worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("OCR engine {engine} could not be started: {source}")]
    EngineUnavailable {
        engine: String,
        #[source]
        source: std::io::Error,
    },

    #[error("text recognition failed: {0}")]
    Recognition(String),
}
