pub mod ads;
pub mod app_config;
pub mod config;
pub mod products;
pub mod selectors;
pub mod snapshot;

pub use ads::{dedup_candidates, Ad, AdEntry, AdKind, BannerCandidate, DEFAULT_ALT_TEXT};
pub use app_config::{AppConfig, OcrSettings, Platform};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{CanonicalProduct, Product, RawProductNode, StockStatus};
pub use selectors::{load_selector_overrides, SelectorOverrides};
pub use snapshot::{assemble, Demographic, Snapshot, SnapshotData};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("malformed configuration in {var}: {reason}")]
    MalformedConfig { var: String, reason: String },

    #[error("failed to read selectors file {path}: {source}")]
    SelectorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse selectors file: {0}")]
    SelectorsFileParse(#[from] serde_yaml::Error),
}
