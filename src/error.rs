//! Error types for configuration and snapshot loading.
//! The aggregation engines themselves never fail; bad rows are filtered out.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unsupported snapshot format: {0}")]
    UnsupportedSnapshot(String),
}

pub type Result<T> = std::result::Result<T, Error>;
