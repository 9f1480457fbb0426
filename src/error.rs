use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid capture timestamp {value:?}: {source}")]
    TimeParse {
        value: String,
        source: chrono::ParseError,
    },

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("convert exited with {0}")]
    Resize(ExitStatus),
}
