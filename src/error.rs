use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("aspect ratio must be a positive finite number, got {0}")]
    InvalidAspectRatio(f64),

    #[error("image container has not been measured yet ({width}x{height})")]
    UnmeasuredContainer { width: f64, height: f64 },

    #[error("size bounds must satisfy 0 < min ({min}) < max ({max}) <= 1")]
    InvalidBounds { min: f64, max: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown aspect preset {0:?}")]
    UnknownPreset(String),

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CropError>;
