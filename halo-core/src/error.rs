use thiserror::Error;

#[derive(Error, Debug)]
pub enum HaloError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid source URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to fetch images: {reason}")]
    SourceUnavailable { status: u16, reason: String },

    #[error("No data available")]
    NoData,

    #[error("Invalid image set: {0}")]
    InvalidImageSet(#[from] halo_model::ModelError),

    #[error("Slot {index} out of range for {len} slots")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, HaloError>;
