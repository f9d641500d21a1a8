use costforest_engine::ForestError;

/// Errors from stream construction and evaluation runs.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("SEA function must be 1..=4, got {0}")]
    InvalidFunction(u8),
    #[error("noise percentage must be 0..=100, got {0}")]
    InvalidNoise(u8),
    #[error("invalid class ratios: {0}")]
    InvalidRatios(String),
    #[error("sample frequency must be at least 1")]
    InvalidSampleFrequency,
    #[error(transparent)]
    Forest(#[from] ForestError),
}

pub type StreamResult<T> = Result<T, StreamError>;
