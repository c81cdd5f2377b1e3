use thiserror::Error;

pub type TrendsResult<T> = Result<T, TrendsError>;

#[derive(Debug, Error)]
pub enum TrendsError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("failed to parse dataset: {0}")]
    Parse(String),

    #[error("failed to fetch dataset: {0}")]
    Fetch(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("surface error: {0}")]
    Surface(String),
}
