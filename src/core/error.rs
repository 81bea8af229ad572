use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Item not found or unavailable: {0}")]
    ItemUnavailable(String),

    #[error("Reservation denied for item {0:?}")]
    ReservationDenied(crate::core::types::ItemId),

    #[error("Navigation error: {0}")]
    NavigationFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Fuzzy evaluation error: {0}")]
    Fuzzy(#[from] crate::fuzzy::FuzzyError),

    #[error("Personality error: {0}")]
    Personality(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AiError>;
