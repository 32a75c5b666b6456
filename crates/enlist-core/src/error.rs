use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("invalid source label")]
    InvalidSource,
}
