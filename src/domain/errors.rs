use super::models::UserId;
use thiserror::Error;

/// A draft that cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username is required")]
    EmptyUsername,
    #[error("Email is required")]
    EmptyEmail,
    #[error("Invalid email address: {0}")]
    MalformedEmail(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("User {0} no longer exists")]
    NotFound(UserId),
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Another request is still in progress")]
    Busy,
    #[error("Not allowed now: {0}")]
    InvalidTransition(&'static str),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
