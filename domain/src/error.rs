use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid player id: {0}")]
    InvalidPlayerId(String),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}
