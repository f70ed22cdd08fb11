use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected by the collection schema; the message is meant for clients.
    #[error("{0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn storage(e: impl std::fmt::Display) -> Self { Self::Storage(e.to_string()) }
}
