use thiserror::Error;

/// Errors crossing component boundaries.
///
/// `Clone` so a single in-flight result can be handed to every waiter that
/// joined the same fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Transport failure, connection failure or timeout.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Malformed parameters or a server-side failure.
    #[error("Backend rejected request: {0}")]
    BackendRejected(String),

    /// The response did not match the expected shape.
    #[error("Failed to decode backend response: {0}")]
    DecodeFailed(String),

    /// Superseded by a newer request. Not user-visible.
    #[error("Request cancelled")]
    Cancelled,

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl DomainError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::BackendUnavailable(_) => "backend_unavailable",
            DomainError::BackendRejected(_) => "backend_rejected",
            DomainError::DecodeFailed(_) => "decode_failed",
            DomainError::Cancelled => "cancelled",
            DomainError::NotFound(_) => "not_found",
        }
    }
}
