use thiserror::Error;

/// Failures surfaced by the session and navigation layer.
///
/// None of these cross the public contract as panics: session operations
/// return them as `Err`, path building degrades instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    #[error("Stored session is corrupt: {0}")]
    PersistenceCorruption(String),

    /// Message is meant for the login form as-is.
    #[error("{0}")]
    CredentialRejected(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Invalid resource id: {0:?}")]
    InvalidResourceId(String),
}

impl PortalError {
    pub fn network(err: anyhow::Error) -> Self {
        PortalError::NetworkFailure(format!("{:#}", err))
    }
}
