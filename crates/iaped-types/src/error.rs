use thiserror::Error;

/// Errors from repository operations (used by trait definitions in iaped-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from the model backend gateway.
///
/// A single failed call is a single failed turn -- the gateway performs no
/// internal retries.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("model backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("authentication with model backend failed")]
    AuthenticationFailed,

    #[error("model backend rate limited")]
    RateLimited,

    #[error("model backend request timed out")]
    Timeout,

    #[error("failed to parse model backend response: {0}")]
    Deserialization(String),

    #[error("model backend returned an empty reply")]
    EmptyResponse,
}

/// Errors surfaced by the chat orchestration layer.
///
/// All failures are converted to this taxonomy before reaching the caller;
/// no raw internal error crosses the external interface.
#[derive(Debug, Error)]
pub enum ChatError {
    /// User input malformed. Recoverable locally, no retry.
    #[error("{0}")]
    Validation(String),

    /// Session absent or not owned by the caller. Deliberately does not
    /// distinguish the two, so foreign sessions are never revealed.
    #[error("chat session not found")]
    SessionNotFound,

    /// Model backend call failed. The already-persisted user message is NOT
    /// rolled back: callers must treat this as "message sent, reply pending".
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Persistence failure. Fatal to the current operation.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}
