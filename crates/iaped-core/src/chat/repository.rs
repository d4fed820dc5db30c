//! ChatRepository trait definition.
//!
//! Persistence port for chat sessions and their ordered messages.
//! Implementations live in iaped-infra (e.g., `SqliteChatRepository`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use iaped_types::error::RepositoryError;
use iaped_types::session::{ChatMessage, ChatSession};
use uuid::Uuid;

/// Restricts session queries to a subset of a caller's sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFilter {
    /// All sessions owned by the caller.
    All,
    /// Only sessions with zero user-authored messages.
    EmptyOnly,
}

/// Repository trait for chat session and message persistence.
///
/// Each operation is atomic at the single-entity level: a message append
/// either fully succeeds or is absent. No cross-entity transaction
/// guarantee beyond that.
pub trait ChatRepository: Send + Sync {
    /// Insert a new session with no messages.
    fn create_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a session by its unique ID. Returns `None` if absent; ownership
    /// checks happen in the callers.
    fn get_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// List sessions owned by `owner`, ordered by created_at DESC.
    fn find_sessions_by_owner(
        &self,
        owner: &str,
        filter: SessionFilter,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, RepositoryError>> + Send;

    /// Delete a session and, by cascade, its messages.
    fn delete_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a message to its session.
    fn append_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Messages of a session, ordered by timestamp ASC with insertion-order
    /// tie-breaking.
    fn list_messages(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// First and last message of a session, in one call. Either may be
    /// `None` for a session with no messages.
    #[allow(clippy::type_complexity)]
    fn first_last_messages(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<
        Output = Result<(Option<ChatMessage>, Option<ChatMessage>), RepositoryError>,
    > + Send;

    /// Count total sessions across all owners.
    fn count_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Count total messages across all sessions.
    fn count_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
