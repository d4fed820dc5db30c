//! Session lifecycle: create-or-reuse policy and owner-scoped lookups.
//!
//! `SessionGate` resolves "the session the caller should use next". The
//! reuse policy short-circuits on any existing empty session and performs
//! no deletion; pruning of abandoned empty sessions is a separate, explicit
//! operation rather than a side effect of creation.

use std::sync::Arc;

use iaped_types::error::ChatError;
use iaped_types::session::{ChatMessage, ChatSession, MessageRole, SessionView};
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::repository::{ChatRepository, SessionFilter};

/// Result of [`SessionGate::open_session`]: the session plus whether it was
/// freshly created (the boundary layer maps this to 201 vs 200).
#[derive(Debug, Clone)]
pub struct OpenedSession {
    pub session: SessionView,
    pub created: bool,
}

/// Creates, reuses, and resolves sessions per caller.
pub struct SessionGate<R: ChatRepository> {
    repo: Arc<R>,
    welcome_message: String,
}

impl<R: ChatRepository> SessionGate<R> {
    pub fn new(repo: Arc<R>, welcome_message: String) -> Self {
        Self {
            repo,
            welcome_message,
        }
    }

    /// Resolve the session `owner` should use next.
    ///
    /// Unless `force_new` is set, the most recent session with zero
    /// user-authored messages is reused. Otherwise a new session is created
    /// and seeded with the assistant welcome message, so every persisted
    /// session has at least one message from the start.
    pub async fn open_session(
        &self,
        owner: &str,
        force_new: bool,
    ) -> Result<OpenedSession, ChatError> {
        if !force_new {
            let empties = self
                .repo
                .find_sessions_by_owner(owner, SessionFilter::EmptyOnly)
                .await?;
            if let Some(existing) = empties.into_iter().next() {
                debug!(session_id = %existing.id, "Reusing empty session");
                let messages = self.repo.list_messages(&existing.id).await?;
                return Ok(OpenedSession {
                    session: SessionView::new(&existing, messages),
                    created: false,
                });
            }
        }

        let session = ChatSession::new(owner);
        self.repo.create_session(&session).await?;

        let welcome = ChatMessage::new(
            session.id,
            MessageRole::Assistant,
            self.welcome_message.clone(),
        );
        self.repo.append_message(&welcome).await?;

        info!(session_id = %session.id, "Session created");
        Ok(OpenedSession {
            session: SessionView::new(&session, vec![welcome]),
            created: true,
        })
    }

    /// All sessions owned by `owner` with their messages, newest first.
    pub async fn list_owned_sessions(&self, owner: &str) -> Result<Vec<SessionView>, ChatError> {
        let sessions = self
            .repo
            .find_sessions_by_owner(owner, SessionFilter::All)
            .await?;

        let mut views = Vec::with_capacity(sessions.len());
        for session in &sessions {
            let messages = self.repo.list_messages(&session.id).await?;
            views.push(SessionView::new(session, messages));
        }
        Ok(views)
    }

    /// A single session with its messages, or `SessionNotFound` when the
    /// session is absent or belongs to another owner.
    pub async fn get_owned_session(
        &self,
        owner: &str,
        session_id: Uuid,
    ) -> Result<SessionView, ChatError> {
        let session = self
            .repo
            .get_session(&session_id)
            .await?
            .filter(|s| s.owner == owner)
            .ok_or(ChatError::SessionNotFound)?;

        let messages = self.repo.list_messages(&session_id).await?;
        Ok(SessionView::new(&session, messages))
    }

    /// Delete all of `owner`'s sessions with zero user-authored messages.
    ///
    /// Sessions containing a user message are never deleted. Returns the
    /// number of sessions removed.
    pub async fn prune_empty_sessions(&self, owner: &str) -> Result<usize, ChatError> {
        let empties = self
            .repo
            .find_sessions_by_owner(owner, SessionFilter::EmptyOnly)
            .await?;

        let count = empties.len();
        for session in &empties {
            self.repo.delete_session(&session.id).await?;
        }
        if count > 0 {
            info!(owner, count, "Pruned abandoned empty sessions");
        }
        Ok(count)
    }
}
