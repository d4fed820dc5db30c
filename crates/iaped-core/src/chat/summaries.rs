//! Read-only history projection.

use std::sync::Arc;

use iaped_types::error::ChatError;
use iaped_types::session::SessionSummary;

use crate::chat::repository::{ChatRepository, SessionFilter};

/// Projects a caller's sessions into lightweight summaries.
pub struct HistoryReader<R: ChatRepository> {
    repo: Arc<R>,
}

impl<R: ChatRepository> HistoryReader<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// One summary per session owned by `owner`, newest first.
    ///
    /// Previews are the full content of the first and last message. A
    /// session with no messages should not occur (every session is seeded
    /// with a welcome), but yields empty previews rather than failing.
    pub async fn list_session_summaries(
        &self,
        owner: &str,
    ) -> Result<Vec<SessionSummary>, ChatError> {
        let sessions = self
            .repo
            .find_sessions_by_owner(owner, SessionFilter::All)
            .await?;

        let mut summaries = Vec::with_capacity(sessions.len());
        for session in &sessions {
            let (first, last) = self.repo.first_last_messages(&session.id).await?;
            summaries.push(SessionSummary {
                id: session.id,
                created_at: session.created_at,
                first_msg: first.map(|m| m.content).unwrap_or_default(),
                last_msg: last.map(|m| m.content).unwrap_or_default(),
            });
        }
        Ok(summaries)
    }
}
