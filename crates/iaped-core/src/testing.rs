//! In-memory test doubles for the repository and gateway ports.
//!
//! Shared by the unit tests of the session gate, orchestrator, and history
//! projection. The in-memory repository mirrors the ordering semantics of
//! the SQLite implementation: timestamp ascending with insertion-order
//! tie-breaking.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use iaped_types::error::{GatewayError, RepositoryError};
use iaped_types::prompt::PromptMessage;
use iaped_types::session::{ChatMessage, ChatSession, MessageRole};
use uuid::Uuid;

use crate::chat::repository::{ChatRepository, SessionFilter};
use crate::llm::gateway::ModelGateway;

#[derive(Default)]
struct Store {
    sessions: Vec<ChatSession>,
    messages: Vec<ChatMessage>,
}

/// Vec-backed `ChatRepository` with the same ordering guarantees as SQLite.
pub(crate) struct InMemoryChatRepository {
    store: Mutex<Store>,
}

impl InMemoryChatRepository {
    pub(crate) fn new() -> Self {
        Self {
            store: Mutex::new(Store::default()),
        }
    }
}

impl ChatRepository for InMemoryChatRepository {
    async fn create_session(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        self.store.lock().unwrap().sessions.push(session.clone());
        Ok(())
    }

    async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, RepositoryError> {
        let store = self.store.lock().unwrap();
        Ok(store.sessions.iter().find(|s| s.id == *session_id).cloned())
    }

    async fn find_sessions_by_owner(
        &self,
        owner: &str,
        filter: SessionFilter,
    ) -> Result<Vec<ChatSession>, RepositoryError> {
        let store = self.store.lock().unwrap();
        let mut sessions: Vec<ChatSession> = store
            .sessions
            .iter()
            .filter(|s| s.owner == owner)
            .filter(|s| match filter {
                SessionFilter::All => true,
                SessionFilter::EmptyOnly => !store
                    .messages
                    .iter()
                    .any(|m| m.session_id == s.id && m.role == MessageRole::User),
            })
            .cloned()
            .collect();
        // Stable ascending sort keeps insertion order for equal timestamps;
        // reversing then puts the most recently inserted first among ties.
        sessions.sort_by_key(|s| s.created_at);
        sessions.reverse();
        Ok(sessions)
    }

    async fn delete_session(&self, session_id: &Uuid) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().unwrap();
        let before = store.sessions.len();
        store.sessions.retain(|s| s.id != *session_id);
        if store.sessions.len() == before {
            return Err(RepositoryError::NotFound);
        }
        store.messages.retain(|m| m.session_id != *session_id);
        Ok(())
    }

    async fn append_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        self.store.lock().unwrap().messages.push(message.clone());
        Ok(())
    }

    async fn list_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        let store = self.store.lock().unwrap();
        let mut messages: Vec<ChatMessage> = store
            .messages
            .iter()
            .filter(|m| m.session_id == *session_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    async fn first_last_messages(
        &self,
        session_id: &Uuid,
    ) -> Result<(Option<ChatMessage>, Option<ChatMessage>), RepositoryError> {
        let messages = self.list_messages(session_id).await?;
        Ok((messages.first().cloned(), messages.last().cloned()))
    }

    async fn count_sessions(&self) -> Result<u64, RepositoryError> {
        Ok(self.store.lock().unwrap().sessions.len() as u64)
    }

    async fn count_messages(&self) -> Result<u64, RepositoryError> {
        Ok(self.store.lock().unwrap().messages.len() as u64)
    }
}

type FailureFactory = Box<dyn Fn() -> GatewayError + Send + Sync>;

enum Behavior {
    Reply(String),
    Fail(FailureFactory),
}

/// Scripted `ModelGateway`: a fixed reply or a fixed failure, plus a call
/// counter and the last prompt it received.
pub(crate) struct MockGateway {
    behavior: Behavior,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<Vec<PromptMessage>>>,
}

impl MockGateway {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            behavior: Behavior::Reply(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub(crate) fn failing<F>(factory: F) -> Self
    where
        F: Fn() -> GatewayError + Send + Sync + 'static,
    {
        Self {
            behavior: Behavior::Fail(Box::new(factory)),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_prompt(&self) -> Option<Vec<PromptMessage>> {
        self.last_prompt.lock().unwrap().clone()
    }
}

impl ModelGateway for MockGateway {
    async fn generate_reply(&self, prompt: &[PromptMessage]) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_vec());
        match &self.behavior {
            Behavior::Reply(reply) => Ok(reply.clone()),
            Behavior::Fail(factory) => Err(factory()),
        }
    }
}
