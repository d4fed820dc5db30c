//! Turn orchestrator: the per-message state transition.
//!
//! One turn is: validate input, persist the user message, assemble the
//! prompt from the full stored history, call the model backend, persist the
//! reply, return the updated session. The user message is made durable
//! before the model call, so a failed call never loses the caller's input --
//! the session is left in a "reply pending" state instead.
//!
//! Turns on the same session are serialized through a per-session async
//! lock; turns on different sessions run concurrently. The operation is not
//! idempotent: sending the same text twice yields two user messages and two
//! replies.

use std::sync::Arc;

use dashmap::DashMap;
use iaped_types::error::ChatError;
use iaped_types::session::{ChatMessage, MessageRole, SessionView};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::chat::assembler::assemble;
use crate::chat::repository::ChatRepository;
use crate::llm::gateway::ModelGateway;

/// Upper bound on user message length, in characters (not bytes).
/// Exactly this many characters is still accepted.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Per-session async locks keyed by session id.
///
/// Entries for dormant sessions are evicted after the turn completes, once
/// no other task holds a handle to the lock.
struct SessionLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl SessionLocks {
    fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    fn acquire(&self, session_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn release(&self, session_id: Uuid) {
        // Only the map's own handle left: no turn is waiting on this lock.
        self.locks
            .remove_if(&session_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Validates, persists, and answers one user message at a time.
pub struct TurnOrchestrator<R: ChatRepository, G: ModelGateway> {
    repo: Arc<R>,
    gateway: Arc<G>,
    system_prompt: String,
    locks: SessionLocks,
}

impl<R: ChatRepository, G: ModelGateway> TurnOrchestrator<R, G> {
    pub fn new(repo: Arc<R>, gateway: Arc<G>, system_prompt: String) -> Self {
        Self {
            repo,
            gateway,
            system_prompt,
            locks: SessionLocks::new(),
        }
    }

    /// Run one turn for `caller` on `session_id`.
    ///
    /// Validation order, first failure wins: empty-after-trim, over-length,
    /// then session lookup (absent and foreign are indistinguishable).
    pub async fn send_message(
        &self,
        session_id: Uuid,
        caller: &str,
        raw: &str,
    ) -> Result<SessionView, ChatError> {
        if raw.trim().is_empty() {
            return Err(ChatError::Validation("message required".to_string()));
        }
        if raw.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ChatError::Validation("message too long".to_string()));
        }

        let lock = self.locks.acquire(session_id);
        let result = {
            let _guard = lock.lock().await;
            self.run_turn(session_id, caller, raw).await
        };
        drop(lock);
        self.locks.release(session_id);
        result
    }

    async fn run_turn(
        &self,
        session_id: Uuid,
        caller: &str,
        raw: &str,
    ) -> Result<SessionView, ChatError> {
        let session = self
            .repo
            .get_session(&session_id)
            .await?
            .filter(|s| s.owner == caller)
            .ok_or(ChatError::SessionNotFound)?;

        // Durable before the model call; never rolled back.
        let user_message = ChatMessage::new(session_id, MessageRole::User, raw);
        self.repo.append_message(&user_message).await?;

        let history = self.repo.list_messages(&session_id).await?;
        let prompt = assemble(&self.system_prompt, &history);
        debug!(session_id = %session_id, entries = prompt.len(), "Prompt assembled");

        let reply = match self.gateway.generate_reply(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Model backend call failed; user message kept");
                return Err(e.into());
            }
        };

        let assistant_message = ChatMessage::new(session_id, MessageRole::Assistant, reply);
        self.repo.append_message(&assistant_message).await?;

        let messages = self.repo.list_messages(&session_id).await?;
        Ok(SessionView::new(&session, messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::sessions::SessionGate;
    use crate::testing::{InMemoryChatRepository, MockGateway};
    use iaped_types::error::GatewayError;

    const WELCOME: &str = "👋 Olá! Eu sou o IAPED, seu assistente pediátrico.";

    struct Fixture {
        repo: Arc<InMemoryChatRepository>,
        gate: SessionGate<InMemoryChatRepository>,
        gateway: Arc<MockGateway>,
    }

    impl Fixture {
        fn new(gateway: MockGateway) -> Self {
            let repo = Arc::new(InMemoryChatRepository::new());
            Self {
                repo: repo.clone(),
                gate: SessionGate::new(repo, WELCOME.to_string()),
                gateway: Arc::new(gateway),
            }
        }

        fn orchestrator(&self) -> TurnOrchestrator<InMemoryChatRepository, MockGateway> {
            TurnOrchestrator::new(
                self.repo.clone(),
                self.gateway.clone(),
                "instruções".to_string(),
            )
        }
    }

    #[tokio::test]
    async fn test_full_turn_scenario() {
        let fx = Fixture::new(MockGateway::replying("Entendo, há quanto tempo?"));
        let orch = fx.orchestrator();

        let opened = fx.gate.open_session("u1", false).await.unwrap();
        assert_eq!(opened.session.messages.len(), 1);

        let updated = orch
            .send_message(opened.session.id, "u1", "Meu filho está com febre")
            .await
            .unwrap();

        assert_eq!(updated.messages.len(), 3);
        assert_eq!(updated.messages[0].role, MessageRole::Assistant);
        assert_eq!(updated.messages[0].content, WELCOME);
        assert_eq!(updated.messages[1].role, MessageRole::User);
        assert_eq!(updated.messages[1].content, "Meu filho está com febre");
        assert_eq!(updated.messages[2].role, MessageRole::Assistant);
        assert_eq!(updated.messages[2].content, "Entendo, há quanto tempo?");

        // Follow-up rejection leaves the count unchanged at 3.
        let err = orch.send_message(opened.session.id, "u1", "").await.unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
        let messages = fx.repo.list_messages(&opened.session.id).await.unwrap();
        assert_eq!(messages.len(), 3);
    }

    #[tokio::test]
    async fn test_whitespace_only_rejected_without_append() {
        let fx = Fixture::new(MockGateway::replying("ok"));
        let orch = fx.orchestrator();

        let opened = fx.gate.open_session("u1", false).await.unwrap();
        let err = orch
            .send_message(opened.session.id, "u1", "   \n\t ")
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Validation(ref m) if m == "message required"));
        assert_eq!(fx.gateway.calls(), 0);
        let messages = fx.repo.list_messages(&opened.session.id).await.unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[tokio::test]
    async fn test_short_answers_are_accepted() {
        let fx = Fixture::new(MockGateway::replying("certo"));
        let orch = fx.orchestrator();

        let opened = fx.gate.open_session("u1", false).await.unwrap();
        let updated = orch.send_message(opened.session.id, "u1", "sim").await.unwrap();
        assert_eq!(updated.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_length_limit_is_in_characters() {
        let fx = Fixture::new(MockGateway::replying("ok"));
        let orch = fx.orchestrator();
        let opened = fx.gate.open_session("u1", false).await.unwrap();

        // Multi-byte characters: 500 of them exceed 500 bytes but not 500 chars.
        let exactly_500 = "é".repeat(500);
        orch.send_message(opened.session.id, "u1", &exactly_500)
            .await
            .unwrap();

        let too_long = "a".repeat(501);
        let err = orch
            .send_message(opened.session.id, "u1", &too_long)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Validation(ref m) if m == "message too long"));
    }

    #[tokio::test]
    async fn test_unknown_or_foreign_session_is_not_found() {
        let fx = Fixture::new(MockGateway::replying("ok"));
        let orch = fx.orchestrator();

        let err = orch
            .send_message(Uuid::now_v7(), "u1", "olá")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));

        let opened = fx.gate.open_session("u1", false).await.unwrap();
        let err = orch
            .send_message(opened.session.id, "u2", "olá")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_gateway_failure_keeps_user_message() {
        let fx = Fixture::new(MockGateway::failing(|| GatewayError::Backend {
            status: 503,
            message: "overloaded".to_string(),
        }));
        let orch = fx.orchestrator();

        let opened = fx.gate.open_session("u1", false).await.unwrap();
        let err = orch
            .send_message(opened.session.id, "u1", "Meu filho está com febre")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Gateway(_)));

        // The user message survived; no assistant reply was appended.
        let messages = fx.repo.list_messages(&opened.session.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, "Meu filho está com febre");
    }

    #[tokio::test]
    async fn test_gateway_receives_just_appended_message() {
        let fx = Fixture::new(MockGateway::replying("resposta"));
        let orch = fx.orchestrator();

        let opened = fx.gate.open_session("u1", false).await.unwrap();
        orch.send_message(opened.session.id, "u1", "pergunta")
            .await
            .unwrap();

        let prompt = fx.gateway.last_prompt().expect("gateway was called");
        // system + welcome + just-appended user message.
        assert_eq!(prompt.len(), 3);
        assert_eq!(prompt[2].content, "pergunta");
        assert_eq!(prompt[2].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_repeated_sends_are_not_deduplicated() {
        let fx = Fixture::new(MockGateway::replying("resposta"));
        let orch = fx.orchestrator();

        let opened = fx.gate.open_session("u1", false).await.unwrap();
        orch.send_message(opened.session.id, "u1", "sim").await.unwrap();
        orch.send_message(opened.session.id, "u1", "sim").await.unwrap();

        let messages = fx.repo.list_messages(&opened.session.id).await.unwrap();
        assert_eq!(messages.len(), 5);
        assert_eq!(fx.gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_turns_on_one_session_are_serialized() {
        let fx = Fixture::new(MockGateway::replying("resposta"));
        let orch = Arc::new(fx.orchestrator());

        let opened = fx.gate.open_session("u1", false).await.unwrap();
        let sid = opened.session.id;

        let mut handles = Vec::new();
        for i in 0..4 {
            let orch = orch.clone();
            handles.push(tokio::spawn(async move {
                orch.send_message(sid, "u1", &format!("turno {i}")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let messages = fx.repo.list_messages(&sid).await.unwrap();
        // welcome + 4 * (user + assistant), strictly alternating after the welcome.
        assert_eq!(messages.len(), 9);
        for pair in messages[1..].chunks(2) {
            assert_eq!(pair[0].role, MessageRole::User);
            assert_eq!(pair[1].role, MessageRole::Assistant);
        }
    }

    #[tokio::test]
    async fn test_message_order_is_insertion_order() {
        let fx = Fixture::new(MockGateway::replying("r"));
        let orch = fx.orchestrator();

        let opened = fx.gate.open_session("u1", false).await.unwrap();
        for text in ["um", "dois", "três"] {
            orch.send_message(opened.session.id, "u1", text).await.unwrap();
        }

        let messages = fx.repo.list_messages(&opened.session.id).await.unwrap();
        for window in messages.windows(2) {
            assert!(window[0].timestamp <= window[1].timestamp);
        }
        let users: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(users, ["um", "dois", "três"]);
    }
}
