//! Application state wiring all services together.
//!
//! AppState pins the generic core services to the concrete infra
//! implementations. The model gateway is constructed exactly once here,
//! from configuration, and injected into the orchestrator -- there is no
//! ambient global client.

use std::sync::Arc;

use iaped_core::chat::orchestrator::TurnOrchestrator;
use iaped_core::chat::sessions::SessionGate;
use iaped_core::chat::summaries::HistoryReader;
use iaped_infra::config::{API_KEY_ENV, api_key_from_env, load_config, resolve_data_dir};
use iaped_infra::llm::openai::OpenAiGateway;
use iaped_infra::sqlite::chat::SqliteChatRepository;
use iaped_infra::sqlite::pool::DatabasePool;
use iaped_types::config::AssistantConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteGate = SessionGate<SqliteChatRepository>;
pub type ConcreteOrchestrator = TurnOrchestrator<SqliteChatRepository, OpenAiGateway>;
pub type ConcreteHistory = HistoryReader<SqliteChatRepository>;

/// Shared application state holding the wired services.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<ConcreteGate>,
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub history: Arc<ConcreteHistory>,
}

impl AppState {
    /// Wire the services from an already-open repository and gateway.
    pub(crate) fn assemble(
        repo: Arc<SqliteChatRepository>,
        gateway: Arc<OpenAiGateway>,
        config: &AssistantConfig,
    ) -> Self {
        let gate = SessionGate::new(repo.clone(), config.welcome_message.clone());
        let orchestrator =
            TurnOrchestrator::new(repo.clone(), gateway, config.system_prompt.clone());
        let history = HistoryReader::new(repo);

        Self {
            gate: Arc::new(gate),
            orchestrator: Arc::new(orchestrator),
            history: Arc::new(history),
        }
    }

    /// Initialize the application state: connect to the DB, load config,
    /// build the gateway, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!("sqlite://{}?mode=rwc", data_dir.join("iaped.db").display());
        let db_pool = DatabasePool::new(&db_url).await?;

        let config = load_config(&data_dir)?;

        let api_key = api_key_from_env()
            .ok_or_else(|| anyhow::anyhow!("{API_KEY_ENV} must be set to the model backend API key"))?;
        let gateway = Arc::new(OpenAiGateway::new(api_key, &config)?);

        let repo = Arc::new(SqliteChatRepository::new(db_pool));

        Ok(Self::assemble(repo, gateway, &config))
    }
}
