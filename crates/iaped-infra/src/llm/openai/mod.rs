//! OpenAiGateway -- concrete [`ModelGateway`] implementation for the OpenAI
//! Chat Completions API.
//!
//! Sends one non-streaming request per turn to `{base_url}/chat/completions`
//! with a `Authorization: Bearer <key>` header. The API key is wrapped in
//! [`secrecy::SecretString`] and is never logged or included in `Debug`
//! output. A bounded request timeout is enforced by the HTTP client;
//! expiry surfaces as [`GatewayError::Timeout`].

mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use iaped_core::llm::gateway::ModelGateway;
use iaped_types::config::AssistantConfig;
use iaped_types::error::GatewayError;
use iaped_types::prompt::PromptMessage;

use types::{ChatCompletionRequest, ChatCompletionResponse, WireMessage};

/// Default Chat Completions endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Gateway to the OpenAI chat completions backend.
///
/// Stateless between calls: one configured client and credential set,
/// constructed once at startup and reused for every turn.
pub struct OpenAiGateway {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiGateway {
    /// Create a new gateway from the assistant configuration.
    pub fn new(api_key: SecretString, config: &AssistantConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Backend {
                status: 0,
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn build_request(&self, prompt: &[PromptMessage]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: prompt
                .iter()
                .map(|m| WireMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

// No Debug impl: the struct holds a credential.

impl ModelGateway for OpenAiGateway {
    async fn generate_reply(&self, prompt: &[PromptMessage]) -> Result<String, GatewayError> {
        let body = self.build_request(prompt);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Backend {
                        status: 0,
                        message: format!("HTTP request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => GatewayError::AuthenticationFailed,
                429 => GatewayError::RateLimited,
                code => GatewayError::Backend {
                    status: code,
                    message: error_body,
                },
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Deserialization(format!("failed to parse response: {e}")))?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }

        Ok(reply)
    }
}
