//! ModelGateway trait definition.
//!
//! Single external call abstraction over the language-model backend.
//! Implementations live in iaped-infra (e.g., `OpenAiGateway`).

use iaped_types::error::GatewayError;
use iaped_types::prompt::PromptMessage;

/// Gateway to the external language-model backend.
///
/// Stateless between calls: each invocation is an independent request
/// carrying the full assembled history. No retry is performed internally --
/// a single failed call is a single failed turn.
pub trait ModelGateway: Send + Sync {
    /// Send the assembled prompt sequence and return the model's textual
    /// reply, or a typed failure for any transport, auth, rate-limit, or
    /// backend-side problem.
    fn generate_reply(
        &self,
        prompt: &[PromptMessage],
    ) -> impl std::future::Future<Output = Result<String, GatewayError>> + Send;
}
