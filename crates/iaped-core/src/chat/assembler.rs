//! Conversation assembler: stored history to model prompt.
//!
//! Pure, deterministic transformation. The full history is replayed every
//! turn -- no truncation, summarization, or windowing. Cost and latency
//! therefore grow linearly with session length; a follow-on design could
//! window or summarize older turns.

use iaped_types::prompt::PromptMessage;
use iaped_types::session::ChatMessage;

/// Build the prompt sequence for one model call.
///
/// Prepends a single `system` entry with the fixed instruction text, then
/// maps every stored message in ascending timestamp order. Stored `system`
/// messages, if any ever exist, pass through unchanged.
pub fn assemble(system_prompt: &str, history: &[ChatMessage]) -> Vec<PromptMessage> {
    let mut prompt = Vec::with_capacity(history.len() + 1);
    prompt.push(PromptMessage::system(system_prompt));

    for message in history {
        prompt.push(PromptMessage {
            role: message.role,
            content: message.content.clone(),
        });
    }

    prompt
}
