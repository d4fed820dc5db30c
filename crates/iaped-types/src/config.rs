//! Assistant configuration for Iaped.
//!
//! `AssistantConfig` represents the top-level `config.toml` controlling the
//! instruction prefix, welcome message, and model backend parameters.
//! The prompt texts are opaque strings as far as the core is concerned.

use serde::{Deserialize, Serialize};

/// Fixed instruction prefix prepended to every assembled prompt.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
Você é o IAPED, assistente pediátrico virtual da PedCare — uma equipe multidisciplinar de especialistas em saúde infantil, focada em oferecer acolhimento humano e orientação clínica de qualidade.
Sua missão é:
1. Compreender o caso descrito pelo cuidador;
2. Fazer perguntas de triagem e aprofundamento (idade, peso, sintomas, tempo de evolução e sinais de alerta);
3. Avaliar a gravidade do quadro em etapas, identificando “red flags”;
4. Oferecer diagnóstico diferencial preliminar;
5. Orientar autocuidados quando seguro;
6. Recomendar agendamento de consulta na PedCare.
";

/// First assistant message appended to every newly created session.
pub const DEFAULT_WELCOME_MESSAGE: &str =
    "👋 Olá! Eu sou o IAPED, seu assistente pediátrico. Como posso ajudar você hoje?";

/// Top-level configuration for the Iaped service.
///
/// Loaded from `{data_dir}/config.toml`. All fields have sensible defaults,
/// so an empty or missing file yields a working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Instruction text sent as the leading `system` prompt entry.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Assistant welcome message for newly created sessions.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Model identifier sent to the backend.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for the model backend.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens the backend may generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Bound on the model backend round trip; expiry is a gateway failure.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_welcome_message() -> String {
    DEFAULT_WELCOME_MESSAGE.to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.5
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            welcome_message: default_welcome_message(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = AssistantConfig::default();
        assert!(config.system_prompt.contains("IAPED"));
        assert!(config.welcome_message.contains("Olá"));
        assert!((config.temperature - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_config_deserialize_empty_uses_defaults() {
        let config: AssistantConfig = toml::from_str("").unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn test_config_deserialize_partial_override() {
        let toml_str = r#"
model = "gpt-4o"
temperature = 0.2
"#;
        let config: AssistantConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert!((config.temperature - 0.2).abs() < f64::EPSILON);
        // Untouched fields keep their defaults.
        assert!(config.welcome_message.contains("IAPED"));
    }
}
