//! Default model configs resolved from environment variables.
//!
//! Two roles are used by the pipeline:
//!
//! - **Generation** → OpenAI chat model that writes the final answer
//! - **Embedding**  → Jina embedding model shared by indexing and querying
//!
//! # Environment variables
//!
//! Generation:
//! - `OPENAI_API_KEY`  (mandatory)
//! - `OPENAI_MODEL`    (default `gpt-4o`)
//! - `OPENAI_URL`      (default `https://api.openai.com`)
//! - `LLM_MAX_TOKENS`  (default `300`)
//! - `LLM_TEMPERATURE` (default `0.7`, range `0.0..=2.0`)
//!
//! Embedding:
//! - `JINA_API_KEY`    (mandatory)
//! - `EMBEDDING_MODEL` (default `jina-embeddings-v2-base-en`)
//! - `JINA_URL`        (default `https://api.jina.ai`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, env_opt_f32, env_opt_u32, env_or, must_env, validate_http_endpoint,
        validate_range_f32,
    },
};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const DEFAULT_EMBEDDING_MODEL: &str = "jina-embeddings-v2-base-en";
pub const DEFAULT_JINA_URL: &str = "https://api.jina.ai";

/// Constructs the config for the **generation** model (OpenAI chat).
///
/// # Errors
/// - [`ConfigError::MissingVar`] if `OPENAI_API_KEY` is unset or blank
/// - [`ConfigError::InvalidNumber`] for unparsable `LLM_MAX_TOKENS` / `LLM_TEMPERATURE`
/// - [`ConfigError::OutOfRange`] if the temperature is outside `0.0..=2.0`
/// - [`ConfigError::InvalidFormat`] if `OPENAI_URL` is not http(s)
///
/// [`ConfigError::MissingVar`]: crate::error_handler::ConfigError::MissingVar
/// [`ConfigError::InvalidNumber`]: crate::error_handler::ConfigError::InvalidNumber
/// [`ConfigError::OutOfRange`]: crate::error_handler::ConfigError::OutOfRange
/// [`ConfigError::InvalidFormat`]: crate::error_handler::ConfigError::InvalidFormat
pub fn config_openai_chat() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let endpoint = env_or("OPENAI_URL", DEFAULT_OPENAI_URL);
    validate_http_endpoint("OPENAI_URL", &endpoint)?;

    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);
    let temperature = env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: env_or("OPENAI_MODEL", DEFAULT_CHAT_MODEL),
        endpoint,
        api_key: Some(api_key),
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
        timeout_secs: None,
    })
}

/// Constructs the config for the **embedding** model (Jina).
///
/// # Errors
/// - [`ConfigError::MissingVar`] if `JINA_API_KEY` is unset or blank
/// - [`ConfigError::InvalidFormat`] if `JINA_URL` is not http(s)
///
/// [`ConfigError::MissingVar`]: crate::error_handler::ConfigError::MissingVar
/// [`ConfigError::InvalidFormat`]: crate::error_handler::ConfigError::InvalidFormat
pub fn config_jina_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("JINA_API_KEY")?;
    let endpoint = env_or("JINA_URL", DEFAULT_JINA_URL);
    validate_http_endpoint("JINA_URL", &endpoint)?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Jina,
        model: env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        endpoint,
        api_key: Some(api_key),
        max_tokens: None,
        temperature: None,
        timeout_secs: None,
    })
}
