use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation.
///
/// One value describes one remote model: who serves it, where, with which
/// credentials and sampling knobs.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-4o".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(300),
///     temperature: Some(0.7),
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.max_tokens, Some(300));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The provider/backend (OpenAI, Jina).
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"gpt-4o"`, `"jina-embeddings-v2-base-en"`).
    pub model: String,

    /// Base URL of the provider API (without the `/v1/...` suffix).
    pub endpoint: String,

    /// API key used as Bearer token.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Optional request timeout (in seconds). `None` keeps the client default.
    pub timeout_secs: Option<u64>,
}
