/// Represents the provider (backend) behind an [`LlmModelConfig`].
///
/// [`LlmModelConfig`]: crate::config::llm_model_config::LlmModelConfig
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// fn describe(provider: LlmProvider) -> &'static str {
///     match provider {
///         LlmProvider::OpenAI => "chat completions",
///         LlmProvider::Jina => "embeddings",
///     }
/// }
/// assert_eq!(describe(LlmProvider::Jina), "embeddings");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI REST API (`/v1/chat/completions`).
    OpenAI,
    /// Jina AI embeddings API (`/v1/embeddings`).
    Jina,
}
