//! Shared LLM provider layer for the PDF question-answering pipeline.
//!
//! Two providers are wired:
//! - **OpenAI** chat completions (answer generation)
//! - **Jina** embeddings (chunk and query vectors)
//!
//! Configs are plain values ([`LlmModelConfig`]) built once at startup, and
//! every failure is reported through the unified [`AiLlmError`].

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, Provider, ProviderError, ProviderErrorKind};
pub use service_profiles::LlmServiceProfiles;
pub use services::{jina_service::JinaService, open_ai_service::OpenAiService};
