//! Shared LLM service with two profiles: `generation` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Clients are built eagerly, so a bad config fails at startup and not
//!   on the first request.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//! use ai_llm_service::config::default_config::{config_jina_embedding, config_openai_chat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let svc = Arc::new(LlmServiceProfiles::new(
//!         config_openai_chat()?,
//!         config_jina_embedding()?,
//!     )?);
//!
//!     let vectors = svc.embedding().embed_batch(&["Ferris".to_string()]).await?;
//!     println!("Embedding dim = {}", vectors[0].len());
//!
//!     let txt = svc
//!         .generation()
//!         .generate("Hello world", Some("You are a helpful assistant."))
//!         .await?;
//!     println!("{txt}");
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::AiLlmError,
    services::{jina_service::JinaService, open_ai_service::OpenAiService},
};

/// Holds one client per logical role.
pub struct LlmServiceProfiles {
    generation: Arc<OpenAiService>,
    embedding: Arc<JinaService>,
}

impl LlmServiceProfiles {
    /// Builds both clients.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if either config is rejected by its client.
    pub fn new(generation: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        debug!(
            generation_model = %generation.model,
            embedding_model = %embedding.model,
            "building LLM service profiles"
        );
        Ok(Self {
            generation: Arc::new(OpenAiService::new(generation)?),
            embedding: Arc::new(JinaService::new(embedding)?),
        })
    }

    /// Shared handle to the chat client.
    pub fn generation(&self) -> Arc<OpenAiService> {
        Arc::clone(&self.generation)
    }

    /// Shared handle to the embeddings client.
    pub fn embedding(&self) -> Arc<JinaService> {
        Arc::clone(&self.embedding)
    }
}
