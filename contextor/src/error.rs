//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// Invalid pipeline setting (e.g. `RAG_TOP_K=0`).
    #[error("config error: {0}")]
    Config(String),

    /// Document could not be partitioned.
    #[error("load error: {0}")]
    Load(#[from] doc_loader::LoadError),

    /// Errors from the underlying rag-store crate.
    #[error("RAG error: {0}")]
    Rag(#[from] rag_store::RagError),

    /// Insertion failure under the `abort` policy.
    #[error(transparent)]
    Insert(#[from] rag_store::InsertError),

    /// Chat model failures, including missing provider settings.
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),
}
