//! Jina embedding provider.
//!
//! Delegates the HTTP call to the shared [`JinaService`] client and enforces
//! the configured dimension on every vector.

use std::sync::Arc;

use ai_llm_service::JinaService;
use tracing::debug;

use crate::embed::{EmbedFuture, EmbeddingsProvider, check_dimensions};
use crate::errors::RagError;

/// Jina embedding provider (async).
#[derive(Clone, Debug)]
pub struct JinaEmbedder {
    svc: Arc<JinaService>,
    dim: usize,
}

impl JinaEmbedder {
    /// Wraps `svc`; `dim` is the expected output size (768 for
    /// `jina-embeddings-v2-base-en`).
    pub fn new(svc: Arc<JinaService>, dim: usize) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for JinaEmbedder {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            let vectors = self.svc.embed_batch(texts).await?;
            if vectors.len() != texts.len() {
                return Err(RagError::MissingEmbedding);
            }
            check_dimensions(&vectors, self.dim)?;
            debug!(model = %self.svc.model(), count = vectors.len(), dim = self.dim, "batch embedded");
            Ok(vectors)
        })
    }
}
