use crate::errors::RagError;
use std::{future::Future, pin::Pin};

pub mod jina;

/// Boxed future returned by [`EmbeddingsProvider`] methods.
pub type EmbedFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RagError>> + Send + 'a>>;

/// Provider interface for embedding generation.
///
/// Async because real providers perform HTTP requests. Implementations
/// must return vectors of exactly [`dimension`](Self::dimension) floats,
/// one per input and in input order.
pub trait EmbeddingsProvider: Send + Sync {
    /// Output vector size.
    fn dimension(&self) -> usize;

    /// Embeds many texts at once.
    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>>;

    /// Embeds a single text.
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
        Box::pin(async move {
            let input = [text.to_string()];
            let mut out = self.embed_batch(&input).await?;
            out.pop().ok_or(RagError::MissingEmbedding)
        })
    }
}

/// Checks every vector against `want`.
pub(crate) fn check_dimensions(vectors: &[Vec<f32>], want: usize) -> Result<(), RagError> {
    match vectors.iter().find(|v| v.len() != want) {
        Some(v) => Err(RagError::VectorSizeMismatch { got: v.len(), want }),
        None => Ok(()),
    }
}
