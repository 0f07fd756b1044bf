//! Loader seam used by the pipeline.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use tracing::info;

use crate::chunk::Chunk;
use crate::errors::LoadError;

/// Anything that turns a file into an ordered, non-empty chunk sequence.
///
/// Implement this trait to plug in another parser (local partitioner,
/// fixtures in tests, ...).
pub trait DocumentLoader: Send + Sync {
    fn load<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Chunk>, LoadError>> + Send + 'a>>;
}

/// Loads `path` with `loader` and enforces the non-empty contract.
///
/// # Errors
/// Propagates loader errors; returns [`LoadError::Empty`] when no chunk came back.
pub async fn load(loader: &dyn DocumentLoader, path: &Path) -> Result<Vec<Chunk>, LoadError> {
    let chunks = loader.load(path).await?;
    if chunks.is_empty() {
        return Err(LoadError::Empty(path.display().to_string()));
    }
    info!(path = %path.display(), chunks = chunks.len(), "document successfully loaded");
    Ok(chunks)
}
