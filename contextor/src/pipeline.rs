//! The linear run: load -> setup -> index -> answer.

use std::sync::Arc;

use doc_loader::{Chunk, DocumentLoader, load};
use rag_store::{EmbeddingsProvider, InsertError, VectorIndex, setup};
use tracing::{error, info};

use crate::api_types::QaAnswer;
use crate::cfg::{InsertPolicy, RunSettings};
use crate::error::ContextorError;
use crate::llm::ChatModel;
use crate::progress::Progress;

/// What one run produced.
#[derive(Debug)]
pub struct PipelineReport {
    /// Chunks in reading order, as loaded.
    pub chunks: Vec<Chunk>,
    /// Identifiers allocated at setup, aligned with `chunks`.
    pub ids: Vec<String>,
    /// Points written, or the insertion error tolerated under `continue`.
    pub inserted: Result<usize, InsertError>,
    pub qa: QaAnswer,
}

/// Runs every stage strictly in order; each starts after the previous one
/// completed.
///
/// # Errors
/// Load, setup, retrieval and generation failures are fatal. Insertion
/// failures are fatal only under [`InsertPolicy::Abort`].
pub async fn run_pipeline(
    run: &RunSettings,
    loader: &dyn DocumentLoader,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingsProvider>,
    chat: &dyn ChatModel,
    progress: &dyn Progress,
) -> Result<PipelineReport, ContextorError> {
    progress.step("partitioning document");
    let chunks = load(loader, &run.pdf_path).await?;

    progress.step("creating collection");
    let (store, ids) = setup(run.rag.clone(), index, embedder, &chunks).await?;

    progress.step("embedding and indexing chunks");
    let inserted = match store.add_documents(&chunks, &ids).await {
        Ok(n) => Ok(n),
        Err(e) => match run.insert_policy {
            InsertPolicy::Abort => return Err(e.into()),
            InsertPolicy::Continue => {
                error!(kind = %e.kind, error = %e.source, "adding documents failed, continuing");
                Err(e)
            }
        },
    };

    progress.step("retrieving context and asking the model");
    let qa = crate::answer(&run.query, &store, run.top_k, chat).await?;
    progress.finish("done");

    info!(chunks = chunks.len(), context = qa.context.len(), "pipeline finished");
    Ok(PipelineReport {
        chunks,
        ids,
        inserted,
        qa,
    })
}
