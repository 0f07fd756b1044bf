//! Retrieval-augmented answering over an indexed document.
//!
//! [`answer`] retrieves the top-k chunks for a question, labels them by
//! page, and asks the chat model with a fixed system instruction.
//! [`run_pipeline`] drives a whole run from the PDF path to the answer.

pub mod cfg;
mod error;
mod llm;
mod pipeline;
pub mod progress;
pub mod prompt;

mod api_types;

pub use api_types::{QaAnswer, UsedChunk};
pub use cfg::{InsertPolicy, PipelineConfig, RunSettings};
pub use error::ContextorError;
pub use llm::ChatModel;
pub use pipeline::{PipelineReport, run_pipeline};
pub use progress::{IndicatifProgress, NoopProgress, Progress};

use rag_store::RagStore;
use tracing::{debug, info};

/// Answers `query` from the `k` nearest chunks in `store`.
///
/// # Errors
/// Propagates retrieval and chat failures.
///
/// # Example
/// ```no_run
/// # use contextor::{answer, ChatModel};
/// # async fn demo(store: &rag_store::RagStore, chat: &dyn ChatModel) {
/// let qa = answer("How many pages does the document have?", store, 3, chat)
///     .await
///     .unwrap();
/// println!("{}", qa.answer);
/// # }
/// ```
pub async fn answer(
    query: &str,
    store: &RagStore,
    k: u64,
    chat: &dyn ChatModel,
) -> Result<QaAnswer, ContextorError> {
    let hits = store.similarity_search(query, k).await?;
    debug!(k, hits = hits.len(), "context retrieved");

    let context = prompt::build_context(&hits);
    let user_prompt = prompt::build_user_prompt(query, &context);
    let answer = chat.complete(prompt::DEFAULT_SYSTEM, &user_prompt).await?;

    info!(%answer, "answer generated");

    let context = hits
        .into_iter()
        .map(|h| UsedChunk {
            score: h.score,
            page: h.chunk.page_number(),
            category: h.chunk.category().map(str::to_string),
            text: h.chunk.content,
        })
        .collect();

    Ok(QaAnswer { answer, context })
}
