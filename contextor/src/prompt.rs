//! Prompt builder: fixed system message, page-labelled context block.

use rag_store::RagHit;

/// System instruction sent with every question.
pub const DEFAULT_SYSTEM: &str = "You are a helpful assistant.";

/// Joins hits (rank order) as `Page {n}: {text}` blocks separated by a
/// blank line. The page label is printed as stored (`5`, `iv`); hits
/// without one are labelled `Unknown`.
///
/// # Example
/// ```
/// # use contextor::prompt::build_context;
/// assert_eq!(build_context(&[]), "");
/// ```
pub fn build_context(hits: &[RagHit]) -> String {
    hits.iter()
        .map(|h| {
            let page = h
                .chunk
                .page_label()
                .unwrap_or_else(|| "Unknown".to_string());
            format!("Page {page}: {}", h.chunk.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Wraps `context` and `query` into the user message.
pub fn build_user_prompt(query: &str, context: &str) -> String {
    format!(
        "You are an AI assistant helping answer questions based on provided context. \
         The context contains information extracted from multiple pages of a document. \
         Please use this context to provide a detailed and accurate response to the question.\
         \n\nContext: {context}\n\nQuestion: {query}\n\nAnswer:"
    )
}
