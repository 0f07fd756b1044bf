//! Public result types.

use serde::Serialize;

/// A context chunk that was fed to the LLM.
///
/// # Example
/// ```
/// use contextor::UsedChunk;
/// let c = UsedChunk {
///     score: 0.92,
///     page: Some(4),
///     category: Some("Table".into()),
///     text: "Receita líquida | 2023".into(),
/// };
/// assert!(c.score > 0.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UsedChunk {
    pub score: f32,
    pub page: Option<i64>,
    pub category: Option<String>,
    pub text: String,
}

/// Final answer together with the context passed to the model, in rank order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QaAnswer {
    pub answer: String,
    pub context: Vec<UsedChunk>,
}
