//! Core data models used by the library.

use doc_loader::Chunk;
use serde::Serialize;
use serde_json::{Map, Value};

/// One (identifier, vector, payload) triple as stored in the index.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: Map<String, Value>,
}

/// Raw search result returned by an index backend.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredPoint {
    pub id: String,
    pub score: f32,
    pub payload: Map<String, Value>,
}

/// A single retrieval hit: the stored chunk and its score.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RagHit {
    pub id: String,
    pub score: f32,
    pub chunk: Chunk,
}

/// Query parameters for retrieval.
pub struct RagQuery<'a> {
    pub text: &'a str,
    pub top_k: u64,
}
