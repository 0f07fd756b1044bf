//! Chunk <-> index payload mapping.
//!
//! Layout: `{"page_content": <text>, "metadata": {<chunk metadata>}}`.

use doc_loader::Chunk;
use serde_json::{Map, Value};

use crate::errors::RagError;

pub const CONTENT_KEY: &str = "page_content";
pub const METADATA_KEY: &str = "metadata";

pub fn chunk_to_payload(chunk: &Chunk) -> Map<String, Value> {
    let mut m = Map::with_capacity(2);
    m.insert(CONTENT_KEY.into(), Value::String(chunk.content.clone()));
    m.insert(
        METADATA_KEY.into(),
        Value::Object(chunk.metadata.clone().into_iter().collect()),
    );
    m
}

/// Rebuilds the chunk stored in `payload`.
///
/// # Errors
/// [`RagError::Payload`] if `page_content` is not a string or `metadata`
/// is present but not an object.
pub fn payload_to_chunk(mut payload: Map<String, Value>) -> Result<Chunk, RagError> {
    let content = match payload.remove(CONTENT_KEY) {
        Some(Value::String(s)) => s,
        other => {
            return Err(RagError::Payload(format!(
                "`{CONTENT_KEY}` must be a string, got {other:?}"
            )));
        }
    };
    let metadata = match payload.remove(METADATA_KEY) {
        Some(Value::Object(m)) => m.into_iter().collect(),
        None | Some(Value::Null) => Default::default(),
        Some(other) => {
            return Err(RagError::Payload(format!(
                "`{METADATA_KEY}` must be an object, got {other}"
            )));
        }
    };
    Ok(Chunk::new(content, metadata))
}
