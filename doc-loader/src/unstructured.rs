//! Client for the Unstructured partition API.
//!
//! Request: `multipart/form-data` with the file under `files`, plus
//! `strategy` and `coordinates` form fields.
//! Response: a JSON array of elements in reading order:
//!
//! ```json
//! [{"type": "Title", "element_id": "…", "text": "…",
//!   "metadata": {"filename": "…", "page_number": 1,
//!                "coordinates": {"points": [[x, y], …], "layout_width": …, "layout_height": …}}}]
//! ```

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::chunk::{Chunk, Metadata};
use crate::config::PartitionConfig;
use crate::errors::LoadError;
use crate::loader::DocumentLoader;

/// Remote partitioner backed by the Unstructured API.
#[derive(Debug)]
pub struct UnstructuredClient {
    http: reqwest::Client,
    cfg: PartitionConfig,
}

impl UnstructuredClient {
    /// Builds the HTTP client after validating `cfg`.
    ///
    /// # Errors
    /// [`LoadError::Config`] for invalid settings, [`LoadError::Http`] if the
    /// client cannot be built.
    pub fn new(cfg: PartitionConfig) -> Result<Self, LoadError> {
        cfg.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        info!(url = %cfg.api_url, strategy = %cfg.strategy, "UnstructuredClient initialized");
        Ok(Self { http, cfg })
    }

    /// Partitions the file at `path` into chunks (reading order).
    ///
    /// # Errors
    /// - [`LoadError::Io`] if the file cannot be read
    /// - [`LoadError::Http`] if the service is unreachable
    /// - [`LoadError::Rejected`] on a non-2xx answer
    /// - [`LoadError::Decode`] if the body is not an element list
    pub async fn partition(&self, path: &Path) -> Result<Vec<Chunk>, LoadError> {
        let started = Instant::now();
        let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let filename = file_name(path);

        debug!(
            file = %filename,
            size = bytes.len(),
            strategy = %self.cfg.strategy,
            "POST {}", self.cfg.api_url
        );

        let part = Part::bytes(bytes)
            .file_name(filename.clone())
            .mime_str(mime_for(&filename))?;
        let form = Form::new()
            .part("files", part)
            .text("strategy", self.cfg.strategy.clone())
            .text("coordinates", self.cfg.coordinates.to_string());

        let resp = self
            .http
            .post(&self.cfg.api_url)
            .header("unstructured-api-key", &self.cfg.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(240).collect();
            error!(status, %snippet, file = %filename, "partition request rejected");
            return Err(LoadError::Rejected { status, snippet });
        }

        let raw = resp.text().await?;
        let chunks = parse_elements(&raw, &filename)?;

        info!(
            file = %filename,
            chunks = chunks.len(),
            latency_ms = started.elapsed().as_millis(),
            "partition completed"
        );
        Ok(chunks)
    }
}

impl DocumentLoader for UnstructuredClient {
    fn load<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Chunk>, LoadError>> + Send + 'a>> {
        Box::pin(self.partition(path))
    }
}

#[derive(Debug, Deserialize)]
struct Element {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    element_id: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    metadata: serde_json::Map<String, Value>,
}

/// Decodes a partition response body into chunks.
///
/// Each chunk's metadata is the element metadata plus `category` (the
/// element type) and `element_id`; `filename` falls back to
/// `default_filename` when the service omits it.
///
/// # Errors
/// [`LoadError::Decode`] if `raw` is not a JSON array of elements.
pub fn parse_elements(raw: &str, default_filename: &str) -> Result<Vec<Chunk>, LoadError> {
    let elements: Vec<Element> =
        serde_json::from_str(raw).map_err(|e| LoadError::Decode(e.to_string()))?;

    let chunks = elements
        .into_iter()
        .map(|el| {
            let mut metadata: Metadata = el.metadata.into_iter().collect();
            if let Some(kind) = el.kind {
                metadata.insert("category".into(), Value::String(kind));
            }
            if let Some(id) = el.element_id {
                metadata.insert("element_id".into(), Value::String(id));
            }
            metadata
                .entry("filename".into())
                .or_insert_with(|| Value::String(default_filename.to_string()));
            Chunk::new(el.text, metadata)
        })
        .collect();

    Ok(chunks)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn mime_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        Some("html") | Some("htm") => "text/html",
        _ => "application/octet-stream",
    }
}
