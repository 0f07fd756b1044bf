//! Jina AI embeddings service.
//!
//! - POST {endpoint}/v1/embeddings: batch embeddings (`input` is an array)
//!
//! The response items carry an `index`; vectors are returned in input order
//! regardless of the order the API lists them in.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
    },
};

/// Thin client for the Jina embeddings API.
#[derive(Debug)]
pub struct JinaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_embeddings: String,
}

impl JinaService {
    /// Creates a new [`JinaService`].
    ///
    /// Fails fast (before any network call) when the API key is missing.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider`, `MissingApiKey` or `InvalidEndpoint`
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Jina {
            return Err(
                ProviderError::new(Provider::Jina, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::new(Provider::Jina, ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ProviderError::new(
                Provider::Jina,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                ProviderError::new(
                    Provider::Jina,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let url_embeddings = format!("{}/v1/embeddings", endpoint.trim_end_matches('/'));

        info!(model = %cfg.model, endpoint = %cfg.endpoint, "JinaService initialized");

        Ok(Self {
            client,
            cfg,
            url_embeddings,
        })
    }

    /// Model identifier used for every request.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Embeds a batch of texts in one request.
    ///
    /// # Errors
    /// - [`AiLlmError::HttpTransport`] when the service is unreachable
    /// - [`AiLlmError::Provider`] with `HttpStatus` / `Decode` otherwise
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input: inputs,
        };

        debug!(model = %self.cfg.model, batch = inputs.len(), "POST {}", self.url_embeddings);

        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Jina /v1/embeddings returned non-success status"
            );

            return Err(ProviderError::new(
                Provider::Jina,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let raw = resp.text().await?;
        let vectors = parse_embeddings(&raw, inputs.len())?;

        info!(
            model = %self.cfg.model,
            batch = inputs.len(),
            latency_ms = started.elapsed().as_millis(),
            "embeddings completed"
        );

        Ok(vectors)
    }
}

/// Decodes `data[*].embedding`, sorted by `index`, and checks the count.
fn parse_embeddings(raw: &str, expected: usize) -> Result<Vec<Vec<f32>>, AiLlmError> {
    let decode = |msg: String| ProviderError::new(Provider::Jina, ProviderErrorKind::Decode(msg));

    let mut out: EmbeddingsResponse = serde_json::from_str(raw)
        .map_err(|e| decode(format!("serde error: {e}; expected `data[].embedding`")))?;

    if out.data.len() != expected {
        return Err(decode(format!(
            "expected {expected} embeddings, got {}",
            out.data.len()
        ))
        .into());
    }

    out.data.sort_by_key(|item| item.index);
    Ok(out.data.into_iter().map(|item| item.embedding).collect())
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}
