//! Runtime configuration loaded from environment variables.
//!
//! Everything is read once at startup; components receive plain config
//! values through their constructors.

use std::path::PathBuf;
use std::str::FromStr;

use ai_llm_service::config::default_config::{config_jina_embedding, config_openai_chat};
use ai_llm_service::error_handler::{env_or, must_env};
use ai_llm_service::{AiLlmError, ConfigError, LlmModelConfig};
use doc_loader::PartitionConfig;
use rag_store::{DEFAULT_DIMENSION, DistanceKind, RagConfig};

use crate::error::ContextorError;

pub const DEFAULT_PDF_PATH: &str = "./data/relatorio_b3_2023.pdf";
pub const DEFAULT_QUERY: &str = "How many pages does the document have?";
pub const DEFAULT_TOP_K: u64 = 3;
pub const DEFAULT_COLLECTION: &str = "qdrant_test";
pub const DEFAULT_RENDER_OUT: &str = "page_overlay.png";

/// Credentials that must be present before anything else runs.
pub const REQUIRED_KEYS: [&str; 3] = ["JINA_API_KEY", "UNSTRUCTURED_API_KEY", "OPENAI_API_KEY"];

/// What to do when a batch insertion fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InsertPolicy {
    /// Log the error and keep going (queries then see whatever was stored).
    #[default]
    Continue,
    /// Stop the run with [`ContextorError::Insert`].
    Abort,
}

impl FromStr for InsertPolicy {
    type Err = ContextorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            other => Err(ContextorError::Config(format!(
                "INSERT_ERROR_POLICY must be `continue` or `abort`, got `{other}`"
            ))),
        }
    }
}

/// Settings consumed by [`crate::run_pipeline`].
#[derive(Clone, Debug)]
pub struct RunSettings {
    pub pdf_path: PathBuf,
    pub query: String,
    pub top_k: u64,
    pub rag: RagConfig,
    pub insert_policy: InsertPolicy,
}

impl RunSettings {
    /// Defaults for `pdf_path` with an in-memory, cosine, 768-d index.
    pub fn new(pdf_path: impl Into<PathBuf>) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            query: DEFAULT_QUERY.to_string(),
            top_k: DEFAULT_TOP_K,
            rag: RagConfig::new_default(DEFAULT_COLLECTION),
            insert_policy: InsertPolicy::Continue,
        }
    }
}

/// Full configuration of one run.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub run: RunSettings,
    pub generation: LlmModelConfig,
    pub embedding: LlmModelConfig,
    pub partition: PartitionConfig,
    /// 1-based page to draw the layout overlay for, if any.
    pub render_page: Option<u32>,
    pub render_out: PathBuf,
}

impl PipelineConfig {
    /// Fails with `MissingVar` naming the first absent credential.
    pub fn require_keys() -> Result<(), ContextorError> {
        Self::require_keys_with(|k| std::env::var(k).ok())
    }

    /// [`Self::require_keys`] over an arbitrary variable source. Blank
    /// values count as absent.
    pub fn require_keys_with(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ContextorError> {
        for key in REQUIRED_KEYS {
            if lookup(key).is_none_or(|v| v.trim().is_empty()) {
                return Err(AiLlmError::Config(ConfigError::MissingVar(key)).into());
            }
        }
        Ok(())
    }

    /// Reads and validates the whole configuration.
    ///
    /// # Errors
    /// [`ContextorError::Llm`] wrapping `ConfigError::MissingVar` for an
    /// absent credential (checked before anything else),
    /// [`ContextorError::Config`] for invalid pipeline values.
    pub fn from_env() -> Result<Self, ContextorError> {
        Self::require_keys()?;

        let generation = config_openai_chat()?;
        let embedding = config_jina_embedding()?;

        let mut partition = PartitionConfig::hi_res(must_env("UNSTRUCTURED_API_KEY")?);
        partition.api_url = env_or("UNSTRUCTURED_URL", &partition.api_url);

        let rag = rag_config_with(|k| std::env::var(k).ok())?;

        let run = RunSettings {
            pdf_path: PathBuf::from(env_or("PDF_PATH", DEFAULT_PDF_PATH)),
            query: env_or("RAG_QUERY", DEFAULT_QUERY),
            top_k: parse("RAG_TOP_K", DEFAULT_TOP_K)?,
            rag,
            insert_policy: env_or("INSERT_ERROR_POLICY", "continue").parse()?,
        };

        let render_page = match opt_env("RENDER_PAGE") {
            Some(v) => Some(v.trim().parse::<u32>().map_err(|_| {
                ContextorError::Config(format!("RENDER_PAGE must be a page number, got `{v}`"))
            })?),
            None => None,
        };

        let cfg = Self {
            run,
            generation,
            embedding,
            partition,
            render_page,
            render_out: PathBuf::from(env_or("RENDER_OUT", DEFAULT_RENDER_OUT)),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ContextorError> {
        if self.run.top_k == 0 {
            return Err(ContextorError::Config("RAG_TOP_K must be >= 1".into()));
        }
        if self.run.query.trim().is_empty() {
            return Err(ContextorError::Config("RAG_QUERY is empty".into()));
        }
        if self.render_page == Some(0) {
            return Err(ContextorError::Config("RENDER_PAGE is 1-based".into()));
        }
        self.run.rag.validate()?;
        self.partition.validate()?;
        Ok(())
    }
}

/// Index settings: `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION`,
/// `EMBEDDING_DIM` and `QDRANT_EXACT_SEARCH` (`true`/`false`).
fn rag_config_with(lookup: impl Fn(&str) -> Option<String>) -> Result<RagConfig, ContextorError> {
    let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
    Ok(RagConfig {
        qdrant_url: get("QDRANT_URL"),
        qdrant_api_key: get("QDRANT_API_KEY"),
        collection: get("QDRANT_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        distance: DistanceKind::Cosine,
        dimension: parse_value("EMBEDDING_DIM", get("EMBEDDING_DIM"), DEFAULT_DIMENSION)?,
        exact_search: parse_value("QDRANT_EXACT_SEARCH", get("QDRANT_EXACT_SEARCH"), false)?,
    })
}

fn opt_env(k: &str) -> Option<String> {
    std::env::var(k).ok().filter(|v| !v.trim().is_empty())
}

fn parse<T: FromStr>(k: &str, dflt: T) -> Result<T, ContextorError> {
    parse_value(k, opt_env(k), dflt)
}

fn parse_value<T: FromStr>(k: &str, raw: Option<String>, dflt: T) -> Result<T, ContextorError> {
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ContextorError::Config(format!("{k} has an invalid value: `{v}`"))),
        None => Ok(dflt),
    }
}
