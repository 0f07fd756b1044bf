use std::sync::Arc;

use ai_llm_service::{LlmServiceProfiles, telemetry};
use contextor::{PipelineConfig, progress, run_pipeline};
use doc_loader::UnstructuredClient;
use page_render::{PdftoppmRasterizer, render_page};
use rag_store::{JinaEmbedder, open_index};
use tracing::{Level, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional .env; real environment variables take precedence.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .init();

    let cfg = PipelineConfig::from_env()?;
    info!(
        pdf = %cfg.run.pdf_path.display(),
        collection = %cfg.run.rag.collection,
        top_k = cfg.run.top_k,
        policy = ?cfg.run.insert_policy,
        "configuration loaded"
    );

    let llm = LlmServiceProfiles::new(cfg.generation.clone(), cfg.embedding.clone())?;
    let loader = UnstructuredClient::new(cfg.partition.clone())?;
    let index = open_index(&cfg.run.rag)?;
    let embedder = Arc::new(JinaEmbedder::new(llm.embedding(), cfg.run.rag.dimension));
    let chat = llm.generation();

    let progress = progress::for_stdout();
    let report = run_pipeline(
        &cfg.run,
        &loader,
        index,
        embedder,
        &*chat,
        &*progress,
    )
    .await?;

    println!("{}", report.qa.answer);

    if let Some(page) = cfg.render_page {
        let rendered = render_page(
            &cfg.run.pdf_path,
            &report.chunks,
            page,
            true,
            &PdftoppmRasterizer::default(),
        )
        .await;
        match rendered {
            Ok(r) => {
                r.image.save(&cfg.render_out)?;
                let legend: Vec<_> = r.legend.iter().map(|e| e.label).collect();
                info!(page, out = %cfg.render_out.display(), ?legend, "overlay saved");
            }
            Err(e) => warn!(page, error = %e, "overlay skipped"),
        }
    }

    Ok(())
}
