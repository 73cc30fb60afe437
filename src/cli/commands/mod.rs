//! CLI command implementations.

mod ask;
mod build;
mod chat;
mod config;
mod search;
mod transcript;
mod videos;

pub use ask::run_ask;
pub use build::run_build;
pub use chat::run_chat;
pub use config::run_config;
pub use search::run_search;
pub use transcript::run_transcript;
pub use videos::run_videos;

use crate::bootstrap;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::index::VideoIndex;
use crate::rag::{OpenAIGenerator, RagEngine};
use anyhow::Result;
use std::sync::Arc;

fn embedder(settings: &Settings) -> Arc<dyn Embedder> {
    Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ))
}

/// Run pre-flight checks, printing the failure before returning it.
fn run_preflight(operation: Operation, settings: &Settings) -> Result<()> {
    let needs_build = !VideoIndex::exists(&settings.index_dir());
    if let Err(e) = preflight::check(operation, settings, needs_build) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }
    Ok(())
}

/// Load the index, building it from the configured channels on first run.
async fn open_index(settings: &Settings) -> Result<VideoIndex> {
    let progress = Output::progress_bar(0, "Listing channels...");
    let result = bootstrap::load_or_build_from_settings(
        settings,
        embedder(settings),
        None,
        false,
        progress.clone(),
    )
    .await;
    progress.finish_and_clear();

    let bootstrapped = result?;
    if let Some(report) = &bootstrapped.report {
        Output::success(&format!(
            "Built index with {} videos at {}",
            report.entries,
            settings.index_dir().display()
        ));
    }
    if bootstrapped.index.is_empty() {
        Output::warning("The index contains no videos. Rebuild it with 'pitstop build --force'.");
    }
    Ok(bootstrapped.index)
}

/// Build the answering engine over a ready index.
async fn open_engine(settings: &Settings, model: Option<&str>) -> Result<RagEngine> {
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let index = open_index(settings).await?;
    let generator = OpenAIGenerator::from_settings(&settings.generation, model);

    Ok(RagEngine::new(
        Arc::new(index),
        Arc::new(generator),
        Arc::new(prompts),
    ))
}
