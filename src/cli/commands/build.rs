//! Build command implementation.

use super::{embedder, run_preflight};
use crate::bootstrap;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the build command.
pub async fn run_build(channels: &[String], force: bool, settings: Settings) -> Result<()> {
    if !force && settings.index_dir().exists() {
        Output::info(&format!(
            "Index already exists at {}",
            settings.index_dir().display()
        ));
        Output::info("Use --force to rebuild it.");
        return Ok(());
    }

    run_preflight(Operation::BuildIndex, &settings)?;

    let channels = (!channels.is_empty()).then_some(channels);
    let listed = channels.unwrap_or(&settings.youtube.channels);
    Output::info(&format!("Building index from {} channel(s)", listed.len()));

    let progress = Output::progress_bar(0, "Listing channels...");
    let result = bootstrap::load_or_build_from_settings(
        &settings,
        embedder(&settings),
        channels,
        force,
        progress.clone(),
    )
    .await;
    progress.finish_and_clear();

    let bootstrapped = match result {
        Ok(b) => b,
        Err(e) => {
            Output::error(&format!("Build failed: {}", e));
            return Err(e.into());
        }
    };

    if let Some(report) = &bootstrapped.report {
        Output::build_report(report);
    }
    Output::success(&format!(
        "Index with {} videos saved to {}",
        bootstrapped.index.len(),
        settings.index_dir().display()
    ));

    Ok(())
}
