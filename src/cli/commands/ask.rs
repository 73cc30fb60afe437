//! Ask command implementation.

use super::{open_engine, run_preflight};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(message: &str, model: Option<String>, settings: Settings) -> Result<()> {
    run_preflight(Operation::Ask, &settings)?;

    let engine = open_engine(&settings, model.as_deref()).await?;

    let spinner = Output::spinner("Looking for a repair video...");
    let result = engine.respond(message).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            println!("\n{}\n", response.format_for_display(engine.prompts()));
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
