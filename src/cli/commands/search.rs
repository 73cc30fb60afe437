//! Search command implementation.

use super::{open_index, run_preflight};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, k: usize, settings: Settings) -> Result<()> {
    run_preflight(Operation::Search, &settings)?;

    let index = open_index(&settings).await?;

    let spinner = Output::spinner("Searching...");
    let results = index.nearest(query, k).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) => {
            if results.is_empty() {
                Output::warning("No videos in the index.");
            } else {
                Output::success(&format!("Found {} results", results.len()));

                for (i, result) in results.iter().enumerate() {
                    let doc = &result.document;
                    Output::search_result(
                        i + 1,
                        &doc.page_content,
                        result.score,
                        &doc.metadata.channel,
                        &doc.metadata.link,
                    );
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
