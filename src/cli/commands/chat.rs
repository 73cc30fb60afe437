//! Interactive chat command.

use super::{open_engine, run_preflight};
use crate::cli::preflight::Operation;
use crate::cli::typing::reveal;
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::RagEngine;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::debug;

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    run_preflight(Operation::Ask, &settings)?;

    let engine = open_engine(&settings, model.as_deref()).await?;
    let delay = Duration::from_millis(settings.chat.typing_delay_ms);

    println!("\n{}", style("Pitstop Chat").bold().cyan());
    println!(
        "{}\n",
        style("Describe your car problem, or type 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if let Err(e) = turn(&engine, input, &mut stdout, delay).await {
            Output::error(&format!("Error: {}", e));
        }
    }

    Ok(())
}

/// Answer one message, revealing the answer and its citation word by word.
async fn turn(
    engine: &RagEngine,
    message: &str,
    stdout: &mut io::Stdout,
    delay: Duration,
) -> Result<()> {
    let spinner = Output::spinner("Thinking...");
    let result = engine.respond(message).await;
    spinner.finish_and_clear();

    let response = result?;
    debug!("Answer grounded in '{}'", response.source.page_content);

    print!("\n{} ", style("Pitstop:").cyan().bold());
    reveal(stdout, &response.format_for_display(engine.prompts()), delay).await?;
    println!("\n");

    Ok(())
}
