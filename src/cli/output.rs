//! CLI output formatting utilities.

use crate::corpus::BuildReport;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a listed video.
    pub fn video(title: &str, id: &str, channel: &str) {
        println!(
            "  {} {} ({}, {})",
            style("*").cyan(),
            style(title).bold(),
            style(id).dim(),
            channel
        );
    }

    /// Print search result.
    pub fn search_result(rank: usize, title: &str, score: f32, channel: &str, link: &str) {
        println!(
            "\n{} {} {} (score: {:.2})",
            style(format!("{}.", rank)).green(),
            style(title).bold(),
            style(format!("by {}", channel)).cyan(),
            score
        );
        println!("   {}", style(link).dim());
    }

    /// Print the counts gathered by a corpus build.
    pub fn build_report(report: &BuildReport) {
        Output::header("Build report");
        Output::kv("Channels", &report.channels.to_string());
        Output::kv("Videos listed", &report.videos_listed.to_string());
        Output::kv("Indexed", &report.entries.to_string());
        Output::kv("Skipped", &report.skipped_total().to_string());
        for (reason, count) in &report.skipped {
            println!("    {} {}: {}", style("-").dim(), reason, count);
        }
    }

    /// Create a progress bar.
    pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message(msg.to_string());
        pb
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
