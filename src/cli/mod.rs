//! CLI module for Pitstop.

pub mod commands;
mod output;
pub mod preflight;
pub mod typing;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Pitstop - car repair help from YouTube repair videos
///
/// Scrapes repair channels, indexes their transcripts, and answers car
/// problems from the most relevant video, with a link to watch it.
#[derive(Parser, Debug)]
#[command(name = "pitstop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape channels and build the video index
    Build {
        /// Channel ID, @handle, or channel URL (repeatable; defaults to the configured channels)
        #[arg(long = "channel")]
        channels: Vec<String>,

        /// Rebuild even if an index already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Start an interactive chat session
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Describe a car problem and get one answer
    Ask {
        /// The problem description
        message: String,

        /// LLM model to use for response generation
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show the videos whose titles best match a query
    Search {
        /// Search query
        query: String,

        /// Maximum number of results (at least 1)
        #[arg(
            short,
            long,
            default_value = "5",
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        k: usize,
    },

    /// List every video of a channel
    Videos {
        /// Channel ID, @handle, or channel URL
        channel: String,
    },

    /// Print the transcript of a video
    Transcript {
        /// Video ID
        video: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration and prompt files
    Init,
}
