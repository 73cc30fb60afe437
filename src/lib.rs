//! Pitstop - car repair help from YouTube repair videos
//!
//! A CLI assistant that answers car problems from the transcript of the most
//! relevant repair video, and tells you which video to watch.
//!
//! # Overview
//!
//! Pitstop:
//! - Lists every video of a set of YouTube repair channels
//! - Fetches each video's transcript and indexes the titles by embedding
//! - Finds the video closest to a described problem
//! - Has a chat model turn that video into a diagnosis and fix, with a citation
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `youtube` - Channel listing and transcript retrieval
//! - `corpus` - Assembling (title, citation) pairs from channels
//! - `embedding` - Embedding generation
//! - `index` - Persisted nearest-neighbour index over titles
//! - `rag` - Answer generation and citations
//! - `bootstrap` - Load the index, or build it on first run
//!
//! # Example
//!
//! ```rust,no_run
//! use pitstop::bootstrap;
//! use pitstop::config::{Prompts, Settings};
//! use pitstop::embedding::OpenAIEmbedder;
//! use pitstop::rag::{OpenAIGenerator, RagEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let embedder = Arc::new(OpenAIEmbedder::new());
//!     let ready = bootstrap::load_or_build_from_settings(
//!         &settings,
//!         embedder,
//!         None,
//!         false,
//!         indicatif::ProgressBar::hidden(),
//!     )
//!     .await?;
//!
//!     let engine = RagEngine::new(
//!         Arc::new(ready.index),
//!         Arc::new(OpenAIGenerator::from_settings(&settings.generation, None)),
//!         Arc::new(Prompts::default()),
//!     );
//!     let response = engine.respond("my brakes are squeaking").await?;
//!     println!("{}", response.format_for_display(engine.prompts()));
//!
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod index;
pub mod openai;
pub mod rag;
pub mod youtube;

pub use error::{PitstopError, Result};
