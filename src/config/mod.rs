//! Configuration module for Pitstop.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{GuidePrompts, Prompts, GUIDE_PROMPTS_FILE};
pub use settings::{
    ChatSettings, EmbeddingSettings, GeneralSettings, GenerationSettings, IndexSettings,
    PromptSettings, Settings, YoutubeSettings, YOUTUBE_API_KEY_ENV,
};
