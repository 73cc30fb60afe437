//! Configuration settings for Pitstop.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable consulted when `youtube.api_key` is not set.
pub const YOUTUBE_API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub youtube: YoutubeSettings,
    pub embedding: EmbeddingSettings,
    pub index: IndexSettings,
    pub generation: GenerationSettings,
    pub chat: ChatSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.pitstop".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// YouTube listing and transcript settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// YouTube Data API key. Falls back to `YOUTUBE_API_KEY`.
    pub api_key: Option<String>,
    /// Base URL of the YouTube Data API.
    pub api_base: String,
    /// Origin prefixed to relative channel paths in citations.
    pub origin: String,
    /// Channels scraped when none are given on the command line.
    pub channels: Vec<String>,
    /// Transcript languages, most preferred first.
    pub languages: Vec<String>,
    /// Videos requested per listing page (the API caps this at 50).
    pub page_size: u32,
    /// Timeout for a single Data API request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            origin: "https://www.youtube.com".to_string(),
            channels: vec![
                "UCes1EvRjcKU4sY_UEavndBw".to_string(),
                "UC_q-UNDJeEBSHqKzAP_8x_A".to_string(),
                "UCVvE8kQTuZEykvMFZBVzftg".to_string(),
            ],
            languages: vec!["en-US".to_string(), "en".to_string()],
            page_size: 50,
            request_timeout_secs: 30,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Persisted index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Directory holding the persisted index.
    pub path: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            path: "~/.pitstop/index".to_string(),
        }
    }
}

/// Response generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Chat model used to write answers.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
        }
    }
}

/// Terminal chat settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Pause between revealed words, in milliseconds. Zero disables the effect.
    pub typing_delay_ms: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self { typing_delay_ms: 50 }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::PitstopError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pitstop")
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded index directory path.
    pub fn index_dir(&self) -> PathBuf {
        Self::expand_path(&self.index.path)
    }

    /// YouTube Data API key from the config file or the environment.
    pub fn youtube_api_key(&self) -> Option<String> {
        self.youtube
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(YOUTUBE_API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.youtube.channels.len(), 3);
        assert_eq!(settings.youtube.languages, vec!["en-US", "en"]);
        assert_eq!(settings.generation.temperature, 0.0);
        assert_eq!(settings.chat.typing_delay_ms, 50);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [youtube]
            channels = ["UCabc"]

            [generation]
            model = "gpt-4.1"
            "#,
        )
        .unwrap();

        assert_eq!(settings.youtube.channels, vec!["UCabc"]);
        assert_eq!(settings.youtube.origin, "https://www.youtube.com");
        assert_eq!(settings.generation.model, "gpt-4.1");
        assert_eq!(settings.embedding.dimensions, 1536);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.chat.typing_delay_ms = 0;
        settings.index.path = "/var/lib/pitstop/index".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.chat.typing_delay_ms, 0);
        assert_eq!(loaded.index_dir(), PathBuf::from("/var/lib/pitstop/index"));
    }

    #[test]
    fn test_configured_api_key_wins() {
        let mut settings = Settings::default();
        settings.youtube.api_key = Some("from-config".to_string());
        assert_eq!(settings.youtube_api_key().as_deref(), Some("from-config"));
    }
}
