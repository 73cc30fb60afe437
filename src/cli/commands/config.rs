//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::{Prompts, Settings};
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
///
/// `config_path` is the file given with `--config`, if any.
pub fn run_config(action: &ConfigAction, config_path: Option<PathBuf>, settings: Settings) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }

        ConfigAction::Init => {
            if config_path.exists() {
                Output::info(&format!("Config file exists: {}", config_path.display()));
            } else {
                settings.save_to(&config_path)?;
                Output::success(&format!("Created config file: {}", config_path.display()));
            }

            let prompts_dir = match &settings.prompts.custom_dir {
                Some(dir) => Settings::expand_path(dir),
                None => Settings::default_config_dir().join("prompts"),
            };
            let prompts_path = Prompts::write_defaults(&prompts_dir)?;
            Output::success(&format!("Prompt templates: {}", prompts_path.display()));

            if settings.prompts.custom_dir.is_none() {
                Output::info(&format!(
                    "Set prompts.custom_dir = \"{}\" to use them",
                    prompts_dir.display()
                ));
            }
        }
    }

    Ok(())
}
