//! Prompt templates for Pitstop.
//!
//! The mechanic prompt and the citation footer can be overridden by placing a
//! `guide.toml` file in the custom prompts directory. Templates use
//! `{{slot}}` placeholders.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// File name of the guide prompts inside the custom prompts directory.
pub const GUIDE_PROMPTS_FILE: &str = "guide.toml";

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub guide: GuidePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts used to answer a car problem from one retrieved video.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidePrompts {
    /// Answer template. Slots: `message`, `guide`.
    pub template: String,
    /// Footer appended to each answer. Slots: `title`, `link`, `channel`, `channel_link`.
    pub citation: String,
}

impl Default for GuidePrompts {
    fn default() -> Self {
        Self {
            template: r#"You are a world class mechanic support helper.
I will share a relevant guide related to a client's car problem and you will give me the best step by step guide
for fully diagnosing the problem and resolving the issue with the client's car.
You will follow ALL of the rules below:

1. Fully diagnose the problem and explain it to the client

2. After explaining the suspected problem, summarize the information from the guide in a bullet point list of
how to verify the suspected problem is actually the issue and how to fix it

3. If the guide is not relevant to the person's symptoms, then admit that you are not sure but give some basic
instructions for how they might diagnose the problem through further investigation.

Below is a message from the client describing their car problem:
{{message}}

Here is a guide related to the issue:
{{guide}}

Please write an explanation of the suspected issue and the summarized list of instructions I should give to the client:"#
                .to_string(),

            citation: r#"

This response is based on the YouTube video [{{title}}]({{link}}) by [{{channel}}]({{channel_link}}).
I would recommend watching this video and coming back if you have any questions!"#
                .to_string(),
        }
    }
}

fn slot_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("Invalid regex"))
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let guide_path = custom_path.join(GUIDE_PROMPTS_FILE);
            if guide_path.exists() {
                let content = std::fs::read_to_string(&guide_path)?;
                prompts.guide = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Write the default guide prompts into `dir`, returning the file path.
    ///
    /// An existing file is left untouched.
    pub fn write_defaults(dir: &Path) -> crate::error::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(GUIDE_PROMPTS_FILE);
        if !path.exists() {
            let content = toml::to_string_pretty(&GuidePrompts::default())
                .map_err(|e| crate::error::PitstopError::Config(e.to_string()))?;
            std::fs::write(&path, content)?;
        }
        Ok(path)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Slots are filled in one pass over the template; substituted values are
    /// never scanned again. Unknown slots are left as written.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        slot_regex()
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// Fill the answer template with the client's message and the guide text.
    pub fn render_guide(&self, message: &str, guide: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("message".to_string(), message.to_string());
        vars.insert("guide".to_string(), guide.to_string());
        self.render_with_custom(&self.guide.template, &vars)
    }
}
