//! Citation footer for generated answers.

use crate::config::Prompts;
use crate::index::IndexedDocument;
use std::collections::HashMap;

/// The source video an answer was grounded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub title: String,
    pub link: String,
    pub channel: String,
    pub channel_link: String,
}

impl Citation {
    /// Take the citation fields from a retrieved document, unchanged.
    pub fn from_document(document: &IndexedDocument) -> Self {
        Self {
            title: document.page_content.clone(),
            link: document.metadata.link.clone(),
            channel: document.metadata.channel.clone(),
            channel_link: document.metadata.channel_link.clone(),
        }
    }

    /// Render the footer with the configured citation template.
    pub fn render(&self, prompts: &Prompts) -> String {
        let mut vars = HashMap::new();
        vars.insert("title".to_string(), self.title.clone());
        vars.insert("link".to_string(), self.link.clone());
        vars.insert("channel".to_string(), self.channel.clone());
        vars.insert("channel_link".to_string(), self.channel_link.clone());
        prompts.render_with_custom(&prompts.guide.citation, &vars)
    }
}
