//! RAG response generation.

use super::{Citation, Generator};
use crate::config::Prompts;
use crate::error::{PitstopError, Result};
use crate::index::{IndexedDocument, VideoIndex};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Answers car problems from the single most relevant indexed video.
///
/// Built once at startup; the index, generator and prompts are shared
/// read-only across turns.
pub struct RagEngine {
    index: Arc<VideoIndex>,
    generator: Arc<dyn Generator>,
    prompts: Arc<Prompts>,
}

impl RagEngine {
    /// Create a new RAG engine.
    pub fn new(index: Arc<VideoIndex>, generator: Arc<dyn Generator>, prompts: Arc<Prompts>) -> Self {
        Self {
            index,
            generator,
            prompts,
        }
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    /// Retrieve the nearest video for `message` and generate an answer from it.
    #[instrument(skip(self), fields(message = %message))]
    pub async fn respond(&self, message: &str) -> Result<RagResponse> {
        if message.trim().is_empty() {
            return Err(PitstopError::InvalidInput(
                "Describe the car problem first".to_string(),
            ));
        }

        info!("Processing message: {}", message);

        let result = self
            .index
            .nearest(message, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PitstopError::Rag("The index contains no videos".to_string()))?;

        debug!(
            "Grounding answer in '{}' (score {:.3})",
            result.document.page_content, result.score
        );

        let prompt = self
            .prompts
            .render_guide(message, &result.document.guide_text());
        let answer = self.generator.generate(&prompt).await?;

        Ok(RagResponse {
            answer,
            source: result.document,
            score: result.score,
        })
    }
}

/// A generated answer and the video it was grounded in.
#[derive(Debug, Clone)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// The retrieved video.
    pub source: IndexedDocument,
    /// Similarity between the message and the video title.
    pub score: f32,
}

impl RagResponse {
    /// Citation for the source video.
    pub fn citation(&self) -> Citation {
        Citation::from_document(&self.source)
    }

    /// The answer followed by its citation footer.
    pub fn format_for_display(&self, prompts: &Prompts) -> String {
        let mut output = self.answer.clone();
        output.push_str(&self.citation().render(prompts));
        output
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeGenerator;
    use super::*;
    use crate::corpus::Corpus;
    use crate::embedding::testing::KeywordEmbedder;
    use crate::index::testing::{entry, repair_corpus};
    use async_trait::async_trait;

    async fn engine(corpus: Corpus, generator: Arc<FakeGenerator>) -> RagEngine {
        let index = VideoIndex::from_corpus(corpus, Arc::new(KeywordEmbedder))
            .await
            .unwrap();
        RagEngine::new(Arc::new(index), generator, Arc::new(Prompts::default()))
    }

    #[tokio::test]
    async fn test_brake_squeal_end_to_end() {
        let corpus: Corpus = [entry("Brake Squeal Fix", "replace worn brake pads")]
            .into_iter()
            .collect();
        let generator = Arc::new(FakeGenerator::replying("Your pads are worn out."));
        let engine = engine(corpus, generator.clone()).await;

        let response = engine.respond("my brakes are squeaking").await.unwrap();

        assert_eq!(response.answer, "Your pads are worn out.");
        assert_eq!(response.source.page_content, "Brake Squeal Fix");

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("my brakes are squeaking"));
        assert!(prompts[0].contains("replace worn brake pads"));
        assert!(!prompts[0].contains("{{message}}"));
        assert!(!prompts[0].contains("{{guide}}"));

        let display = response.format_for_display(engine.prompts());
        assert!(display.starts_with("Your pads are worn out."));
        let metadata = &response.source.metadata;
        assert!(display.contains(&format!("({})", metadata.link)));
        assert!(display.contains(&format!("[{}]", metadata.channel)));
        assert!(display.contains(&format!("({})", metadata.channel_link)));
    }

    #[tokio::test]
    async fn test_picks_most_relevant_video() {
        let generator = Arc::new(FakeGenerator::replying("ok"));
        let engine = engine(repair_corpus(), generator).await;

        let response = engine.respond("check engine light codes").await.unwrap();
        assert_eq!(response.source.page_content, "Check Engine Light Codes");
        assert_eq!(
            response.citation().link,
            "https://www.youtube.com/watch?v=check-engine-light-codes"
        );
    }

    #[tokio::test]
    async fn test_empty_index_is_an_error() {
        let generator = Arc::new(FakeGenerator::replying("unused"));
        let engine = engine(Corpus::new(), generator.clone()).await;

        let err = engine.respond("anything").await.unwrap_err();
        assert!(matches!(err, PitstopError::Rag(_)));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let generator = Arc::new(FakeGenerator::replying("unused"));
        let engine = engine(repair_corpus(), generator.clone()).await;

        let err = engine.respond("   ").await.unwrap_err();
        assert!(matches!(err, PitstopError::InvalidInput(_)));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(PitstopError::OpenAI("rate limited".to_string()))
        }
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let index = VideoIndex::from_corpus(repair_corpus(), Arc::new(KeywordEmbedder))
            .await
            .unwrap();
        let engine = RagEngine::new(
            Arc::new(index),
            Arc::new(FailingGenerator),
            Arc::new(Prompts::default()),
        );

        let err = engine.respond("brakes").await.unwrap_err();
        assert!(matches!(err, PitstopError::OpenAI(_)));
    }
}
