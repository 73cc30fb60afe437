//! Similarity index over corpus titles.
//!
//! The index keeps every document in memory and answers queries with a
//! brute-force cosine scan. It is persisted as a directory holding a SQLite
//! file (see [`storage`]).

mod storage;

use crate::corpus::{CitationMetadata, Corpus};
use crate::embedding::Embedder;
use crate::error::{PitstopError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A document stored in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Embedded text (the video title).
    pub page_content: String,
    /// Citation data and transcript.
    pub metadata: CitationMetadata,
    /// Embedding of `page_content`.
    pub embedding: Vec<f32>,
}

impl IndexedDocument {
    /// Text handed to the generator as the guide for an answer.
    pub fn guide_text(&self) -> String {
        format!("{}\n\n{}", self.page_content, self.metadata.transcript)
    }
}

/// A search result with score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The matched document.
    pub document: IndexedDocument,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Facts about how an index was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    /// Embedding model used for the stored vectors.
    pub embedding_model: String,
    /// Vector length.
    pub dimensions: usize,
    /// When the index was built.
    pub built_at: DateTime<Utc>,
}

/// Nearest-neighbour index over embedded corpus titles.
pub struct VideoIndex {
    documents: Vec<IndexedDocument>,
    manifest: IndexManifest,
    embedder: Arc<dyn Embedder>,
}

impl VideoIndex {
    /// Embed every title of `corpus` and build an index from the results.
    #[instrument(skip_all, fields(entries = corpus.len()))]
    pub async fn from_corpus(corpus: Corpus, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let embeddings = embedder.embed_batch(corpus.titles()).await?;
        if embeddings.len() != corpus.len() {
            return Err(PitstopError::Index(format!(
                "Embedder returned {} vectors for {} titles",
                embeddings.len(),
                corpus.len()
            )));
        }

        let (titles, metadata) = corpus.into_parts();
        let documents: Vec<IndexedDocument> = titles
            .into_iter()
            .zip(metadata)
            .zip(embeddings)
            .map(|((page_content, metadata), embedding)| IndexedDocument {
                page_content,
                metadata,
                embedding,
            })
            .collect();

        info!("Built index with {} documents", documents.len());

        Ok(Self {
            documents,
            manifest: IndexManifest {
                embedding_model: embedder.model().to_string(),
                dimensions: embedder.dimensions(),
                built_at: Utc::now(),
            },
            embedder,
        })
    }

    /// Load a persisted index from `dir`.
    ///
    /// `embedder` is used for queries; a mismatch with the model recorded at
    /// build time is logged but not rejected.
    #[instrument(skip(embedder))]
    pub fn load(dir: &Path, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let (manifest, documents) = storage::read(dir)?;

        if manifest.embedding_model != embedder.model() {
            warn!(
                "Index at {:?} was built with {} but queries use {}; rebuild with `pitstop build --force`",
                dir,
                manifest.embedding_model,
                embedder.model()
            );
        }

        info!("Loaded index with {} documents from {:?}", documents.len(), dir);

        Ok(Self {
            documents,
            manifest,
            embedder,
        })
    }

    /// Persist the index into `dir`, replacing any previous contents.
    #[instrument(skip(self))]
    pub fn save(&self, dir: &Path) -> Result<()> {
        storage::write(dir, &self.manifest, &self.documents)?;
        info!("Saved index with {} documents to {:?}", self.documents.len(), dir);
        Ok(())
    }

    /// Whether a persisted index exists at `dir`.
    pub fn exists(dir: &Path) -> bool {
        dir.is_dir()
    }

    /// Return the `k` documents most similar to `query`, best first.
    #[instrument(skip(self))]
    pub async fn nearest(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;
        let results = self.nearest_to_embedding(&query_embedding, k);
        debug!("Found {} matching documents", results.len());
        Ok(results)
    }

    /// Rank stored documents against an embedding. Ties keep insertion order.
    pub fn nearest_to_embedding(&self, query_embedding: &[f32], k: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .documents
            .iter()
            .map(|doc| SearchResult {
                score: cosine_similarity(query_embedding, &doc.embedding),
                document: doc.clone(),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        results
    }

    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }

    pub fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
