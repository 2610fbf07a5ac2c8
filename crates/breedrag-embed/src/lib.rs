//! Fixed-vocabulary term-count embedder.
//!
//! Each vocabulary term owns one dimension; a text's vector counts how often
//! each term occurs and is then L2-normalized.

use std::collections::HashMap;

use breedrag_core::config::{EmbeddingConfig, DEFAULT_VOCABULARY};
use breedrag_core::traits::Embedder;
use breedrag_core::types::Vector;
use tracing::debug;

mod pool;
mod tokenize;

pub use pool::{cosine_similarity, l2_normalize, magnitude};
pub use tokenize::tokenize;

pub struct VocabularyEmbedder {
    vocabulary: Vec<String>,
    positions: HashMap<String, usize>,
}

impl VocabularyEmbedder {
    /// Term order is significant: term `i` maps to dimension `i`.
    /// Repeated terms keep their first position.
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vocabulary: Vec<String> = vocabulary.into_iter().map(|t| t.into().to_lowercase()).collect();
        let mut positions = HashMap::with_capacity(vocabulary.len());
        for (i, term) in vocabulary.iter().enumerate() {
            positions.entry(term.clone()).or_insert(i);
        }
        debug!(dim = vocabulary.len(), "vocabulary embedder ready");
        Self { vocabulary, positions }
    }

    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self::new(config.vocabulary.iter().cloned())
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn embed_text(&self, text: &str) -> Vector {
        let mut counts = vec![0f32; self.vocabulary.len()];
        for token in tokenize(text) {
            if let Some(&i) = self.positions.get(&token) {
                counts[i] += 1.0;
            }
        }
        l2_normalize(counts)
    }
}

impl Default for VocabularyEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_VOCABULARY.iter().copied())
    }
}

impl Embedder for VocabularyEmbedder {
    fn dim(&self) -> usize { self.vocabulary.len() }
    fn embed(&self, text: &str) -> Vector { self.embed_text(text) }
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 { cosine_similarity(a, b) }
}
