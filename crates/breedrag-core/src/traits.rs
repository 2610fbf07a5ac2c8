use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BackendHealth, Document, Vector};

/// Maps text to a fixed-dimension vector. Embedding never fails.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed(&self, text: &str) -> Vector;
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32;

    fn embed_batch(&self, texts: &[String]) -> Vec<Vector> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Supplies the raw documents an index is built from.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    async fn fetch_corpus(&self) -> Result<Vec<Document>>;
}

/// A generative backend conditioned on retrieved context.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, query: &str, context: &str) -> Result<String>;
    /// Never fails; problems are reported inside the returned status.
    async fn check_health(&self) -> BackendHealth;
}
