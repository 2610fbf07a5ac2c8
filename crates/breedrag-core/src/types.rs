//! Domain types shared by the embedder, index, generation client and orchestrator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type DocumentId = String;
pub type Meta = HashMap<String, String>;

/// Dense term-count embedding. Either all zeros or unit length.
pub type Vector = Vec<f32>;

/// Metadata key holding the breed a document describes.
pub const META_BREED: &str = "breed";
/// Metadata key holding the sub-breed, present only on sub-breed documents.
pub const META_SUB_BREED: &str = "subBreed";

/// A unit of retrievable text.
///
/// - `id`: unique within one corpus
/// - `text`: the payload that gets embedded and quoted into the context
/// - `metadata`: free-form string pairs (breed, sub-breed, source path, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
    #[serde(default)]
    pub metadata: Meta,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: Meta::new() }
    }

    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// A document paired with its embedding. Owned by the index.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub id: DocumentId,
    pub vector: Vector,
    pub document: Document,
}

/// One ranked hit. `score` is the cosine similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub document: Document,
    pub score: f32,
}

/// Lifecycle of a document index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexState {
    Uninitialized,
    Building,
    Ready,
}

/// Citation returned next to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    pub breed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_breed: Option<String>,
    pub similarity: f32,
}

impl SourceRef {
    /// Projects a hit onto its identifying metadata. Documents without a
    /// `breed` key are cited by id.
    pub fn from_result(result: &QueryResult) -> Self {
        let doc = &result.document;
        Self {
            breed: doc.meta(META_BREED).unwrap_or(&doc.id).to_string(),
            sub_breed: doc.meta(META_SUB_BREED).map(str::to_string),
            similarity: result.score,
        }
    }
}

/// The full response for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnswer {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    /// Truncated context, for diagnostics only.
    #[serde(rename = "context")]
    pub context_preview: String,
}

/// Result of a best-effort backend probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackendHealth {
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self { status: "unavailable".to_string(), error: Some(error.into()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagStats {
    pub index_ready: bool,
    pub document_count: usize,
    pub backend_status: String,
}
