//! Retrieval-augmented answering: retrieve, assemble context, generate.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use breedrag_core::config::RagConfig;
use breedrag_core::error::Result;
use breedrag_core::traits::TextGenerator;
use breedrag_core::types::{QueryAnswer, QueryResult, RagStats, SourceRef};
use breedrag_index::DocumentIndex;

/// Context used when retrieval comes back empty.
pub const NO_CONTEXT: &str = "No relevant information found.";

pub struct RagOrchestrator {
    index: Arc<DocumentIndex>,
    generator: Arc<dyn TextGenerator>,
    settings: RagConfig,
}

impl RagOrchestrator {
    pub fn new(index: Arc<DocumentIndex>, generator: Arc<dyn TextGenerator>, settings: RagConfig) -> Self {
        Self { index, generator, settings }
    }

    pub fn index(&self) -> &Arc<DocumentIndex> { &self.index }

    /// Answers one question end to end.
    ///
    /// Corpus and generation failures propagate; an unreachable backend does
    /// not, since the generator already folded it into a degraded answer.
    #[instrument(skip(self))]
    pub async fn process_query(&self, question: &str) -> Result<QueryAnswer> {
        let results = self.index.retrieve(question, self.settings.top_k).await?;
        info!(retrieved = results.len(), "retrieved relevant documents");

        let context = build_context(&results);
        debug!(context_len = context.len(), "context built");

        let answer = self.generator.generate(question, &context).await?;

        Ok(QueryAnswer {
            answer,
            sources: results.iter().map(SourceRef::from_result).collect(),
            context_preview: context_preview(&context, self.settings.context_preview_chars),
        })
    }

    /// Index and backend status. Read-only; does not trigger a build.
    pub async fn get_stats(&self) -> RagStats {
        let health = self.generator.check_health().await;
        RagStats {
            index_ready: self.index.is_ready(),
            document_count: self.index.document_count(),
            backend_status: health.status,
        }
    }
}

/// Numbers each hit in rank order with its relevance percentage; entries are
/// separated by a blank line.
pub fn build_context(results: &[QueryResult]) -> String {
    if results.is_empty() {
        return NO_CONTEXT.to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            format!("[{}] {} (relevance: {:.1}%)", i + 1, result.document.text, result.score * 100.0)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// First `chars` characters of `context` followed by an ellipsis.
pub fn context_preview(context: &str, chars: usize) -> String {
    let mut preview: String = context.chars().take(chars).collect();
    preview.push_str("...");
    preview
}
