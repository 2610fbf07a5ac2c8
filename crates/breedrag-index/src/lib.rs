//! In-memory document index with cosine top-K retrieval.
//!
//! Entries live behind an `Arc` that is swapped wholesale on every build, so
//! a query always ranks one complete snapshot. The first query against an
//! unbuilt index fetches the corpus once; concurrent first queries wait on
//! the same build instead of starting their own.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use breedrag_core::error::Result;
use breedrag_core::traits::{CorpusSource, Embedder};
use breedrag_core::types::{Document, IndexEntry, IndexState, QueryResult};

pub struct DocumentIndex {
    embedder: Arc<dyn Embedder>,
    source: Option<Arc<dyn CorpusSource>>,
    entries: RwLock<Arc<Vec<IndexEntry>>>,
    ready: AtomicBool,
    building: AtomicUsize,
    build_lock: Mutex<()>,
}

/// Counts in-flight fetches and builds; released when one finishes or bails out.
struct BuildingGuard<'a>(&'a AtomicUsize);

impl<'a> BuildingGuard<'a> {
    fn enter(active: &'a AtomicUsize) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self(active)
    }
}

impl Drop for BuildingGuard<'_> {
    fn drop(&mut self) { self.0.fetch_sub(1, Ordering::SeqCst); }
}

impl DocumentIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            source: None,
            entries: RwLock::new(Arc::new(Vec::new())),
            ready: AtomicBool::new(false),
            building: AtomicUsize::new(0),
            build_lock: Mutex::new(()),
        }
    }

    /// Attaches the corpus used for lazy builds and [`DocumentIndex::rebuild`].
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn CorpusSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Embeds every document and replaces the current entries in one swap.
    pub fn build(&self, documents: Vec<Document>) {
        let _building = BuildingGuard::enter(&self.building);
        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts);
        let entries: Vec<IndexEntry> = documents
            .into_iter()
            .zip(vectors)
            .map(|(document, vector)| IndexEntry { id: document.id.clone(), vector, document })
            .collect();
        let count = entries.len();
        *self.entries.write() = Arc::new(entries);
        self.ready.store(true, Ordering::SeqCst);
        info!(documents = count, dim = self.embedder.dim(), "index built");
    }

    /// Builds from the corpus source unless a build has already completed.
    pub async fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }
        let _lock = self.build_lock.lock().await;
        if self.is_ready() {
            debug!("index built by a concurrent caller");
            return Ok(());
        }
        let documents = self.fetch_corpus().await?;
        self.build(documents);
        Ok(())
    }

    /// Refetches the corpus and rebuilds. Without a source the current
    /// documents are re-embedded. Returns the new document count.
    pub async fn rebuild(&self) -> Result<usize> {
        let _lock = self.build_lock.lock().await;
        let documents = match &self.source {
            Some(_) => self.fetch_corpus().await?,
            None => self.documents(),
        };
        let count = documents.len();
        self.build(documents);
        Ok(count)
    }

    async fn fetch_corpus(&self) -> Result<Vec<Document>> {
        let Some(source) = &self.source else {
            return Ok(Vec::new());
        };
        let _building = BuildingGuard::enter(&self.building);
        source.fetch_corpus().await
    }

    /// Top-`top_k` documents for `query`, building the index first if needed.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<QueryResult>> {
        self.ensure_ready().await?;
        Ok(self.search(query, top_k))
    }

    /// Ranks the current snapshot without triggering a build.
    ///
    /// Ordered by descending score; equal scores keep corpus order.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<QueryResult> {
        let snapshot = Arc::clone(&self.entries.read());
        let query_vec = self.embedder.embed(query);
        let mut results: Vec<QueryResult> = snapshot
            .iter()
            .map(|entry| QueryResult {
                document: entry.document.clone(),
                score: self.embedder.similarity(&query_vec, &entry.vector),
            })
            .collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);
        debug!(candidates = snapshot.len(), returned = results.len(), "ranked query");
        results
    }

    pub fn documents(&self) -> Vec<Document> {
        self.entries.read().iter().map(|e| e.document.clone()).collect()
    }

    pub fn document_count(&self) -> usize { self.entries.read().len() }

    pub fn is_ready(&self) -> bool { self.ready.load(Ordering::SeqCst) }

    pub fn state(&self) -> IndexState {
        if self.building.load(Ordering::SeqCst) > 0 {
            IndexState::Building
        } else if self.is_ready() {
            IndexState::Ready
        } else {
            IndexState::Uninitialized
        }
    }
}
