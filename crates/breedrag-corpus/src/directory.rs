use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use breedrag_core::error::{Error, Result};
use breedrag_core::traits::CorpusSource;
use breedrag_core::types::{Document, META_BREED};

/// Reads every `*.txt` file under `root` as one document.
///
/// The file stem becomes both the id and the `breed` metadata. Empty files
/// become empty documents, which embed to the zero vector.
pub struct DirectoryCorpus {
    root: PathBuf,
}

impl DirectoryCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }

    pub fn load(&self) -> Result<Vec<Document>> {
        if !self.root.is_dir() {
            return Err(Error::UpstreamFetch(format!("corpus directory {} does not exist", self.root.display())));
        }
        let mut documents = Vec::new();
        for path in list_txt_files(&self.root) {
            let text = read_file_content(&path)?;
            let text = text.trim();
            if text.is_empty() {
                debug!(path = %path.display(), "indexing empty file");
            }
            let id = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
            documents.push(
                Document::new(id.clone(), text)
                    .with_meta(META_BREED, id)
                    .with_meta("path", path.to_string_lossy().to_string()),
            );
        }
        info!(root = %self.root.display(), documents = documents.len(), "loaded directory corpus");
        Ok(documents)
    }
}

#[async_trait]
impl CorpusSource for DirectoryCorpus {
    async fn fetch_corpus(&self) -> Result<Vec<Document>> {
        let corpus = DirectoryCorpus::new(self.root.clone());
        tokio::task::spawn_blocking(move || corpus.load())
            .await
            .map_err(|e| Error::UpstreamFetch(format!("corpus loader panicked: {e}")))?
    }
}

fn read_file_content(file_path: &Path) -> Result<String> {
    match fs::read_to_string(file_path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
    }
}

fn list_txt_files(root: &Path) -> Vec<PathBuf> {
    let mut txt_files = Vec::new();
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
    }
    txt_files.sort();
    txt_files
}
