//! Corpus sources the index can be built from.
//!
//! - [`BreedCatalog`]: the public dog breed catalog over HTTP
//! - [`DirectoryCorpus`]: one document per `.txt` file under a directory

mod catalog;
mod directory;

pub use catalog::{breed_documents, breed_text, sub_breed_text, BreedCatalog, BreedList};
pub use directory::DirectoryCorpus;

use std::sync::Arc;

use breedrag_core::config::{Config, CorpusKind};
use breedrag_core::error::{Error, Result};
use breedrag_core::traits::CorpusSource;

/// Builds the corpus source selected by `corpus.source`.
pub fn source_from_config(config: &Config) -> Result<Arc<dyn CorpusSource>> {
    let corpus = config.app()?.corpus;
    match (corpus.source, corpus.directory) {
        (CorpusKind::Directory, Some(dir)) => Ok(Arc::new(DirectoryCorpus::new(config.resolve_path(dir)))),
        (CorpusKind::Directory, None) => Err(Error::InvalidConfig(
            "corpus.directory is required for the directory source".to_string(),
        )),
        (CorpusKind::BreedCatalog, _) => Ok(Arc::new(BreedCatalog::new(corpus.catalog_url)?)),
    }
}
