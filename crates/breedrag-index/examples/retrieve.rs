use std::sync::Arc;

use breedrag_core::types::Document;
use breedrag_embed::VocabularyEmbedder;
use breedrag_index::DocumentIndex;

fn main() {
    let query = std::env::args().nth(1).unwrap_or_else(|| "terrier dog".to_string());
    let index = DocumentIndex::new(Arc::new(VocabularyEmbedder::default()));
    index.build(vec![
        Document::new("terrier", "Dog breed: terrier. This breed has no sub-breeds."),
        Document::new("poodle", "Dog breed: poodle. This breed has the following sub-breeds: toy, standard."),
        Document::new("poodle-toy", "Dog sub-breed: toy poodle. This is a variety of the poodle breed."),
    ]);
    for (rank, hit) in index.search(&query, 3).iter().enumerate() {
        println!("{}. {:<12} {:.3}", rank + 1, hit.document.id, hit.score);
    }
}
