use breedrag_core::traits::Embedder;
use breedrag_embed::VocabularyEmbedder;

fn main() {
    let embedder = VocabularyEmbedder::default();
    let texts = vec!["terrier dog".to_string(), "Dog breed: poodle. This breed has no sub-breeds.".to_string()];
    let embs = embedder.embed_batch(&texts);
    println!("B={} dim={}", embs.len(), embedder.dim());
    println!("similarity={:.3}", embedder.similarity(&embs[0], &embs[1]));
}
