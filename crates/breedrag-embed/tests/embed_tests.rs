use breedrag_core::traits::Embedder;
use breedrag_embed::{cosine_similarity, l2_normalize, magnitude, VocabularyEmbedder};

fn norm(v: &[f32]) -> f32 { v.iter().map(|x| x * x).sum::<f32>().sqrt() }

#[test]
fn default_embedder_shapes_and_determinism() {
    let embedder = VocabularyEmbedder::default();
    let texts = vec!["Dog breed: terrier".to_string(), "Dog breed: terrier".to_string()];
    let embs = embedder.embed_batch(&texts);
    let (v1, v2) = (&embs[0], &embs[1]);

    assert_eq!(v1.len(), embedder.dim());
    assert_eq!(embedder.dim(), 47);
    assert!((norm(v1) - 1.0).abs() <= 1e-5, "vector is L2-normalized (norm={})", norm(v1));
    assert_eq!(v1, v2, "deterministic for same input");
}

#[test]
fn magnitude_is_zero_or_one() {
    let embedder = VocabularyEmbedder::default();
    for text in [
        "",
        "   ",
        "nothing in the vocabulary here",
        "Dog dog DOG",
        "This breed has the following sub-breeds: toy, standard.",
        "australian shepherd; german shepherd & english setter",
    ] {
        let n = norm(&embedder.embed(text));
        assert!(n == 0.0 || (n - 1.0).abs() <= 1e-5, "{text:?} has norm {n}");
    }
}

#[test]
fn unmatched_text_is_the_zero_vector() {
    let embedder = VocabularyEmbedder::new(["corgi", "husky"]);
    let v = embedder.embed("labrador golden");
    assert_eq!(v, vec![0.0f32, 0.0]);
    assert!(v.iter().all(|x| x.is_finite()));
}

#[test]
fn counts_land_on_fixed_positions() {
    let embedder = VocabularyEmbedder::new(["corgi", "husky", "dog"]);
    let v = embedder.embed("Husky dog, husky!");
    // counts [0, 2, 1] normalized by sqrt(5)
    let s5 = 5f32.sqrt();
    let expected = [0.0, 2.0 / s5, 1.0 / s5];
    for (a, b) in v.iter().zip(expected) {
        assert!((a - b).abs() < 1e-6, "a={a} b={b}");
    }
}

#[test]
fn vocabulary_is_case_insensitive() {
    let embedder = VocabularyEmbedder::new(["Corgi"]);
    assert_eq!(embedder.embed("corgi"), vec![1.0f32]);
    assert_eq!(embedder.vocabulary().to_vec(), vec!["corgi".to_string()]);
}

#[test]
fn similarity_is_symmetric_and_reflexive() {
    let embedder = VocabularyEmbedder::default();
    let a = embedder.embed("terrier dog");
    let b = embedder.embed("Dog breed: poodle. This breed has the following sub-breeds: toy, standard.");
    assert!((embedder.similarity(&a, &b) - embedder.similarity(&b, &a)).abs() < 1e-6);
    assert!((embedder.similarity(&a, &a) - 1.0).abs() < 1e-5);
}

#[test]
fn similarity_degenerate_inputs_are_zero() {
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
}

#[test]
fn similarity_does_not_assume_normalized_inputs() {
    let s = cosine_similarity(&[3.0, 4.0], &[6.0, 8.0]);
    assert!((s - 1.0).abs() < 1e-6);
    let s = cosine_similarity(&[2.0, 0.0], &[0.0, 5.0]);
    assert_eq!(s, 0.0);
}

#[test]
fn normalize_leaves_zero_vector_alone() {
    let v = l2_normalize(vec![0.0; 4]);
    assert_eq!(v, vec![0.0f32; 4]);
    let v = l2_normalize(vec![3.0, 4.0]);
    assert!((magnitude(&v) - 1.0).abs() < 1e-6);
}
