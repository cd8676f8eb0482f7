use anyhow::Result;
use std::hash::Hasher;
use twox_hash::XxHash64;

use repodoc_core::traits::{Embedder, Similarity};

/// Deterministic bag-of-words embedder using the hashing trick.
///
/// Each lowercase alphanumeric token lands in bucket `xxh64(token) % dim` with a
/// sign taken from the top hash bit; the result is L2-normalized. Texts without
/// tokens map to the zero vector. No model files are needed, which makes it the
/// default for development and tests.
pub struct HashEmbedder {
    dim: usize,
    id: String,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim, id: format!("hash:xxh64:d{dim}") } }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        if self.dim == 0 { return v; }
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.to_lowercase().as_bytes());
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            v[idx] += if h >> 63 == 1 { -1.0 } else { 1.0 };
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Embedder for HashEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn similarity(&self) -> Similarity { Similarity::Cosine }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { Ok(texts.iter().map(|t| self.embed_text(t)).collect()) }
}
