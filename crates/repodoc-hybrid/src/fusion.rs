use std::collections::HashSet;
use tracing::debug;

use repodoc_core::error::Result;
use repodoc_core::traits::{Embedder, LexicalSearcher, VectorSearcher};
use repodoc_core::SearchHit;

/// Concatenates lexical then vector hits and keeps the first hit per
/// `(filename, title)`. Order is otherwise untouched and scores are never
/// compared across the two lists, so a key found by both stays lexical.
pub fn fuse(lexical: Vec<SearchHit>, vector: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(lexical.len() + vector.len());
    let mut fused = Vec::with_capacity(lexical.len() + vector.len());
    for hit in lexical.into_iter().chain(vector) {
        let (filename, title) = hit.key();
        if seen.insert((filename.to_string(), title.to_string())) {
            fused.push(hit);
        }
    }
    fused
}

/// Runs both searchers for the same `query` and `k` and fuses the results.
///
/// At most `2k` hits come back. A failure in either searcher fails the call.
pub fn hybrid_search<L, V>(lexical: &L, vector: &V, embedder: &dyn Embedder, query: &str, k: usize) -> Result<Vec<SearchHit>>
where
    L: LexicalSearcher + ?Sized,
    V: VectorSearcher + ?Sized,
{
    let (lexical_hits, vector_hits) = rayon::join(|| lexical.search(query, k, None), || vector.search(query, embedder, k));
    let (lexical_hits, vector_hits) = (lexical_hits?, vector_hits?);
    let (l, v) = (lexical_hits.len(), vector_hits.len());
    let fused = fuse(lexical_hits, vector_hits);
    debug!(query, k, lexical = l, vector = v, fused = fused.len(), "hybrid search");
    Ok(fused)
}
