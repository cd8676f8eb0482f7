use proptest::prelude::*;
use std::collections::HashSet;

use repodoc_core::traits::{Embedder, LexicalSearcher, VectorSearcher};
use repodoc_core::{Chunk, Error, KeywordFilter, Result, SearchHit, SourceKind};
use repodoc_embed::HashEmbedder;
use repodoc_hybrid::{fuse, hybrid_search};

fn hit(filename: &str, title: &str, source: SourceKind) -> SearchHit {
    SearchHit { chunk: Chunk::new(filename, format!("## {title}\nbody of {title}")), score: 1.0, source }
}

fn keys(hits: &[SearchHit]) -> Vec<(String, String)> {
    hits.iter().map(|h| (h.chunk.filename().to_string(), h.chunk.title().to_string())).collect()
}

struct FixedLexical(Vec<SearchHit>);

impl LexicalSearcher for FixedLexical {
    fn search(&self, _query: &str, k: usize, _filter: Option<&KeywordFilter>) -> Result<Vec<SearchHit>> {
        Ok(self.0.iter().take(k).cloned().collect())
    }
}

struct FixedVector(Vec<SearchHit>);

impl VectorSearcher for FixedVector {
    fn search(&self, _query: &str, _embedder: &dyn Embedder, k: usize) -> Result<Vec<SearchHit>> {
        Ok(self.0.iter().take(k).cloned().collect())
    }
}

struct BrokenVector;

impl VectorSearcher for BrokenVector {
    fn search(&self, _query: &str, embedder: &dyn Embedder, _k: usize) -> Result<Vec<SearchHit>> {
        Err(Error::EmbedderMismatch { index: "other".into(), query: embedder.id().to_string() })
    }
}

#[test]
fn overlapping_lists_merge_in_order() {
    let l = vec![hit("f1", "A", SourceKind::Lexical), hit("f2", "B", SourceKind::Lexical)];
    let v = vec![hit("f2", "B", SourceKind::Vector), hit("f3", "C", SourceKind::Vector)];
    let fused = fuse(l, v);
    assert_eq!(
        keys(&fused),
        vec![("f1".into(), "A".into()), ("f2".into(), "B".into()), ("f3".into(), "C".into())]
    );
    assert_eq!(fused[1].source, SourceKind::Lexical);
    assert_eq!(fused[2].source, SourceKind::Vector);
}

#[test]
fn same_file_different_sections_are_kept() {
    let l = vec![hit("f1", "A", SourceKind::Lexical)];
    let v = vec![hit("f1", "B", SourceKind::Vector)];
    assert_eq!(fuse(l, v).len(), 2);
}

#[test]
fn colliding_keys_within_one_list_keep_first() {
    let mut first = hit("f1", "A", SourceKind::Lexical);
    first.score = 9.0;
    let l = vec![first, hit("f1", "A", SourceKind::Lexical)];
    let fused = fuse(l, Vec::new());
    assert_eq!(fused.len(), 1);
    assert_eq!(fused[0].score, 9.0);
}

#[test]
fn only_vector_match_is_returned_alone() {
    let embedder = HashEmbedder::new(8);
    let lexical = FixedLexical(Vec::new());
    let vector = FixedVector(vec![hit("f9", "Z", SourceKind::Vector)]);
    let fused = hybrid_search(&lexical, &vector, &embedder, "paraphrase", 5).expect("search");
    assert_eq!(keys(&fused), vec![("f9".into(), "Z".into())]);
    assert_eq!(fused[0].source, SourceKind::Vector);
}

#[test]
fn each_side_is_capped_at_k() {
    let embedder = HashEmbedder::new(8);
    let lexical = FixedLexical((0..10).map(|i| hit("l", &format!("L{i}"), SourceKind::Lexical)).collect());
    let vector = FixedVector((0..10).map(|i| hit("v", &format!("V{i}"), SourceKind::Vector)).collect());
    let fused = hybrid_search(&lexical, &vector, &embedder, "q", 3).expect("search");
    assert_eq!(fused.len(), 6);
    assert!(hybrid_search(&lexical, &vector, &embedder, "q", 0).expect("search").is_empty());
}

#[test]
fn searcher_failure_propagates() {
    let embedder = HashEmbedder::new(8);
    let lexical = FixedLexical(vec![hit("f1", "A", SourceKind::Lexical)]);
    let err = hybrid_search(&lexical, &BrokenVector, &embedder, "q", 5).err().expect("must fail");
    assert!(matches!(err, Error::EmbedderMismatch { .. }));
}

fn hits_strategy(source: SourceKind) -> impl Strategy<Value = Vec<SearchHit>> {
    prop::collection::vec((0..4usize, 0..4usize), 0..8).prop_map(move |pairs| {
        pairs.into_iter().map(|(f, t)| hit(&format!("file{f}.md"), &format!("T{t}"), source)).collect()
    })
}

proptest! {
    #[test]
    fn fused_keys_are_unique_and_lexical_wins(
        l in hits_strategy(SourceKind::Lexical),
        v in hits_strategy(SourceKind::Vector),
    ) {
        let lexical_keys: HashSet<_> = keys(&l).into_iter().collect();
        let vector_keys: HashSet<_> = keys(&v).into_iter().collect();
        let total = l.len() + v.len();
        let candidates = keys(&l).into_iter().chain(keys(&v)).collect::<Vec<_>>();

        let fused = fuse(l, v);
        let fused_keys = keys(&fused);

        let unique: HashSet<_> = fused_keys.iter().cloned().collect();
        prop_assert_eq!(unique.len(), fused_keys.len());
        prop_assert!(fused.len() <= total);
        prop_assert_eq!(unique, lexical_keys.union(&vector_keys).cloned().collect::<HashSet<_>>());

        for h in &fused {
            let key = (h.chunk.filename().to_string(), h.chunk.title().to_string());
            if lexical_keys.contains(&key) {
                prop_assert_eq!(h.source, SourceKind::Lexical);
            }
        }

        // Output is the first occurrence of each key, in candidate order.
        let mut seen = HashSet::new();
        let expected: Vec<_> = candidates.into_iter().filter(|k| seen.insert(k.clone())).collect();
        prop_assert_eq!(fused_keys, expected);
    }

    #[test]
    fn without_vector_hits_every_lexical_key_survives(l in hits_strategy(SourceKind::Lexical)) {
        let unique: HashSet<_> = keys(&l).into_iter().collect();
        let fused = fuse(l, Vec::new());
        prop_assert_eq!(fused.len(), unique.len());
    }
}
