use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{KeywordFilter, SearchHit};

/// How an embedder's vectors are meant to be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Similarity {
    Cosine,
    DotProduct,
}

/// An embedding capability: `text -> fixed-dimension vector`.
///
/// `id` must change whenever the model, its weights or its dimension change;
/// vector indexes are tagged with it and refuse queries from another embedder.
pub trait Embedder: Send + Sync {
    fn id(&self) -> &str;
    fn dim(&self) -> usize;
    fn similarity(&self) -> Similarity { Similarity::Cosine }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedder '{}' returned no vector", self.id()))
    }
}

/// Term-based search over the corpus.
pub trait LexicalSearcher: Send + Sync {
    fn search(&self, query: &str, k: usize, filter: Option<&KeywordFilter>) -> Result<Vec<SearchHit>>;
}

/// Dense nearest-neighbour search over the corpus. The query is embedded as-is.
pub trait VectorSearcher: Send + Sync {
    fn search(&self, query: &str, embedder: &dyn Embedder, k: usize) -> Result<Vec<SearchHit>>;
}
