use indicatif::ProgressBar;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::time::Instant;
use tracing::{debug, info};

use repodoc_core::config::EmbeddingConfig;
use repodoc_core::error::{Error, Result};
use repodoc_core::traits::{Embedder, Similarity, VectorSearcher};
use repodoc_core::{IndexedCorpus, SearchHit, SourceKind};

use crate::canonical::canonical_text;
use crate::distance::{magnitude, score};

/// Immutable embedding store. `vectors[i]` belongs to `corpus[i]`.
///
/// The index remembers which embedder built it and rejects queries embedded
/// by any other one.
pub struct VectorIndex {
    corpus: IndexedCorpus,
    vectors: Vec<Vec<f32>>,
    norms: Vec<f32>,
    embedder_id: String,
    dim: usize,
    similarity: Similarity,
}

impl VectorIndex {
    pub fn build(corpus: &IndexedCorpus, embedder: &dyn Embedder, config: &EmbeddingConfig) -> Result<Self> {
        Self::build_with_progress(corpus, embedder, config, &ProgressBar::hidden())
    }

    /// Embeds the corpus in batches of `batch_size`, at most `concurrency`
    /// batches in flight. Any batch failure aborts the whole build.
    pub fn build_with_progress(corpus: &IndexedCorpus, embedder: &dyn Embedder, config: &EmbeddingConfig, progress: &ProgressBar) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(Error::InvalidConfig("embedding.batch_size must be > 0".into()));
        }
        let dim = embedder.dim();
        if dim == 0 {
            return Err(Error::InvalidConfig(format!("embedder '{}' reports dimension 0", embedder.id())));
        }

        let start = Instant::now();
        let texts: Vec<String> = corpus.iter().map(canonical_text).collect();
        progress.set_length(texts.len() as u64);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.concurrency)
            .thread_name(|i| format!("embed-{i}"))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("embedding worker pool: {e}")))?;

        let batches: Vec<Vec<Vec<f32>>> = pool.install(|| {
            texts
                .par_chunks(config.batch_size)
                .map(|batch| {
                    let vectors = embedder.embed_batch(batch).map_err(Error::Embedding)?;
                    if vectors.len() != batch.len() {
                        return Err(Error::Embedding(anyhow::anyhow!(
                            "embedder '{}' returned {} vectors for {} texts",
                            embedder.id(),
                            vectors.len(),
                            batch.len()
                        )));
                    }
                    if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
                        return Err(Error::DimensionMismatch { expected: dim, actual: bad.len() });
                    }
                    progress.inc(batch.len() as u64);
                    Ok(vectors)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let vectors: Vec<Vec<f32>> = batches.into_iter().flatten().collect();
        let norms = vectors.iter().map(Vec::as_slice).map(magnitude).collect();
        progress.finish_and_clear();
        info!(
            chunks = corpus.len(),
            embedder = embedder.id(),
            dim,
            ms = start.elapsed().as_millis() as u64,
            "vector index built"
        );

        Ok(Self {
            corpus: corpus.clone(),
            vectors,
            norms,
            embedder_id: embedder.id().to_string(),
            dim,
            similarity: embedder.similarity(),
        })
    }

    pub fn corpus(&self) -> &IndexedCorpus { &self.corpus }
    pub fn len(&self) -> usize { self.vectors.len() }
    pub fn is_empty(&self) -> bool { self.vectors.is_empty() }
    pub fn embedder_id(&self) -> &str { &self.embedder_id }
    pub fn dim(&self) -> usize { self.dim }
    pub fn similarity(&self) -> Similarity { self.similarity }

    /// Stored embedding of the chunk at `position`.
    pub fn vector(&self, position: usize) -> Option<&[f32]> { self.vectors.get(position).map(Vec::as_slice) }
}

impl VectorSearcher for VectorIndex {
    fn search(&self, query: &str, embedder: &dyn Embedder, k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }
        if embedder.id() != self.embedder_id {
            return Err(Error::EmbedderMismatch { index: self.embedder_id.clone(), query: embedder.id().to_string() });
        }

        let q = embedder.embed(query).map_err(Error::Embedding)?;
        if q.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: q.len() });
        }
        let q_norm = magnitude(&q);

        let mut scored: Vec<(f32, usize)> = self
            .vectors
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(pos, (v, &norm))| (score(self.similarity, &q, q_norm, v, norm), pos))
            .collect();
        // Highest score first; equal scores keep corpus order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal).then(a.1.cmp(&b.1)));
        scored.truncate(k);

        let hits: Vec<SearchHit> = scored
            .into_iter()
            .filter_map(|(s, pos)| self.corpus.get(pos).map(|chunk| SearchHit { chunk: chunk.clone(), score: s, source: SourceKind::Vector }))
            .collect();
        debug!(query, k, hits = hits.len(), "vector search");
        Ok(hits)
    }
}
