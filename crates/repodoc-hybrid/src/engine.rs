use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

use repodoc_core::config::Settings;
use repodoc_core::error::{Error, Result};
use repodoc_core::traits::{Embedder, LexicalSearcher, VectorSearcher};
use repodoc_core::{Chunker, ContentType, IndexedCorpus, KeywordFilter, RawDocument, SearchHit};
use repodoc_text::LexicalIndex;
use repodoc_vector::VectorIndex;

use crate::fusion::hybrid_search;

/// Owns both indexes over one frozen corpus together with the embedder that
/// built the vector side.
pub struct HybridSearchEngine<L = LexicalIndex, V = VectorIndex>
where
    L: LexicalSearcher,
    V: VectorSearcher,
{
    lexical: L,
    vector: V,
    embedder: Box<dyn Embedder>,
    corpus: IndexedCorpus,
    k: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub documents: usize,
    pub chunks: usize,
    pub learning: usize,
    pub assignment: usize,
}

impl HybridSearchEngine<LexicalIndex, VectorIndex> {
    pub fn build(documents: &[RawDocument], embedder: Box<dyn Embedder>, settings: &Settings) -> Result<Self> {
        Self::build_with_progress(documents, embedder, settings, &ProgressBar::hidden())
    }

    /// Chunk, freeze the corpus, then build both indexes concurrently.
    /// Nothing is returned unless both builds succeed.
    pub fn build_with_progress(documents: &[RawDocument], embedder: Box<dyn Embedder>, settings: &Settings, progress: &ProgressBar) -> Result<Self> {
        settings.validate()?;
        let chunker = Chunker::new(&settings.chunking)?;
        let corpus = IndexedCorpus::new(chunker.chunk_documents(documents));

        let (lexical, vector) = rayon::join(
            || LexicalIndex::build(&corpus, &settings.lexical),
            || VectorIndex::build_with_progress(&corpus, embedder.as_ref(), &settings.embedding, progress),
        );
        let (lexical, vector) = (lexical?, vector?);
        info!(documents = documents.len(), chunks = corpus.len(), embedder = embedder.id(), "hybrid engine ready");
        Ok(Self { lexical, vector, embedder, corpus, k: settings.retrieval.k })
    }
}

impl<L, V> HybridSearchEngine<L, V>
where
    L: LexicalSearcher,
    V: VectorSearcher,
{
    /// Assemble an engine from prebuilt parts. Both indexes must have been
    /// built over `corpus`, the vector side with `embedder`.
    pub fn new(lexical: L, vector: V, embedder: Box<dyn Embedder>, corpus: IndexedCorpus, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidConfig("retrieval.k must be > 0".into()));
        }
        Ok(Self { lexical, vector, embedder, corpus, k })
    }

    /// Fused search with the configured default `k`.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> { self.search_k(query, self.k) }

    pub fn search_k(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        hybrid_search(&self.lexical, &self.vector, self.embedder.as_ref(), query, k)
    }

    /// Lexical-only search restricted by a keyword filter.
    pub fn search_filtered(&self, query: &str, filter: &KeywordFilter) -> Result<Vec<SearchHit>> {
        self.lexical.search(query, self.k, Some(filter))
    }

    pub fn search_content_type(&self, query: &str, content_type: ContentType) -> Result<Vec<SearchHit>> {
        self.search_filtered(query, &KeywordFilter::content_type(content_type))
    }

    pub fn lexical(&self) -> &L { &self.lexical }
    pub fn vector(&self) -> &V { &self.vector }
    pub fn embedder(&self) -> &dyn Embedder { self.embedder.as_ref() }
    pub fn corpus(&self) -> &IndexedCorpus { &self.corpus }
    pub fn k(&self) -> usize { self.k }

    pub fn stats(&self) -> CorpusStats {
        let documents: BTreeSet<&str> = self.corpus.iter().map(|c| c.filename()).collect();
        let assignment = self.corpus.iter().filter(|c| c.content_type() == ContentType::Assignment).count();
        CorpusStats {
            documents: documents.len(),
            chunks: self.corpus.len(),
            learning: self.corpus.len() - assignment,
            assignment,
        }
    }
}
