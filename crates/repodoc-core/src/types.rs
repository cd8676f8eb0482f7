//! Domain types shared by the chunker, both indexes and the fusion layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub type Meta = BTreeMap<String, String>;

/// A source document as delivered by a document source.
///
/// - `filename`: path relative to the corpus root, `/`-separated
/// - `content`: markdown body with front matter already removed
/// - `metadata`: flat front matter key/value pairs (may be empty)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    pub filename: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Meta,
}

impl RawDocument {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self { filename: filename.into(), content: content.into(), metadata: Meta::new() }
    }
}

/// Whether a chunk belongs to learning material or to an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Learning,
    Assignment,
}

impl ContentType {
    /// Pure function of the filename: case-insensitive substring match on
    /// `assignment`.
    pub fn detect(filename: &str) -> Self {
        if filename.to_lowercase().contains("assignment") { Self::Assignment } else { Self::Learning }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Assignment => "assignment",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// The atomic retrieval unit: one markdown section of one document.
///
/// Fields are private so that `title` and `content_type` can only ever be
/// derived from `section` and `filename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    filename: String,
    content_type: ContentType,
    title: String,
    section: String,
}

impl Chunk {
    pub fn new(filename: impl Into<String>, section: impl Into<String>) -> Self {
        let filename = filename.into();
        let section = section.into();
        Self {
            content_type: ContentType::detect(&filename),
            title: extract_title(&section),
            filename,
            section,
        }
    }

    pub fn filename(&self) -> &str { &self.filename }
    pub fn content_type(&self) -> ContentType { self.content_type }
    pub fn title(&self) -> &str { &self.title }
    pub fn section(&self) -> &str { &self.section }

    /// De-duplication identity used by the fusion layer.
    pub fn key(&self) -> (&str, &str) { (&self.filename, &self.title) }
}

/// First line of a section with leading `#` markers and surrounding
/// whitespace removed. Total: an empty section yields an empty title.
pub fn extract_title(section: &str) -> String {
    section.lines().next().unwrap_or_default().trim_start_matches('#').trim().to_string()
}

/// The frozen, ordered chunk sequence both indexes are built from.
///
/// Cloning is cheap and shares the same allocation, so positions handed out by
/// one index resolve to the same chunk in the other.
#[derive(Debug, Clone)]
pub struct IndexedCorpus {
    chunks: Arc<[Chunk]>,
}

impl IndexedCorpus {
    pub fn new(chunks: Vec<Chunk>) -> Self { Self { chunks: chunks.into() } }
    pub fn len(&self) -> usize { self.chunks.len() }
    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }
    pub fn get(&self, position: usize) -> Option<&Chunk> { self.chunks.get(position) }
    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> { self.chunks.iter() }

    /// True when both handles point at the same frozen corpus.
    pub fn same_as(&self, other: &IndexedCorpus) -> bool { Arc::ptr_eq(&self.chunks, &other.chunks) }
}

impl Default for IndexedCorpus {
    fn default() -> Self { Self::new(Vec::new()) }
}

/// Indicates which engine produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Lexical,
    Vector,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Vector => "vector",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A transient per-query result.
///
/// `score` is engine-specific and only comparable with hits of the same
/// `source`. Serializes flat: the chunk fields followed by `score`/`source`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub chunk: Chunk,
    #[serde(rename = "relevance_score")]
    pub score: f32,
    pub source: SourceKind,
}

impl SearchHit {
    pub fn key(&self) -> (&str, &str) { self.chunk.key() }
}

/// Exact-match restriction on a keyword attribute, e.g. `content_type = assignment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFilter {
    pub field: String,
    pub value: String,
}

impl KeywordFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self { field: field.into(), value: value.into() }
    }

    pub fn content_type(value: ContentType) -> Self { Self::new("content_type", value.as_str()) }
}
