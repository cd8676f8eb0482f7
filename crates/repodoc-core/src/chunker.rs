//! Heading-based markdown chunking.
//!
//! Every heading of the configured level opens a new section that runs up to
//! the next heading of that level. Text before the first heading is not part of
//! any section.

use rayon::prelude::*;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, ContentType, RawDocument};

pub use crate::types::extract_title;

pub fn detect_content_type(filename: &str) -> ContentType { ContentType::detect(filename) }

#[derive(Debug, Clone)]
pub struct Chunker {
    heading: Regex,
    headerless_fallback: bool,
}

static DEFAULT_CHUNKER: LazyLock<Chunker> = LazyLock::new(|| Chunker {
    heading: Regex::new(r"(?m)^#{2} (.+)$").expect("static heading pattern"),
    headerless_fallback: false,
});

impl Default for Chunker {
    fn default() -> Self { DEFAULT_CHUNKER.clone() }
}

impl Chunker {
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        if !(1..=6).contains(&config.heading_level) {
            return Err(Error::InvalidConfig(format!("heading level must be 1..=6, got {}", config.heading_level)));
        }
        let pattern = format!("(?m)^#{{{}}} (.+)$", config.heading_level);
        let heading = Regex::new(&pattern).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        Ok(Self { heading, headerless_fallback: config.headerless_fallback })
    }

    /// Split markdown into sections, each starting with its heading line.
    ///
    /// A section is the trimmed heading, a blank line, then the trimmed body;
    /// an empty body leaves the heading line alone.
    pub fn split_sections(&self, text: &str) -> Vec<String> {
        let headings: Vec<_> = self.heading.find_iter(text).collect();
        headings
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let end = headings.get(i + 1).map_or(text.len(), |next| next.start());
                let header = m.as_str().trim();
                let body = text[m.end()..end].trim();
                if body.is_empty() { header.to_string() } else { format!("{header}\n\n{body}") }
            })
            .collect()
    }

    pub fn chunk(&self, document: &RawDocument) -> Vec<Chunk> {
        let mut sections = self.split_sections(&document.content);
        if sections.is_empty() {
            let body = document.content.trim();
            if self.headerless_fallback && !body.is_empty() {
                sections.push(body.to_string());
            } else {
                debug!(filename = %document.filename, "no headings, document yields no chunks");
            }
        }
        sections.into_iter().map(|section| Chunk::new(document.filename.as_str(), section)).collect()
    }

    /// Chunk a batch of documents in parallel, keeping document order.
    pub fn chunk_documents(&self, documents: &[RawDocument]) -> Vec<Chunk> {
        let per_doc: Vec<Vec<Chunk>> = documents.par_iter().map(|d| self.chunk(d)).collect();
        let empty = per_doc.iter().filter(|c| c.is_empty()).count();
        let chunks: Vec<Chunk> = per_doc.into_iter().flatten().collect();
        info!(documents = documents.len(), chunks = chunks.len(), without_sections = empty, "chunking completed");
        chunks
    }
}

/// Chunk one document with the default level-2 chunker.
pub fn chunk(document: &RawDocument) -> Vec<Chunk> { DEFAULT_CHUNKER.chunk(document) }
