//! repodoc-text
//!
//! Tantivy-based lexical index over section chunks. The index lives in RAM, is
//! built once from an `IndexedCorpus` and is read-only afterwards.

pub mod index;
pub mod search;
pub mod tantivy_utils;

pub use index::LexicalIndex;
