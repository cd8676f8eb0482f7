//! Dense vector index over an `IndexedCorpus`.
//!
//! Every chunk is embedded once at build time from its canonical text; queries
//! are embedded raw and scored by an exact scan.

pub mod canonical;
pub mod distance;
pub mod index;

pub use canonical::canonical_text;
pub use index::VectorIndex;
