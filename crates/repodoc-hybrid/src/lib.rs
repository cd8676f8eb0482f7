//! Fusion of lexical and vector retrieval, and the surface exposed to agents.

pub mod engine;
pub mod fusion;
pub mod tools;

pub use engine::{CorpusStats, HybridSearchEngine};
pub use fusion::{fuse, hybrid_search};
pub use tools::{SearchTools, SectionRecord, ToolDefinition};
