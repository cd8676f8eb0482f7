pub mod chunker;
pub mod config;
pub mod error;
pub mod source;
pub mod traits;
pub mod types;

pub use chunker::Chunker;
pub use error::{Error, Result};
pub use types::{Chunk, ContentType, IndexedCorpus, KeywordFilter, RawDocument, SearchHit, SourceKind};
