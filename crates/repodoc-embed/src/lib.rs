//! Embedding capabilities for the vector index.
//!
//! `HashEmbedder` is always available. The transformer-backed `CandleEmbedder`
//! is compiled with the `candle` feature (`metal` additionally enables Apple GPUs).

use anyhow::Result;
use tracing::info;

use repodoc_core::config::{EmbeddingBackend, EmbeddingConfig};
pub use repodoc_core::traits::{Embedder, Similarity};

pub mod hash;
pub use hash::HashEmbedder;

#[cfg(feature = "candle")]
pub mod device;
#[cfg(feature = "candle")]
pub mod model;
#[cfg(feature = "candle")]
pub mod pool;
#[cfg(feature = "candle")]
pub mod tokenize;

#[cfg(feature = "candle")]
pub use model::CandleEmbedder;
#[cfg(feature = "candle")]
pub use pool::masked_mean_l2;

/// True when `APP_USE_FAKE_EMBEDDINGS` is `1`/`true`.
pub fn fake_embeddings_forced() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Construct the embedder selected by configuration.
pub fn get_default_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    if fake_embeddings_forced() || config.backend == EmbeddingBackend::Hash {
        info!(dim = config.dim, "using hash embedder");
        return Ok(Box::new(HashEmbedder::new(config.dim)));
    }
    load_candle(config)
}

#[cfg(feature = "candle")]
fn load_candle(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> { Ok(Box::new(CandleEmbedder::load(config)?)) }

#[cfg(not(feature = "candle"))]
fn load_candle(_config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    anyhow::bail!("embedding.backend = \"candle\" requires building repodoc-embed with the `candle` feature")
}
