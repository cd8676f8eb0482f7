use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use repodoc_core::config::{expand_path, EmbeddingConfig};
use repodoc_core::traits::{Embedder, Similarity};

use crate::device::select_device;
use crate::pool::masked_mean_l2;
use crate::tokenize::tokenize_on_device;

/// Local XLM-RoBERTa sentence embedder (e.g. BGE-M3) with masked mean pooling.
///
/// Expects `tokenizer.json`, `config.json` and `pytorch_model.bin` in the model
/// directory. Output vectors are L2-normalized.
pub struct CandleEmbedder {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
    max_len: usize,
    dim: usize,
    id: String,
}

impl CandleEmbedder {
    pub fn load(config: &EmbeddingConfig) -> Result<Self> {
        let device = select_device();
        let model_dir = resolve_model_dir(config.model_dir.as_deref())?;
        info!(model_dir = %model_dir.display(), "loading embedding model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?)?;
        let dim = raw.get("hidden_size").and_then(serde_json::Value::as_u64).ok_or_else(|| anyhow!("config.json has no hidden_size"))? as usize;
        let model_config: XLMRobertaConfig = serde_json::from_value(raw)?;

        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path).with_context(|| format!("reading {}", weights_path.display()))?;
        let weights_map: HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let model = XLMRobertaModel::new(&model_config, vb)?;

        let name = model_dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "model".to_string());
        let id = format!("candle:{name}:d{dim}:l{}", config.max_len);
        info!(%id, "embedding model loaded");
        Ok(Self { model, tokenizer, device, max_len: config.max_len, dim, id })
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize_on_device(&self.tokenizer, text, self.max_len, &self.device)?;
        let token_type_ids = Tensor::zeros((1, self.max_len), DType::I64, &self.device)?;
        let hidden_states = self.model.forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)?;
        let pooled = masked_mean_l2(&hidden_states, &attention_mask)?;
        let emb = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1::<f32>()?;
        if emb.len() != self.dim {
            return Err(anyhow!("model produced {} dims, expected {}", emb.len(), self.dim));
        }
        let elapsed = start.elapsed();
        if elapsed.as_millis() > 100 { warn!(ms = elapsed.as_millis() as u64, "slow embedding"); } else { debug!(ms = elapsed.as_millis() as u64, "embedded"); }
        Ok(emb)
    }
}

impl Embedder for CandleEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn similarity(&self) -> Similarity { Similarity::Cosine }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { texts.iter().map(|t| self.embed_text(t)).collect() }
}

fn resolve_model_dir(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = configured {
        let p = expand_path(dir);
        if p.exists() { return Ok(p); }
        return Err(anyhow!("configured embedding.model_dir {} does not exist", p.display()));
    }
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            let p = expand_path(&dir);
            if p.exists() { debug!(var, dir = %p.display(), "model dir from env"); return Ok(p); }
        }
    }
    let fallback = Path::new("models/bge-m3");
    if fallback.exists() { return Ok(fallback.to_path_buf()); }
    Err(anyhow!("Could not locate embedding model directory; set embedding.model_dir or APP_MODEL_DIR"))
}
