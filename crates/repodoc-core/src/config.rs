//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (nested keys separated by `__`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract and validate the typed settings tree.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub corpus: CorpusConfig,
    pub chunking: ChunkingConfig,
    pub lexical: LexicalConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !(1..=6).contains(&self.chunking.heading_level) {
            return Err(Error::InvalidConfig(format!("chunking.heading_level must be 1..=6, got {}", self.chunking.heading_level)));
        }
        if self.retrieval.k == 0 { return Err(Error::InvalidConfig("retrieval.k must be > 0".into())); }
        if self.embedding.batch_size == 0 { return Err(Error::InvalidConfig("embedding.batch_size must be > 0".into())); }
        if self.embedding.dim == 0 { return Err(Error::InvalidConfig("embedding.dim must be > 0".into())); }
        if self.lexical.writer_memory_bytes < 15_000_000 {
            return Err(Error::InvalidConfig("lexical.writer_memory_bytes must be at least 15MB".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub root: String,
    pub allowed_files: Vec<String>,
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: ".".into(),
            allowed_files: vec!["readme.md".into(), "assignment.md".into()],
            extensions: vec!["md".into(), "mdx".into()],
            exclude_dirs: vec!["/translations/".into()],
        }
    }
}

impl CorpusConfig {
    pub fn root_path(&self) -> PathBuf { expand_path(&self.root) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub heading_level: usize,
    pub headerless_fallback: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self { Self { heading_level: 2, headerless_fallback: false } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalConfig {
    pub writer_memory_bytes: usize,
}

impl Default for LexicalConfig {
    fn default() -> Self { Self { writer_memory_bytes: 50_000_000 } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    Hash,
    Candle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub dim: usize,
    pub model_dir: Option<String>,
    pub max_len: usize,
    pub batch_size: usize,
    /// Worker threads used while embedding the corpus; 0 means one per core.
    pub concurrency: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { backend: EmbeddingBackend::Hash, dim: 384, model_dir: None, max_len: 256, batch_size: 32, concurrency: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self { Self { k: 5 } }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
