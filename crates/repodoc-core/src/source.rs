//! Loads raw markdown documents from an unpacked course repository.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::CorpusConfig;
use crate::error::{Error, Result};
use crate::types::{Meta, RawDocument};

#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    allowed_files: Vec<String>,
    extensions: Vec<String>,
    exclude_dirs: Vec<String>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, config: &CorpusConfig) -> Self {
        Self {
            root: root.into(),
            allowed_files: config.allowed_files.iter().map(|f| f.to_lowercase()).collect(),
            extensions: config.extensions.iter().map(|e| e.to_lowercase()).collect(),
            exclude_dirs: config.exclude_dirs.clone(),
        }
    }

    pub fn from_config(config: &CorpusConfig) -> Self { Self::new(config.root_path(), config) }

    pub fn root(&self) -> &Path { &self.root }

    /// Read every allowed document under the root, sorted by relative path.
    pub fn load(&self) -> Result<Vec<RawDocument>> {
        if !self.root.is_dir() {
            return Err(Error::io(&self.root, std::io::Error::new(std::io::ErrorKind::NotFound, "corpus root is not a directory")));
        }
        let mut documents = Vec::new();
        for path in self.list_files() {
            let filename = self.relative_name(&path);
            let raw = read_file_content(&path)?;
            let (metadata, content) = split_front_matter(&raw);
            debug!(%filename, metadata = metadata.len(), "loaded document");
            documents.push(RawDocument { filename, content: content.to_string(), metadata });
        }
        info!(root = %self.root.display(), documents = documents.len(), "documents loaded");
        Ok(documents)
    }

    fn list_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|p| self.accepts(&self.relative_name(p)))
            .collect();
        files.sort();
        files
    }

    /// Allow-list check on a `/`-separated relative filename.
    pub fn accepts(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        let basename = lower.rsplit('/').next().unwrap_or_default();
        let extension_ok = basename.rsplit_once('.').is_some_and(|(_, ext)| self.extensions.iter().any(|e| e == ext));
        if !extension_ok || !self.allowed_files.iter().any(|f| f == basename) {
            return false;
        }
        let rooted = format!("/{filename}");
        !self.exclude_dirs.iter().any(|d| rooted.contains(d.as_str()))
    }

    fn relative_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
    }
}

fn read_file_content(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Split a leading `---` delimited front matter block into flat key/value
/// metadata and the remaining body. Missing or unclosed front matter leaves the
/// text untouched.
pub fn split_front_matter(text: &str) -> (Meta, &str) {
    let mut meta = Meta::new();
    let trimmed = text.trim_start_matches('\u{feff}');
    let Some(after_open) = trimmed.strip_prefix("---") else { return (meta, text) };
    let Some(after_open) = after_open.strip_prefix('\n').or_else(|| after_open.strip_prefix("\r\n")) else {
        return (meta, text);
    };
    let Some(close) = find_closing_delimiter(after_open) else { return (meta, text) };

    for line in after_open[..close].lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
            meta.insert(key.trim().to_string(), value.to_string());
        }
    }
    let rest = &after_open[close..];
    let body = rest.trim_start_matches('-').trim_start_matches('\r').trim_start_matches('\n');
    (meta, body)
}

fn find_closing_delimiter(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_end() == "---" { return Some(offset); }
        offset += line.len();
    }
    None
}
