use std::fs;
use tempfile::TempDir;

use repodoc_core::config::{Config, CorpusConfig, EmbeddingBackend};
use repodoc_core::source::DirectorySource;
use repodoc_core::{Chunker, ContentType};

fn write(dir: &std::path::Path, rel: &str, body: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, body).expect("write");
}

#[test]
fn directory_source_filters_and_strips_front_matter() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "2-js/README.md", "---\nlesson: 2\n---\n## Variables\nlet x = 1;\n## Functions\nfn");
    write(root, "2-js/assignment.md", "## Practice\nwrite code");
    write(root, "1-intro/README.md", "# Intro only\nno sections here");
    write(root, "1-intro/notes.md", "## Ignored\nnot allowed");
    write(root, "1-intro/translations/README.md", "## Hola\nignored");
    write(root, "1-intro/image.png", "binary");

    let source = DirectorySource::new(root, &CorpusConfig::default());
    let docs = source.load().expect("load");
    let names: Vec<_> = docs.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, ["1-intro/README.md", "2-js/README.md", "2-js/assignment.md"]);
    assert_eq!(docs[1].metadata.get("lesson").map(String::as_str), Some("2"));
    assert!(docs[1].content.starts_with("## Variables"));

    let chunks = Chunker::default().chunk_documents(&docs);
    let keys: Vec<_> = chunks.iter().map(|c| (c.filename(), c.title(), c.content_type())).collect();
    assert_eq!(
        keys,
        [
            ("2-js/README.md", "Variables", ContentType::Learning),
            ("2-js/README.md", "Functions", ContentType::Learning),
            ("2-js/assignment.md", "Practice", ContentType::Assignment),
        ]
    );
}

#[test]
fn missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let source = DirectorySource::new(tmp.path().join("absent"), &CorpusConfig::default());
    assert!(source.load().is_err());
}

#[test]
fn config_defaults_when_no_files() {
    figment::Jail::expect_with(|_jail| {
        let settings = Config::load().expect("load").settings().expect("settings");
        assert_eq!(settings.retrieval.k, 5);
        assert_eq!(settings.chunking.heading_level, 2);
        assert!(!settings.chunking.headerless_fallback);
        assert_eq!(settings.embedding.backend, EmbeddingBackend::Hash);
        assert_eq!(settings.corpus.allowed_files, ["readme.md", "assignment.md"]);
        Ok(())
    });
}

#[test]
fn config_layers_file_env_and_env_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[retrieval]\nk = 7\n[corpus]\nroot = \"~/course\"\n[embedding]\ndim = 64")?;
        jail.create_file("config.test.toml", "[chunking]\nheaderless_fallback = true")?;
        jail.set_env("RUST_ENV", "test");
        jail.set_env("APP_EMBEDDING__BATCH_SIZE", "4");

        let config = Config::load().expect("load");
        let settings = config.settings().expect("settings");
        assert_eq!(settings.retrieval.k, 7);
        assert_eq!(settings.embedding.dim, 64);
        assert_eq!(settings.embedding.batch_size, 4);
        assert!(settings.chunking.headerless_fallback);
        assert_eq!(settings.corpus.root, "~/course");
        assert_eq!(config.get::<usize>("retrieval.k").expect("k"), 7);
        Ok(())
    });
}

#[test]
fn config_validation_rejects_zero_k() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[retrieval]\nk = 0")?;
        assert!(Config::load().expect("load").settings().is_err());
        Ok(())
    });
}
