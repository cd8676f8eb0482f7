use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy};
use tracing::info;

use repodoc_core::config::LexicalConfig;
use repodoc_core::error::{Error, Result};
use repodoc_core::IndexedCorpus;

use crate::tantivy_utils::{build_schema, register_tokenizer, Fields};

/// Immutable in-RAM lexical index over an `IndexedCorpus`.
///
/// Documents are written by a single writer thread and committed once, so the
/// index is one segment and scoring is identical across rebuilds.
pub struct LexicalIndex {
	pub(crate) index: Index,
	pub(crate) reader: IndexReader,
	pub(crate) fields: Fields,
	pub(crate) corpus: IndexedCorpus,
}

impl LexicalIndex {
	pub fn build(corpus: &IndexedCorpus, config: &LexicalConfig) -> Result<Self> {
		let (schema, fields) = build_schema();
		let index = Index::create_in_ram(schema);
		register_tokenizer(&index);

		let mut index_writer: IndexWriter = index.writer_with_num_threads(1, config.writer_memory_bytes).map_err(Error::lexical)?;
		for (position, c) in corpus.iter().enumerate() {
			let doc = doc!(
				fields.title => c.title(),
				fields.section => c.section(),
				fields.filename => c.filename(),
				fields.content_type => c.content_type().as_str(),
				fields.position => position as u64,
			);
			index_writer.add_document(doc).map_err(Error::lexical)?;
		}
		index_writer.commit().map_err(Error::lexical)?;

		let reader: IndexReader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into().map_err(Error::lexical)?;
		info!(chunks = corpus.len(), "lexical index built");
		Ok(Self { index, reader, fields, corpus: corpus.clone() })
	}

	pub fn corpus(&self) -> &IndexedCorpus { &self.corpus }

	pub fn len(&self) -> usize { self.corpus.len() }

	pub fn is_empty(&self) -> bool { self.corpus.is_empty() }

	/// Number of documents visible to searchers; equals `len()` after build.
	pub fn num_docs(&self) -> u64 { self.reader.searcher().num_docs() }
}
