use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, ConstScoreQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::{IndexRecordOption, Value};
use tantivy::{TantivyDocument, Term};
use tracing::debug;

use repodoc_core::error::{Error, Result};
use repodoc_core::traits::LexicalSearcher;
use repodoc_core::{KeywordFilter, SearchHit, SourceKind};

use crate::index::LexicalIndex;
use crate::tantivy_utils::KEYWORD_FIELDS;

impl LexicalIndex {
	/// Builds the scored text query plus an optional zero-score filter clause.
	fn build_query(&self, query: &str, filter: Option<&KeywordFilter>) -> Result<Box<dyn Query>> {
		let qp = QueryParser::for_index(&self.index, self.fields.text());
		let (text_query, errors) = qp.parse_query_lenient(query);
		if !errors.is_empty() {
			debug!(query, errors = errors.len(), "query parsed leniently");
		}
		let Some(filter) = filter else { return Ok(text_query) };

		let field = self.fields.keyword(&filter.field).ok_or_else(|| {
			Error::UnknownFilterField(format!("{} (filterable: {})", filter.field, KEYWORD_FIELDS.join(", ")))
		})?;
		let term_query = TermQuery::new(Term::from_field_text(field, &filter.value), IndexRecordOption::Basic);
		let filter_query: Box<dyn Query> = Box::new(ConstScoreQuery::new(Box::new(term_query), 0.0));
		Ok(Box::new(BooleanQuery::new(vec![(Occur::Must, text_query), (Occur::Must, filter_query)])))
	}
}

impl LexicalSearcher for LexicalIndex {
	fn search(&self, query: &str, k: usize, filter: Option<&KeywordFilter>) -> Result<Vec<SearchHit>> {
		let q = self.build_query(query, filter)?;
		if k == 0 || query.trim().is_empty() || self.corpus.is_empty() {
			return Ok(Vec::new());
		}
		let searcher = self.reader.searcher();
		let top_docs = searcher.search(&*q, &TopDocs::with_limit(k)).map_err(Error::lexical)?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr).map_err(Error::lexical)?;
			let chunk = doc
				.get_first(self.fields.position)
				.and_then(|v| v.as_u64())
				.and_then(|p| usize::try_from(p).ok())
				.and_then(|p| self.corpus.get(p))
				.ok_or_else(|| Error::lexical(std::io::Error::other(format!("document {addr:?} has no valid position"))))?;
			hits.push(SearchHit { chunk: chunk.clone(), score, source: SourceKind::Lexical });
		}
		debug!(query, k, hits = hits.len(), "lexical search");
		Ok(hits)
	}
}
