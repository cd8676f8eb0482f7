use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, INDEXED, STORED, STRING};
use tantivy::tokenizer::{Language, LowerCaser, SimpleTokenizer, Stemmer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

pub const TOKENIZER: &str = "text_with_stopwords";

/// Free-text fields searched by the query parser.
pub const TEXT_FIELDS: [&str; 3] = ["title", "section", "filename"];
/// Exact-match attributes usable as filters.
pub const KEYWORD_FIELDS: [&str; 1] = ["content_type"];

#[derive(Debug, Clone, Copy)]
pub struct Fields {
	pub title: Field,
	pub section: Field,
	pub filename: Field,
	pub content_type: Field,
	pub position: Field,
}

impl Fields {
	pub fn text(&self) -> Vec<Field> { vec![self.title, self.section, self.filename] }

	pub fn keyword(&self, name: &str) -> Option<Field> {
		match name {
			"content_type" => Some(self.content_type),
			_ => None,
		}
	}
}

pub fn build_schema() -> (Schema, Fields) {
	let mut schema_builder = Schema::builder();
	let text_field_indexing = TextFieldIndexing::default().set_tokenizer(TOKENIZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let text_options = TextOptions::default().set_indexing_options(text_field_indexing);
	let title = schema_builder.add_text_field("title", text_options.clone());
	let section = schema_builder.add_text_field("section", text_options.clone());
	let filename = schema_builder.add_text_field("filename", text_options);
	let content_type = schema_builder.add_text_field("content_type", STRING | STORED);
	let position = schema_builder.add_u64_field("position", INDEXED | STORED);
	(schema_builder.build(), Fields { title, section, filename, content_type, position })
}

pub fn register_tokenizer(index: &Index) {
	let stop_words = vec![
		"a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","them","their","there","then","than","so","if","when","where","why","how","what","which","who","whom","whose","can","could","should","would","may","might","must","shall","do","does","did","have","had","having",
	];
	let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(stop_words.into_iter().map(|s| s.to_string())))
		.filter(Stemmer::new(Language::English))
		.build();
	index.tokenizers().register(TOKENIZER, tokenizer);
}
