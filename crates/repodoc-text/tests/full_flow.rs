use repodoc_core::config::LexicalConfig;
use repodoc_core::traits::LexicalSearcher;
use repodoc_core::{Chunker, ContentType, IndexedCorpus, KeywordFilter, RawDocument, SourceKind};
use repodoc_text::LexicalIndex;

fn corpus() -> IndexedCorpus {
    let docs = vec![
        RawDocument::new(
            "2-js-basics/1-data-types/README.md",
            "## Variables\nVariables store values. Use let and const to declare variables.\n\
             ## Data Types\nStrings, numbers and booleans are primitive data types.",
        ),
        RawDocument::new(
            "2-js-basics/1-data-types/assignment.md",
            "## Data Types Practice\nList the data types you would use for a shopping cart.",
        ),
        RawDocument::new(
            "3-terrarium/1-intro-to-html/README.md",
            "## HTML Elements\nAn element is made of tags.\n## Closures\nA closure captures variables from its scope.",
        ),
        RawDocument::new("3-terrarium/1-intro-to-html/assignment.md", "## Build a page\nCreate an HTML page with elements."),
    ];
    IndexedCorpus::new(Chunker::default().chunk_documents(&docs))
}

fn build(corpus: &IndexedCorpus) -> LexicalIndex { LexicalIndex::build(corpus, &LexicalConfig::default()).expect("build") }

#[test]
fn indexes_every_chunk() {
    let corpus = corpus();
    let index = build(&corpus);
    assert_eq!(index.len(), 6);
    assert_eq!(index.num_docs(), 6);
    assert!(index.corpus().same_as(&corpus));
}

#[test]
fn ranks_by_term_overlap() {
    let index = build(&corpus());
    let hits = index.search("declare variables with let", 3, None).expect("search");
    assert!(!hits.is_empty());
    assert!(hits.len() <= 3);
    assert_eq!(hits[0].chunk.title(), "Variables");
    assert!(hits.iter().all(|h| h.source == SourceKind::Lexical));
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn natural_language_questions_never_fail_to_parse() {
    let index = build(&corpus());
    for q in ["What is a closure?", "\"unbalanced quote", "title:(", "a AND OR", "+-*&^%"] {
        assert!(index.search(q, 5, None).is_ok(), "query {q:?} failed");
    }
    let hits = index.search("What is a closure?", 5, None).expect("search");
    assert_eq!(hits[0].chunk.title(), "Closures");
}

#[test]
fn filename_is_searchable() {
    let index = build(&corpus());
    let hits = index.search("terrarium", 10, None).expect("search");
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| h.chunk.filename().starts_with("3-terrarium/")));
}

#[test]
fn content_type_filter_is_exact_and_does_not_rescore() {
    let index = build(&corpus());
    let filter = KeywordFilter::content_type(ContentType::Assignment);
    let hits = index.search("data types html", 10, Some(&filter)).expect("search");
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.chunk.content_type() == ContentType::Assignment));

    let unfiltered = index.search("data types html", 10, None).expect("search");
    for hit in &hits {
        let same = unfiltered.iter().find(|u| u.key() == hit.key()).expect("present unfiltered");
        assert!((same.score - hit.score).abs() < 1e-5);
    }

    let learning = index.search("data types", 10, Some(&KeywordFilter::content_type(ContentType::Learning))).expect("search");
    assert!(learning.iter().all(|h| h.chunk.content_type() == ContentType::Learning));
}

#[test]
fn unknown_filter_field_is_rejected() {
    let index = build(&corpus());
    let err = index.search("data", 5, Some(&KeywordFilter::new("title", "Variables"))).unwrap_err();
    assert!(err.to_string().contains("title"));
}

#[test]
fn degenerate_inputs_return_empty() {
    let index = build(&corpus());
    assert!(index.search("", 5, None).expect("empty query").is_empty());
    assert!(index.search("   ", 5, None).expect("blank query").is_empty());
    assert!(index.search("variables", 0, None).expect("k=0").is_empty());
    assert!(index.search("kubernetes", 5, None).expect("no match").is_empty());
    assert!(index.search("the and of", 5, None).expect("stop words").is_empty());

    let empty = build(&IndexedCorpus::default());
    assert!(empty.is_empty());
    assert!(empty.search("anything", 5, None).expect("empty corpus").is_empty());
}

#[test]
fn rebuilding_gives_identical_results() {
    let corpus = corpus();
    let a = build(&corpus).search("data types variables", 5, None).expect("a");
    let b = build(&corpus).search("data types variables", 5, None).expect("b");
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.key(), y.key());
        assert_eq!(x.score.to_bits(), y.score.to_bits());
    }
}

#[test]
fn colliding_keys_do_not_break_indexing() {
    let docs = vec![RawDocument::new("x/README.md", "## Task\nfirst task\n## Task\nsecond task")];
    let corpus = IndexedCorpus::new(Chunker::default().chunk_documents(&docs));
    let hits = build(&corpus).search("task", 5, None).expect("search");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].key(), hits[1].key());
}
