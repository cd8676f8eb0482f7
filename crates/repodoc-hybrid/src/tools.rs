//! Tool-calling surface for an LLM agent.
//!
//! `hybrid_search` is the agent's grounding tool. `search_learning` and
//! `search_assignments` are lexical searches restricted by content type.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use repodoc_core::error::{Error, Result};
use repodoc_core::traits::{LexicalSearcher, VectorSearcher};
use repodoc_core::{ContentType, SearchHit};

use crate::engine::HybridSearchEngine;

pub const HYBRID_SEARCH: &str = "hybrid_search";
pub const SEARCH_LEARNING: &str = "search_learning";
pub const SEARCH_ASSIGNMENTS: &str = "search_assignments";

/// What a tool call returns per hit. Callers must treat any further fields as
/// optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub filename: String,
    pub content_type: ContentType,
    pub title: String,
    pub section: String,
}

impl From<&SearchHit> for SectionRecord {
    fn from(hit: &SearchHit) -> Self {
        Self {
            filename: hit.chunk.filename().to_string(),
            content_type: hit.chunk.content_type(),
            title: hit.chunk.title().to_string(),
            section: hit.chunk.section().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct QueryArgs {
    query: String,
}

pub struct SearchTools<'e, L, V>
where
    L: LexicalSearcher,
    V: VectorSearcher,
{
    engine: &'e HybridSearchEngine<L, V>,
}

impl<'e, L, V> SearchTools<'e, L, V>
where
    L: LexicalSearcher,
    V: VectorSearcher,
{
    pub fn new(engine: &'e HybridSearchEngine<L, V>) -> Self { Self { engine } }

    /// Keyword and semantic search over the course material, de-duplicated by
    /// section.
    pub fn hybrid_search(&self, query: &str) -> Result<Vec<SectionRecord>> { Ok(records(&self.engine.search(query)?)) }

    pub fn search_learning(&self, query: &str) -> Result<Vec<SectionRecord>> {
        Ok(records(&self.engine.search_content_type(query, ContentType::Learning)?))
    }

    pub fn search_assignments(&self, query: &str) -> Result<Vec<SectionRecord>> {
        Ok(records(&self.engine.search_content_type(query, ContentType::Assignment)?))
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        [
            (HYBRID_SEARCH, "Search the course repository by keywords and meaning. Returns matching sections with their filename, content type and title."),
            (SEARCH_LEARNING, "Keyword search restricted to learning material (lessons and READMEs)."),
            (SEARCH_ASSIGNMENTS, "Keyword search restricted to assignments."),
        ]
        .into_iter()
        .map(|(name, description)| ToolDefinition {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Natural-language question or keywords." }
                },
                "required": ["query"],
                "additionalProperties": false,
            }),
        })
        .collect()
    }

    /// Dispatch a tool call by name. `arguments` is the JSON object the agent
    /// produced; the result is a JSON array of section records.
    pub fn call(&self, name: &str, arguments: &Value) -> Result<Value> {
        if ![HYBRID_SEARCH, SEARCH_LEARNING, SEARCH_ASSIGNMENTS].contains(&name) {
            return Err(Error::UnknownTool(name.to_string()));
        }
        let args: QueryArgs = serde_json::from_value(arguments.clone()).map_err(|e| Error::InvalidArguments(format!("{name}: {e}")))?;
        let found = match name {
            SEARCH_LEARNING => self.search_learning(&args.query)?,
            SEARCH_ASSIGNMENTS => self.search_assignments(&args.query)?,
            _ => self.hybrid_search(&args.query)?,
        };
        debug!(tool = name, results = found.len(), "tool call");
        Ok(serde_json::to_value(&found)?)
    }
}

fn records(hits: &[SearchHit]) -> Vec<SectionRecord> { hits.iter().map(SectionRecord::from).collect() }
