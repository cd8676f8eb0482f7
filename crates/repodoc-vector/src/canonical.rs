use repodoc_core::Chunk;

/// Text embedded for a chunk: title, section and the basename of the filename,
/// joined by blank lines. Empty parts are skipped without leaving separators.
///
/// Queries are embedded raw and never pass through here.
pub fn canonical_text(chunk: &Chunk) -> String {
    let basename = chunk.filename().rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    [chunk.title(), chunk.section(), basename].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join("\n\n")
}
