//! Context assembly: ranked passages → one bounded text block.

use docquery_core::RetrievedPassage;

/// Render retrieved passages into a single source-delimited context block.
///
/// Each passage becomes a block carrying its 1-based source index, its full
/// metadata rendered as a compact JSON object, and its raw content,
/// unmodified and untruncated — the model must see complete provenance per
/// excerpt. No summarization or deduplication is performed. An empty input
/// yields an empty string; the prompt contract then steers the model to the
/// structured not-found signal.
pub fn assemble_context(passages: &[RetrievedPassage]) -> String {
    let mut context = String::new();
    for passage in passages {
        let metadata = serde_json::to_string(&passage.metadata).unwrap_or_else(|_| "{}".into());
        context.push_str(&format!(
            "\n--- Source {} ---\nMETADATA: {}\nCONTENT: {}\n",
            passage.rank, metadata, passage.content
        ));
    }
    context
}
