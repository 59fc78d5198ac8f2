//! End-to-end pipeline tests with a static retriever and a scripted model.

use std::collections::BTreeMap;
use std::sync::Arc;

use docquery_core::{Answer, RetrievedPassage, format_size};
use docquery_model::MockCompletion;
use docquery_rag::{DocumentStore, QueryConfig, QueryPipeline, StaticRetriever};

fn passage(content: &str, file_name: &str) -> RetrievedPassage {
    let mut metadata = BTreeMap::new();
    metadata.insert("file_name".to_string(), serde_json::json!(file_name));
    RetrievedPassage { rank: 0, content: content.to_string(), metadata, score: Some(0.85) }
}

fn pipeline(retriever: StaticRetriever, model: MockCompletion) -> QueryPipeline {
    QueryPipeline::builder()
        .config(QueryConfig::default())
        .retriever(Arc::new(retriever))
        .model(Arc::new(model))
        .build()
        .unwrap()
}

#[tokio::test]
async fn empty_retrieval_still_completes() {
    let model = MockCompletion::with_reply(
        r#"{"error": "Information not found in available documents."}"#,
    );
    let pipeline = pipeline(StaticRetriever::empty(), model);

    let outcome = pipeline.answer("anything at all").await.unwrap();
    assert!(outcome.passages.is_empty());
    assert!(matches!(outcome.answer, Answer::NotFound { .. }));
}

#[tokio::test]
async fn empty_retrieval_sends_empty_context_block() {
    let model = Arc::new(MockCompletion::with_reply(r#"{"error": "nothing"}"#));
    let pipeline = QueryPipeline::builder()
        .retriever(Arc::new(StaticRetriever::empty()))
        .model(model.clone())
        .build()
        .unwrap();

    pipeline.answer("q").await.unwrap();

    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].content.starts_with("CONTEXT:\n\n\nUSER QUESTION: q"));
    assert!(requests[0].system_instruction.is_some());
}

#[tokio::test]
async fn grounded_answer_resolves_to_local_file() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("IN-2015-03.pdf"), vec![0u8; 2048]).unwrap();

    let retriever = StaticRetriever::new(vec![
        passage("Cracking was observed in austenitic stainless steel piping.", "IN-2015-03.pdf"),
        passage("Chloride exposure accelerated the degradation.", "IN-2015-03.pdf"),
    ]);
    let reply = serde_json::json!({
        "references": [{
            "document_name": "IN-2015-03",
            "section_number": "4.2",
            "relevance_summary": "Describes stress corrosion cracking findings in stainless piping.",
            "key_excerpts": ["Cracking was observed in austenitic stainless steel piping."],
            "technical_context": "Chloride-induced SCC."
        }]
    });
    let pipeline = pipeline(retriever, MockCompletion::with_reply(reply.to_string()));

    let outcome = pipeline.answer("stress corrosion cracking").await.unwrap();
    assert_eq!(outcome.passages.len(), 2);

    let references = outcome.answer.references();
    assert_eq!(references.len(), 1);

    let store = DocumentStore::open(temp.path()).unwrap();
    let resolved = store.resolve_all(references);
    let path = resolved[0].path.as_ref().expect("document must resolve");
    assert_eq!(path.file_name().unwrap(), "IN-2015-03.pdf");
    assert_eq!(format_size(resolved[0].size_bytes.unwrap()), "2.0 KB");
}

#[tokio::test]
async fn fenced_completion_parses_end_to_end() {
    let reply = "```json\n{\"references\": [{\"document_name\": \"GL-96-06\", \
                 \"section_number\": \"3\", \"relevance_summary\": \"Containment cooling.\"}]}\n```";
    let pipeline = pipeline(
        StaticRetriever::new(vec![passage("containment cooling water systems", "GL-96-06.pdf")]),
        MockCompletion::with_reply(reply),
    );

    let outcome = pipeline.answer("containment cooling").await.unwrap();
    assert_eq!(outcome.answer.references().len(), 1);
}

#[tokio::test]
async fn completion_failure_becomes_error_sentinel_parse_failure() {
    let pipeline = pipeline(
        StaticRetriever::new(vec![passage("some content", "a.pdf")]),
        MockCompletion::failing("connection refused"),
    );

    let outcome = pipeline.answer("q").await.unwrap();
    match outcome.answer {
        Answer::ParseFailure { raw } => {
            assert!(raw.starts_with("Error: "), "raw was: {raw}");
            assert!(raw.contains("connection refused"));
        }
        other => panic!("expected ParseFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_completion_is_reported_not_thrown() {
    let pipeline = pipeline(
        StaticRetriever::new(vec![passage("content", "a.pdf")]),
        MockCompletion::with_reply("Sure, here is the answer: {not json}"),
    );

    let outcome = pipeline.answer("q").await.unwrap();
    match outcome.answer {
        Answer::ParseFailure { raw } => {
            assert_eq!(raw, "Sure, here is the answer: {not json}");
        }
        other => panic!("expected ParseFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn context_round_trip_preserves_source_indices() {
    let retriever = StaticRetriever::new(vec![
        passage("alpha content", "a.pdf"),
        passage("beta content", "b.pdf"),
        passage("gamma content", "c.pdf"),
    ]);
    // Echo the full user message back as the relevance summary.
    let model = MockCompletion::with_fn(|request| {
        let reply = serde_json::json!({
            "references": [{
                "document_name": "echo",
                "section_number": "-",
                "relevance_summary": request.content,
            }]
        });
        Ok(reply.to_string())
    });
    let pipeline = pipeline(retriever, model);

    let outcome = pipeline.answer("echo test").await.unwrap();
    let summary = &outcome.answer.references()[0].relevance_summary;
    for index in 1..=3 {
        assert!(
            summary.contains(&format!("--- Source {index} ---")),
            "missing source {index} in: {summary}"
        );
    }
}

#[tokio::test]
async fn top_k_bounds_the_context() {
    let retriever = StaticRetriever::new(vec![
        passage("one", "a.pdf"),
        passage("two", "b.pdf"),
        passage("three", "c.pdf"),
    ]);
    let model = Arc::new(MockCompletion::with_reply(r#"{"error": "nothing"}"#));
    let pipeline = QueryPipeline::builder()
        .config(QueryConfig::builder().top_k(2).build().unwrap())
        .retriever(Arc::new(retriever))
        .model(model.clone())
        .build()
        .unwrap();

    let outcome = pipeline.answer("q").await.unwrap();
    assert_eq!(outcome.passages.len(), 2);

    let content = &model.requests()[0].content;
    assert!(content.contains("--- Source 2 ---"));
    assert!(!content.contains("--- Source 3 ---"));
}

#[tokio::test]
async fn configured_temperature_reaches_the_model() {
    let model = Arc::new(MockCompletion::with_reply(r#"{"error": "nothing"}"#));
    let pipeline = QueryPipeline::builder()
        .config(QueryConfig::builder().temperature(0.05).build().unwrap())
        .retriever(Arc::new(StaticRetriever::new(vec![passage("content", "a.pdf")])))
        .model(model.clone())
        .build()
        .unwrap();

    pipeline.answer("q").await.unwrap();

    assert_eq!(model.requests()[0].temperature, Some(0.05));
}

#[test]
fn builder_requires_retriever_and_model() {
    assert!(QueryPipeline::builder().build().is_err());
    assert!(
        QueryPipeline::builder().retriever(Arc::new(StaticRetriever::empty())).build().is_err()
    );
}
