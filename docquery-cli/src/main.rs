//! `docquery` — ask one natural-language question against the document corpus.
//!
//! Retrieval and completion credentials come from the environment
//! (`DOCQUERY_RETRIEVAL_*`, `DOCQUERY_LLM_*`); the local PDF store is a
//! directory tree passed via `--store`. One invocation runs one query and
//! prints the grounded references with their resolved local files.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docquery_core::{Answer, QueryOutcome, ResolvedDocument, RetrievedPassage, format_size};
use docquery_model::ChatClient;
use docquery_rag::{DocumentStore, HttpRetriever, PromptContract, QueryConfig, QueryPipeline};

#[derive(Parser)]
#[command(name = "docquery", version, about = "Query a regulatory document corpus in natural language")]
struct Cli {
    /// The question to answer.
    query: String,

    /// Root directory of the local PDF document store.
    #[arg(long, env = "DOCQUERY_STORE", default_value = "./Data")]
    store: PathBuf,

    /// Number of passages to retrieve.
    #[arg(long, default_value_t = 5)]
    top_k: usize,

    /// Use the minimal prompt contract (citation triple only).
    #[arg(long)]
    minimal: bool,

    /// Also print the raw retrieved passages.
    #[arg(long)]
    show_passages: bool,

    /// Emit the full outcome as JSON instead of formatted text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Environment faults fail fast, before any network call.
    let store = DocumentStore::open(&cli.store)
        .with_context(|| format!("cannot open document store at {}", cli.store.display()))?;

    let contract = if cli.minimal { PromptContract::Minimal } else { PromptContract::Detailed };
    let config = QueryConfig::builder().top_k(cli.top_k).contract(contract).build()?;

    let retriever = HttpRetriever::from_env().context("retrieval service configuration")?;
    let model = ChatClient::from_env().context("completion service configuration")?;

    let pipeline = QueryPipeline::builder()
        .config(config)
        .retriever(Arc::new(retriever))
        .model(Arc::new(model))
        .build()?;

    let outcome = pipeline.answer(&cli.query).await?;
    let resolved = store.resolve_all(outcome.answer.references());

    if cli.json {
        print_json(&outcome, &resolved)?;
    } else {
        print_text(&outcome, &resolved, cli.show_passages);
    }

    Ok(())
}

fn print_json(outcome: &QueryOutcome, resolved: &[ResolvedDocument]) -> anyhow::Result<()> {
    let value = serde_json::json!({
        "answer": outcome.answer,
        "passages": outcome.passages,
        "resolved_documents": resolved,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_text(outcome: &QueryOutcome, resolved: &[ResolvedDocument], show_passages: bool) {
    match &outcome.answer {
        Answer::References { references } => {
            println!("Found {} relevant reference(s)\n", references.len());
            for (reference, resolution) in references.iter().zip(resolved) {
                println!("Document: {}", reference.document_name);
                println!("Section:  {}", reference.section_number);
                println!("Summary:  {}", reference.relevance_summary);
                for excerpt in &reference.key_excerpts {
                    println!("  Excerpt: \"{excerpt}\"");
                }
                if let Some(context) = &reference.technical_context {
                    println!("Context:  {context}");
                }
                match (&resolution.path, resolution.size_bytes) {
                    (Some(path), Some(size)) => {
                        println!("File:     {} ({})", path.display(), format_size(size));
                    }
                    (Some(path), None) => println!("File:     {}", path.display()),
                    (None, _) => {
                        println!("File:     no matching file for '{}'", reference.document_name);
                    }
                }
                println!();
            }
        }
        Answer::NotFound { message } => println!("{message}"),
        Answer::ParseFailure { raw } => {
            println!("Failed to parse the model response. Raw response:\n{raw}");
        }
    }

    if show_passages {
        println!("--- Retrieved passages ---");
        for passage in &outcome.passages {
            let metadata =
                serde_json::to_string(&passage.metadata).unwrap_or_else(|_| "{}".into());
            println!("{}", passage_heading(passage));
            println!("  metadata: {metadata}");
            println!("  {}", passage.content);
        }
    }
}

fn passage_heading(passage: &RetrievedPassage) -> String {
    match passage.score {
        Some(score) => format!("Source {} (score: {score:.2})", passage.rank),
        None => format!("Source {}", passage.rank),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn passage_heading_formats_score_only_when_present() {
        let mut passage = RetrievedPassage {
            rank: 1,
            content: "text".to_string(),
            metadata: BTreeMap::new(),
            score: Some(0.85),
        };
        assert_eq!(passage_heading(&passage), "Source 1 (score: 0.85)");

        passage.score = None;
        assert_eq!(passage_heading(&passage), "Source 1");
    }
}
