//! Prompt contract: the fixed system instruction and user-message template.
//!
//! The system instruction is the single most important correctness surface
//! in the pipeline: every rule in the response normalizer exists to tolerate
//! near-but-not-exact compliance with it. Two variants are offered; both
//! demand the same top-level `{"references": [...]}` / `{"error": ...}`
//! output shape, so downstream parsing is contract-independent.

use serde::{Deserialize, Serialize};

/// The exact not-found signal the contract instructs the model to emit.
pub const NOT_FOUND_MESSAGE: &str = "Information not found in available documents.";

const MINIMAL_INSTRUCTION: &str = r#"You are a technical document assistant for regulatory documents. Your task is to identify the specific document name and section number that contains the information relevant to the user's question.

INSTRUCTIONS:
1. Analyze the provided context chunks.
2. Extract the 'Document Name' and 'Section Number' for relevant sources.
3. Return ONLY a valid JSON object. Do not include any conversational text.
4. If the answer is not in the context, return: {"error": "Information not found in available documents."}

OUTPUT FORMAT:
{
  "references": [
    {"document_name": "string", "section_number": "string", "relevance_summary": "string"}
  ]
}"#;

const DETAILED_INSTRUCTION: &str = r#"You are a technical document assistant for regulatory documents. Your task is to identify the specific document name and section number that contains the information relevant to the user's question, and provide comprehensive details about the content found.

INSTRUCTIONS:
1. Analyze the provided context chunks thoroughly.
2. Extract the 'Document Name' and 'Section Number' for relevant sources.
3. Provide a DETAILED relevance_summary (3-5 sentences) explaining:
   - What specific information was found
   - Why this section is relevant to the user's question
   - What technical concepts or data points are covered
4. Extract 2-3 key_excerpts: direct quotes from the text that are most relevant.
5. Provide technical_context: brief explanation of the technical significance.
6. Return ONLY a valid JSON object. Do not include any conversational text.
7. If the answer is not in the context, return: {"error": "Information not found in available documents."}

OUTPUT FORMAT:
{
  "references": [
    {
      "document_name": "string",
      "section_number": "string",
      "relevance_summary": "Detailed 3-5 sentence explanation...",
      "key_excerpts": ["Direct quote 1...", "Direct quote 2..."],
      "technical_context": "Brief technical significance explanation"
    }
  ]
}"#;

/// Which system instruction to issue to the model.
///
/// [`Minimal`](PromptContract::Minimal) asks only for the citation triple;
/// [`Detailed`](PromptContract::Detailed) additionally demands key excerpts
/// and a technical-context note. Both produce the same top-level JSON shape.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PromptContract {
    /// Citation triple only: document name, section number, summary.
    Minimal,
    /// Full extraction: summary, excerpts, technical context.
    #[default]
    Detailed,
}

impl PromptContract {
    /// The fixed system instruction for this contract variant.
    pub fn system_instruction(&self) -> &'static str {
        match self {
            PromptContract::Minimal => MINIMAL_INSTRUCTION,
            PromptContract::Detailed => DETAILED_INSTRUCTION,
        }
    }

    /// Render the deterministic user message for an assembled context and a
    /// query.
    pub fn user_message(&self, context: &str, query: &str) -> String {
        format!("CONTEXT:\n{context}\n\nUSER QUESTION: {query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_variants_demand_json_only_output() {
        for contract in [PromptContract::Minimal, PromptContract::Detailed] {
            let instruction = contract.system_instruction();
            assert!(instruction.contains("Return ONLY a valid JSON object"));
            assert!(instruction.contains(NOT_FOUND_MESSAGE));
            assert!(instruction.contains("\"references\""));
        }
    }

    #[test]
    fn detailed_variant_requests_excerpts_and_context() {
        let instruction = PromptContract::Detailed.system_instruction();
        assert!(instruction.contains("key_excerpts"));
        assert!(instruction.contains("technical_context"));

        let minimal = PromptContract::Minimal.system_instruction();
        assert!(!minimal.contains("key_excerpts"));
    }

    #[test]
    fn user_message_embeds_context_and_query() {
        let message = PromptContract::Detailed.user_message("CTX-BODY", "what is X?");
        assert!(message.starts_with("CONTEXT:\nCTX-BODY"));
        assert!(message.ends_with("USER QUESTION: what is X?"));
    }
}
