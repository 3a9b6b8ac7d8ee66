//! Renders retrieved documents into the context block a chat prompt embeds.

use std::fmt::Write;

use crate::llm::sanitize_for_prompt;
use crate::models::SearchResult;

/// Per-document cap on characters copied into the prompt.
const MAX_DOC_CHARS: usize = 4000;

/// Format search results as a knowledge-base context block for the chat LLM.
pub fn build_context_block(results: &[SearchResult]) -> String {
    let mut ctx = String::from("Here is relevant information from the knowledge base:\n\n");

    if results.is_empty() {
        ctx.push_str("(No relevant documents were found for this question.)\n");
        return ctx;
    }

    for result in results {
        let content = sanitize_for_prompt(&truncate_to_char_boundary(
            result.content.trim(),
            MAX_DOC_CHARS,
        ));
        let _ = write!(
            ctx,
            "--- {} ({}) ---\n{}\n\n",
            sanitize_for_prompt(&result.title),
            result.path,
            content
        );
    }

    ctx
}

fn truncate_to_char_boundary(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
