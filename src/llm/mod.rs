//! LLM-backed re-ranking: the oracle abstraction, its HTTP implementation,
//! and the tolerant ranking client built on top.

pub mod oracle;
pub mod rerank;

/// Chat-template control tokens that document text must not smuggle into a prompt.
const CONTROL_TOKENS: &[&str] = &["<|im_start|>", "<|im_end|>", "<|endoftext|>"];

/// Strip chat-template control tokens from text embedded in a prompt.
///
/// Repeats until stable: removing one token can splice the text around it
/// into another (`<|im_<|im_end|>start|>`).
pub fn sanitize_for_prompt(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let stripped = CONTROL_TOKENS
            .iter()
            .fold(current.clone(), |acc, token| acc.replace(token, ""));
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}
