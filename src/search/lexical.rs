//! Keyword scoring and snippet extraction over in-memory documents.
//!
//! Scoring is deliberately simple: a fixed bonus for a term found in the
//! title, plus a saturating count of its occurrences in the body.

use crate::models::{Candidate, Document};

/// Bonus for a query term appearing anywhere in the title.
pub const TITLE_WEIGHT: u32 = 10;
/// Per-term cap on counted content occurrences.
pub const MAX_TERM_OCCURRENCES: u32 = 5;

const MIN_TERM_CHARS: usize = 3;
const SNIPPET_MAX_CHARS: usize = 300;
const MIN_WINDOW_CHARS: usize = 20;

/// Lower-case the query and keep whitespace-separated terms of 3+ characters.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|t| is_scoring_term(t))
        .map(str::to_string)
        .collect()
}

/// Lexical relevance of `document` for already-tokenized `terms`.
///
/// Title and content matches are plain substring matches, so "water" also
/// hits "watering".
pub fn score(document: &Document, terms: &[String]) -> u32 {
    let title = document.title.to_lowercase();
    let content = document.content.to_lowercase();

    terms
        .iter()
        .filter(|t| is_scoring_term(t))
        .map(|term| {
            let term = term.to_lowercase();
            let title_score = if title.contains(&term) { TITLE_WEIGHT } else { 0 };
            let occurrences = content.matches(&term).count().min(MAX_TERM_OCCURRENCES as usize);
            title_score + occurrences as u32
        })
        .sum()
}

/// Pick a short excerpt of `content` that shows why it matched.
///
/// Takes a window of one line before to two lines after the first line that
/// mentions a term, trying terms in order until a window is longer than 20
/// characters. Otherwise falls back to the first three prose lines.
pub fn extract_snippet(content: &str, terms: &[String]) -> String {
    let lines: Vec<&str> = content.lines().collect();

    for term in terms.iter().filter(|t| is_scoring_term(t)) {
        let term = term.to_lowercase();
        let Some(i) = lines.iter().position(|l| l.to_lowercase().contains(&term)) else {
            continue;
        };

        let start = i.saturating_sub(1);
        let end = (i + 3).min(lines.len());
        let window = lines[start..end].join("\n");
        let window = window.trim();
        if window.chars().count() > MIN_WINDOW_CHARS {
            return truncate_chars(window, SNIPPET_MAX_CHARS);
        }
    }

    let fallback = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("---"))
        .take(3)
        .collect::<Vec<_>>()
        .join(" ");
    truncate_chars(&fallback, SNIPPET_MAX_CHARS)
}

/// Score every document and keep the positive ones, best first.
///
/// The sort is stable, so equal scores keep corpus order.
pub fn lexical_candidates(documents: &[Document], terms: &[String]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = documents
        .iter()
        .filter_map(|document| {
            let score = score(document, terms);
            (score > 0).then(|| Candidate {
                snippet: extract_snippet(&document.content, terms),
                document: document.clone(),
                score,
            })
        })
        .collect();

    sort_by_score(&mut candidates);
    candidates
}

/// Stable descending sort by lexical score.
pub fn sort_by_score(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
}

fn is_scoring_term(term: &str) -> bool {
    term.chars().count() >= MIN_TERM_CHARS
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str, title: &str, content: &str) -> Document {
        Document {
            path: path.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn terms(q: &str) -> Vec<String> {
        query_terms(q)
    }

    #[test]
    fn test_query_terms_drops_short_words() {
        assert_eq!(
            query_terms("How do I water a Fern"),
            vec!["how", "water", "fern"]
        );
        assert!(query_terms("a an is").is_empty());
        assert!(query_terms("   ").is_empty());
    }

    #[test]
    fn test_score_title_weight_and_content_cap() {
        let d = doc("a.md", "Watering Schedule", &"water ".repeat(8));
        // title "watering" contains "water" (+10), content capped at 5
        assert_eq!(score(&d, &terms("water")), 15);
    }

    #[test]
    fn test_score_is_case_insensitive() {
        let d = doc("a.md", "Moss", "MOSS moss Moss");
        assert_eq!(score(&d, &terms("moss")), 13);
    }

    #[test]
    fn test_score_zero_without_matches() {
        let d = doc("a.md", "Ferns", "shade and humidity");
        assert_eq!(score(&d, &terms("cactus sunlight")), 0);
    }

    #[test]
    fn test_score_ignores_short_terms_passed_directly() {
        let d = doc("a.md", "ab", "ab ab ab");
        assert_eq!(score(&d, &["ab".to_string(), String::new()]), 0);
    }

    #[test]
    fn test_snippet_window_around_first_match() {
        let content = "# Title\nline one\nline two\nwater the moss daily\nline four\nline five\nline six";
        let snippet = extract_snippet(content, &terms("water"));
        assert_eq!(
            snippet,
            "line two\nwater the moss daily\nline four\nline five"
        );
    }

    #[test]
    fn test_snippet_window_clipped_at_start() {
        let content = "water every morning please\nsecond\nthird\nfourth";
        let snippet = extract_snippet(content, &terms("water"));
        assert_eq!(snippet, "water every morning please\nsecond\nthird");
    }

    #[test]
    fn test_snippet_skips_tiny_window_and_tries_next_term() {
        let content = "fern\n\n\n\n\nsome text\nkeep moss damp in summer months";
        let snippet = extract_snippet(content, &terms("fern moss"));
        assert!(snippet.contains("keep moss damp"));
    }

    #[test]
    fn test_snippet_fallback_skips_headings_and_rules() {
        let content = "# Heading\n---\n\nFirst line.\n## Sub\nSecond line.\nThird line.\nFourth line.";
        let snippet = extract_snippet(content, &terms("nothing"));
        assert_eq!(snippet, "First line. Second line. Third line.");
    }

    #[test]
    fn test_snippet_truncated_to_300_chars() {
        let content = format!("water {}", "é".repeat(400));
        let snippet = extract_snippet(&content, &terms("water"));
        assert!(snippet.ends_with("..."));
        assert_eq!(snippet.chars().count(), 303);
    }

    #[test]
    fn test_lexical_candidates_stable_order_for_ties() {
        let docs = vec![
            doc("first.md", "One", "moss"),
            doc("none.md", "Two", "nothing"),
            doc("second.md", "Three", "moss"),
            doc("best.md", "Moss", "moss"),
        ];
        let candidates = lexical_candidates(&docs, &terms("moss"));
        let paths: Vec<&str> = candidates.iter().map(|c| c.document.path.as_str()).collect();
        assert_eq!(paths, vec!["best.md", "first.md", "second.md"]);
    }
}
