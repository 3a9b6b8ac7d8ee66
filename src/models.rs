use serde::{Deserialize, Serialize};

/// A document loaded from the knowledge-base directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Path relative to the corpus root, `/`-separated. Unique per corpus.
    pub path: String,
    pub title: String,
    pub content: String,
}

/// A document that survived lexical pre-filtering for one search call.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub document: Document,
    pub score: u32,
    pub snippet: String,
}

impl Candidate {
    pub fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            title: self.document.title.clone(),
            snippet: self.snippet.clone(),
        }
    }
}

/// What the re-ranking oracle sees of a candidate.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub title: String,
    pub snippet: String,
}

/// A retrieved document as handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub path: String,
    pub title: String,
    pub content: String,
    pub snippet: String,
}

impl From<Candidate> for SearchResult {
    fn from(candidate: Candidate) -> Self {
        let Document {
            path,
            title,
            content,
        } = candidate.document;
        Self {
            path,
            title,
            content,
            snippet: candidate.snippet,
        }
    }
}
