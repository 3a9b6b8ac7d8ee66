use anyhow::{Context, Result};
use std::fmt::Write;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::llm::oracle::RankingOracle;
use crate::llm::sanitize_for_prompt;
use crate::models::CandidateSummary;

/// Asks a [`RankingOracle`] to order candidates by relevance.
///
/// `rank` never fails: an oracle that cannot start, errors out, or answers
/// with garbage all produce a full permutation of the candidate indices.
pub struct SemanticReranker {
    oracle: Arc<dyn RankingOracle>,
    ready: OnceCell<()>,
}

impl SemanticReranker {
    pub fn new(oracle: Arc<dyn RankingOracle>) -> Self {
        Self {
            oracle,
            ready: OnceCell::new(),
        }
    }

    /// Return a permutation of `0..candidates.len()`, most relevant first.
    ///
    /// Falls back to the identity ordering when the oracle is unavailable.
    pub async fn rank(&self, query: &str, candidates: &[CandidateSummary]) -> Vec<usize> {
        let n = candidates.len();
        if n == 0 {
            return Vec::new();
        }

        match self.try_rank(query, candidates).await {
            Ok(ranking) => ranking,
            Err(e) => {
                tracing::warn!("Re-ranking failed, keeping lexical order: {e:#}");
                identity(n)
            }
        }
    }

    async fn try_rank(&self, query: &str, candidates: &[CandidateSummary]) -> Result<Vec<usize>> {
        self.ensure_initialized().await?;

        let prompt = build_ranking_prompt(query, candidates);
        let reply = self
            .oracle
            .evaluate(&prompt)
            .await
            .context("Oracle ranking call failed")?;
        if reply.trim().is_empty() {
            anyhow::bail!("Oracle returned an empty reply");
        }

        let ranking = parse_ranking(&reply, candidates.len());
        tracing::debug!("Oracle reply {:?} parsed as {:?}", reply.trim(), ranking);
        Ok(ranking)
    }

    /// Start the oracle session once. Concurrent callers wait on the same
    /// start; a failed start leaves the cell empty so a later call retries.
    async fn ensure_initialized(&self) -> Result<()> {
        self.ready
            .get_or_try_init(|| async {
                self.oracle
                    .initialize()
                    .await
                    .context("Oracle failed to start")
            })
            .await?;
        Ok(())
    }
}

/// Build the ranking prompt: one `[i] Title/Snippet` block per candidate.
pub fn build_ranking_prompt(query: &str, candidates: &[CandidateSummary]) -> String {
    let mut prompt = String::from(
        "You rank knowledge-base documents by how well they help answer a user's question.\n\n",
    );
    let _ = writeln!(prompt, "Question: {}\n", sanitize_for_prompt(query));
    prompt.push_str("Documents:\n");

    for (i, c) in candidates.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "[{i}] Title: {}\nSnippet: {}\n",
            sanitize_for_prompt(&c.title),
            sanitize_for_prompt(&c.snippet)
        );
    }

    let _ = write!(
        prompt,
        "Reply with ONLY the document indices (0 to {}) ordered from most to least relevant, \
         comma-separated, e.g. \"2,0,1\". No explanation.",
        candidates.len().saturating_sub(1)
    );
    prompt
}

/// Turn a free-text oracle reply into a permutation of `0..n`.
///
/// Every run of digits is read as an index; out-of-range and repeated indices
/// are dropped, and whatever the reply left out is appended in ascending
/// order. The result always has exactly `n` distinct entries.
pub fn parse_ranking(reply: &str, n: usize) -> Vec<usize> {
    let mut seen = vec![false; n];
    let mut ranking = Vec::with_capacity(n);

    for digits in reply
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
    {
        // Runs too long for usize are out of range anyway
        let Ok(index) = digits.parse::<usize>() else {
            continue;
        };
        if index < n && !seen[index] {
            seen[index] = true;
            ranking.push(index);
        }
    }

    ranking.extend((0..n).filter(|&i| !seen[i]));
    ranking
}

fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}
