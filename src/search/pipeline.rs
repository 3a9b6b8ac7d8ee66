use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::{Config, SearchConfig};
use crate::corpus::Corpus;
use crate::error::KbError;
use crate::llm::oracle::LlmOracle;
use crate::llm::rerank::SemanticReranker;
use crate::models::{Candidate, Document, SearchResult};
use crate::search::lexical::{extract_snippet, lexical_candidates, query_terms, sort_by_score};

/// The retrieval entry point: a corpus, its search limits, and an optional re-ranker.
///
/// Holds no per-query state, so one instance can serve concurrent searches
/// behind an `Arc`.
pub struct KnowledgeBase {
    corpus: Corpus,
    reranker: Option<SemanticReranker>,
    limits: SearchConfig,
}

impl KnowledgeBase {
    /// Build from config, wiring an HTTP LLM oracle when re-ranking is enabled.
    pub fn new(config: &Config) -> Result<Self> {
        let reranker = if config.search.rerank_enabled {
            let oracle = LlmOracle::new(config.llm.clone())?;
            Some(SemanticReranker::new(Arc::new(oracle)))
        } else {
            None
        };

        tracing::info!(
            "Knowledge base at {} (re-ranking {})",
            config.docs_dir.display(),
            if reranker.is_some() { "on" } else { "off" }
        );

        Ok(Self {
            corpus: Corpus::new(&config.docs_dir),
            reranker,
            limits: config.search.clone(),
        })
    }

    pub fn lexical_only(corpus: Corpus, limits: SearchConfig) -> Self {
        Self {
            corpus,
            reranker: None,
            limits,
        }
    }

    pub fn with_reranker(corpus: Corpus, reranker: SemanticReranker, limits: SearchConfig) -> Self {
        Self {
            corpus,
            reranker: Some(reranker),
            limits,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Plain lexical search: positive scorers, best first, capped at `plain_limit`.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let documents = self.corpus.load_all().await;
        let terms = query_terms(query);

        let mut candidates = lexical_candidates(&documents, &terms);
        candidates.truncate(self.limits.plain_limit);

        tracing::debug!("Lexical search {:?}: {} results", query, candidates.len());
        candidates.into_iter().map(SearchResult::from).collect()
    }

    /// Two-stage search with the configured candidate/result limits.
    pub async fn search_enhanced(&self, query: &str) -> Vec<SearchResult> {
        self.search_enhanced_with(query, self.limits.max_candidates, self.limits.max_results)
            .await
    }

    /// Lexical pre-filter down to `max_candidates`, then let the re-ranker pick
    /// the top `max_results`.
    ///
    /// Without a re-ranker, or if anything in the two-stage path goes wrong,
    /// this returns the plain [`search`](Self::search) result instead.
    pub async fn search_enhanced_with(
        &self,
        query: &str,
        max_candidates: usize,
        max_results: usize,
    ) -> Vec<SearchResult> {
        let Some(reranker) = &self.reranker else {
            return self.search(query).await;
        };

        let outcome = self
            .rerank_search(reranker, query, max_candidates, max_results)
            .await;
        self.or_lexical(query, outcome).await
    }

    /// Keep a two-stage result, or answer `query` lexically when it failed.
    ///
    /// `SemanticReranker::rank` always yields a full permutation, so today the
    /// `Err` side is only reached by an inconsistent ranking in `apply_ranking`.
    async fn or_lexical(
        &self,
        query: &str,
        outcome: Result<Vec<SearchResult>>,
    ) -> Vec<SearchResult> {
        match outcome {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Enhanced search failed, using lexical results: {e:#}");
                self.search(query).await
            }
        }
    }

    pub async fn load_document(&self, relative: &str) -> Result<Option<Document>, KbError> {
        self.corpus.load_document(relative).await
    }

    pub fn clear_cache(&self) {
        self.corpus.clear_cache();
    }

    async fn rerank_search(
        &self,
        reranker: &SemanticReranker,
        query: &str,
        max_candidates: usize,
        max_results: usize,
    ) -> Result<Vec<SearchResult>> {
        let documents = self.corpus.load_all().await;
        let terms = query_terms(query);

        let mut candidates = lexical_candidates(&documents, &terms);
        if candidates.is_empty() {
            // No keyword overlap: let the oracle judge the first documents in corpus order.
            tracing::debug!(
                "No lexical matches for {:?}; re-ranking first {} documents",
                query,
                max_candidates
            );
            candidates = documents
                .into_iter()
                .take(max_candidates)
                .map(|document| Candidate {
                    snippet: extract_snippet(&document.content, &terms),
                    document,
                    score: 0,
                })
                .collect();
        }

        sort_by_score(&mut candidates);
        candidates.truncate(max_candidates);

        if candidates.len() <= max_results {
            return Ok(candidates.into_iter().map(SearchResult::from).collect());
        }

        let summaries: Vec<_> = candidates.iter().map(Candidate::summary).collect();
        let ranking = reranker.rank(query, &summaries).await;
        tracing::info!("Re-ranked {} candidates for {:?}", candidates.len(), query);

        Ok(apply_ranking(candidates, &ranking)?
            .into_iter()
            .take(max_results)
            .map(SearchResult::from)
            .collect())
    }
}

/// Reorder `candidates` by a permutation of their indices.
fn apply_ranking(candidates: Vec<Candidate>, ranking: &[usize]) -> Result<Vec<Candidate>> {
    if ranking.len() != candidates.len() {
        anyhow::bail!(
            "Ranking has {} entries for {} candidates",
            ranking.len(),
            candidates.len()
        );
    }

    let mut slots: Vec<Option<Candidate>> = candidates.into_iter().map(Some).collect();
    ranking
        .iter()
        .map(|&i| {
            slots
                .get_mut(i)
                .and_then(Option::take)
                .with_context(|| format!("Ranking index {i} is out of range or repeated"))
        })
        .collect()
}
