//! # kb-search
//!
//! Knowledge-base retrieval for a chat application: given a free-text
//! question and a directory of markdown/YAML documents, return the few
//! documents most useful for answering it.
//!
//! ## Architecture
//!
//! ```text
//!                  ┌─────────────────────┐
//!                  │     User Query      │
//!                  └──────────┬──────────┘
//!                             │
//!                             ▼
//!                  ┌─────────────────────┐
//!                  │   Corpus (cached)   │
//!                  │ .md / .yaml / .yml  │
//!                  └──────────┬──────────┘
//!                             │ all documents
//!                             ▼
//!                  ┌─────────────────────┐
//!                  │   Lexical Scoring   │
//!                  │ title hit: +10      │
//!                  │ body hits: ≤5/term  │
//!                  └──────────┬──────────┘
//!                             │ top max_candidates
//!                             ▼
//!                  ┌─────────────────────┐
//!                  │  LLM Re-ranking     │
//!                  │ (skipped when ≤     │
//!                  │  max_results left)  │
//!                  └──────────┬──────────┘
//!                             │ permutation
//!                             ▼
//!                  ┌─────────────────────┐
//!                  │ Top max_results     │
//!                  └─────────────────────┘
//! ```
//!
//! Every failure short of a path-traversal attempt degrades to a lexical
//! (or empty) answer rather than an error.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the corpus, limits and LLM
//! - [`models`] - Shared data types: `Document`, `Candidate`, `SearchResult`
//! - [`corpus`] - Directory walk, title extraction and the path-keyed document cache
//! - [`search::lexical`] - Keyword scoring and snippet extraction
//! - [`search::pipeline`] - `KnowledgeBase`: plain and re-ranked search
//! - [`llm::oracle`] - The `RankingOracle` trait and its Ollama/OpenAI implementation
//! - [`llm::rerank`] - Prompt building and tolerant permutation parsing
//! - [`context`] - Formats results into a chat prompt context block
//! - [`error`] - `KbError`

pub mod config;
pub mod context;
pub mod corpus;
pub mod error;
pub mod llm;
pub mod models;
pub mod search;

pub use config::Config;
pub use error::KbError;
pub use models::{Document, SearchResult};
pub use search::pipeline::KnowledgeBase;
