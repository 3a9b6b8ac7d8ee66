use thiserror::Error;

/// Errors surfaced to consumers of the knowledge base.
///
/// Corpus and oracle failures degrade to fewer results instead of showing up
/// here; only a request that tries to escape the corpus root fails loudly.
#[derive(Error, Debug)]
pub enum KbError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
