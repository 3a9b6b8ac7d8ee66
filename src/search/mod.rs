//! Retrieval: lexical scoring and the two-stage search pipeline.

pub mod lexical;
pub mod pipeline;
