//! Embedding-driven chunking engine.
//!
//! Groups combined windows into retrieval chunks under a word budget, either
//! sequentially (merge while adjacent windows stay similar) or around strided
//! anchors (claim the most similar unused windows anywhere in the document).

mod helpers;
mod strategies;
mod types;

pub use strategies::{anchor_chunks, sequential_chunks};
pub use types::{AnchorParams, ChunkingError, SequentialParams};
