//! Sentence windowing and embedding-driven chunking for retrieval indexing.

pub mod document;
pub mod embedding;
pub mod pipeline;

pub use document::chunker::{AnchorParams, ChunkingError, SequentialParams};
pub use pipeline::ChunkPipeline;
