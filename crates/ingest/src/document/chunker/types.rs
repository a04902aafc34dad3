//! Chunker parameters and errors.

use semchunk_core::config::{AnchorCoverage, ChunkingConfig};
use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum ChunkingError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Embedding provider failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

// ── Sequential ──────────────────────────────────────────────────────────────

/// Parameters for similarity-gated sequential merging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialParams {
    /// A window joins the current chunk only if its similarity to the
    /// preceding window is strictly greater than this (default: 0.75).
    pub threshold: f32,
    /// Word budget per chunk (default: 512).
    pub word_limit: usize,
}

impl Default for SequentialParams {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            word_limit: 512,
        }
    }
}

impl SequentialParams {
    pub fn validate(&self) -> Result<(), ChunkingError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ChunkingError::InvalidParameter(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        validate_word_limit(self.word_limit)
    }
}

impl From<&ChunkingConfig> for SequentialParams {
    fn from(config: &ChunkingConfig) -> Self {
        Self {
            threshold: config.threshold,
            word_limit: config.word_limit,
        }
    }
}

// ── Anchor ──────────────────────────────────────────────────────────────────

/// Parameters for anchor-ranked clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorParams {
    /// Distance between consecutive anchors (default: 5).
    pub anchor_stride: usize,
    /// Word budget per chunk (default: 512).
    pub word_limit: usize,
    /// Whether windows no anchor reached are dropped or chunked anyway.
    pub coverage: AnchorCoverage,
}

impl Default for AnchorParams {
    fn default() -> Self {
        Self {
            anchor_stride: 5,
            word_limit: 512,
            coverage: AnchorCoverage::BestEffort,
        }
    }
}

impl AnchorParams {
    pub fn validate(&self) -> Result<(), ChunkingError> {
        if self.anchor_stride == 0 {
            return Err(ChunkingError::InvalidParameter(
                "anchor_stride must be positive".to_string(),
            ));
        }
        validate_word_limit(self.word_limit)
    }
}

impl From<&ChunkingConfig> for AnchorParams {
    fn from(config: &ChunkingConfig) -> Self {
        Self {
            anchor_stride: config.anchor_stride,
            word_limit: config.word_limit,
            coverage: config.anchor_coverage,
        }
    }
}

fn validate_word_limit(word_limit: usize) -> Result<(), ChunkingError> {
    if word_limit == 0 {
        return Err(ChunkingError::InvalidParameter(
            "word_limit must be positive".to_string(),
        ));
    }
    Ok(())
}
