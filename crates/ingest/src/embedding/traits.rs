use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Provider returned {actual} vectors for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Embedding provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for embedding backends (OpenAI, Ollama, test doubles, ...).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input text (in order).
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;
}

/// Check a provider response against the request: one vector per input, each
/// of the advertised dimensionality.
pub(crate) fn validate_response(
    embeddings: &[Vec<f32>],
    expected_count: usize,
    dimensions: usize,
) -> Result<(), EmbeddingError> {
    if embeddings.len() != expected_count {
        return Err(EmbeddingError::CountMismatch {
            expected: expected_count,
            actual: embeddings.len(),
        });
    }
    if let Some(bad) = embeddings.iter().find(|e| e.len() != dimensions) {
        return Err(EmbeddingError::DimensionMismatch {
            expected: dimensions,
            actual: bad.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_response() {
        let embeddings = vec![vec![0.0; 3], vec![1.0; 3]];
        assert!(validate_response(&embeddings, 2, 3).is_ok());
    }

    #[test]
    fn rejects_short_response() {
        let err = validate_response(&[vec![0.0; 3]], 2, 3).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::CountMismatch { expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn rejects_ragged_vectors() {
        let embeddings = vec![vec![0.0; 3], vec![0.0; 2]];
        let err = validate_response(&embeddings, 2, 3).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { expected: 3, actual: 2 }
        ));
    }
}
