use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use semchunk_core::ChunkId;

use super::traits::{Embedder, EmbeddingError};

/// Embed `texts` in batches of `batch_size`, keeping up to `concurrency`
/// requests in flight. The output is in input order regardless of which batch
/// finishes first.
pub async fn embed_all(
    embedder: &dyn Embedder,
    texts: &[&str],
    batch_size: usize,
    concurrency: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let batch_size = batch_size.max(1);

    let batches: Vec<Vec<Vec<f32>>> = stream::iter(texts.chunks(batch_size))
        .map(|batch| async move {
            let embeddings = embedder.embed_batch(batch).await?;
            if embeddings.len() != batch.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: batch.len(),
                    actual: embeddings.len(),
                });
            }
            Ok::<_, EmbeddingError>(embeddings)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    Ok(batches.into_iter().flatten().collect())
}

/// Collects (ChunkId, text) pairs and flushes when the batch is full.
pub struct EmbeddingBatcher {
    buffer: Vec<(ChunkId, String)>,
    batch_size: usize,
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingBatcher {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            buffer: Vec::with_capacity(batch_size),
            batch_size,
            embedder,
        }
    }

    /// Add a chunk to the batch. Returns embeddings if the batch is full (auto-flush).
    pub async fn add(
        &mut self,
        id: ChunkId,
        text: String,
    ) -> Result<Option<Vec<(ChunkId, Vec<f32>)>>, EmbeddingError> {
        self.buffer.push((id, text));
        if self.buffer.len() >= self.batch_size {
            Ok(Some(self.flush().await?))
        } else {
            Ok(None)
        }
    }

    /// Force-flush remaining items.
    pub async fn flush(&mut self) -> Result<Vec<(ChunkId, Vec<f32>)>, EmbeddingError> {
        if self.buffer.is_empty() {
            return Ok(Vec::new());
        }
        let batch: Vec<(ChunkId, String)> = self.buffer.drain(..).collect();
        let texts: Vec<&str> = batch.iter().map(|(_, t)| t.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: batch.len(),
                actual: embeddings.len(),
            });
        }

        Ok(batch
            .into_iter()
            .zip(embeddings)
            .map(|((id, _), emb)| (id, emb))
            .collect())
    }

    /// Number of items currently buffered.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
