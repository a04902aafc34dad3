//! End-to-end chunking over a single embedding provider.
//!
//! Pipeline flow: cleaned text → sentences → windows → embeddings → chunks →
//! (optional) chunk embeddings for the indexing stage.

use std::sync::Arc;

use semchunk_core::{Chunk, CombinedWindow, Config, IndexedChunk};
use tracing::{debug, info};
use uuid::Uuid;

use crate::document::chunker::{
    anchor_chunks, sequential_chunks, AnchorParams, ChunkingError, SequentialParams,
};
use crate::document::{combine, segment};
use crate::embedding::{embed_all, Embedder, EmbeddingBatcher, EmbeddingError};

/// Runs the chunkers against an embedding provider.
///
/// Parameters are validated before any provider call, and a provider failure
/// aborts the whole call without partial results.
#[derive(Clone)]
pub struct ChunkPipeline {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
    concurrency: usize,
}

impl ChunkPipeline {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            batch_size: 64,
            concurrency: 4,
        }
    }

    /// Use the batching settings from `config.embedding`.
    pub fn from_config(embedder: Arc<dyn Embedder>, config: &Config) -> Self {
        Self::new(embedder).with_batching(config.embedding.batch_size, config.embedding.concurrency)
    }

    pub fn with_batching(mut self, batch_size: usize, concurrency: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self.concurrency = concurrency.max(1);
        self
    }

    /// Segment cleaned text and build one window per sentence.
    pub fn windows(text: &str, buffer_size: usize) -> Vec<CombinedWindow> {
        let sentences = segment(text);
        let windows = combine(&sentences, buffer_size);
        debug!(sentences = sentences.len(), buffer_size, "windows combined");
        windows
    }

    /// One order-preserving embedding pass over the window texts.
    pub async fn embed_windows(
        &self,
        windows: &[CombinedWindow],
    ) -> Result<Vec<Vec<f32>>, ChunkingError> {
        let texts: Vec<&str> = windows.iter().map(|w| w.text.as_str()).collect();
        let embeddings = embed_all(
            self.embedder.as_ref(),
            &texts,
            self.batch_size,
            self.concurrency,
        )
        .await?;
        debug!(windows = windows.len(), "windows embedded");
        Ok(embeddings)
    }

    pub async fn chunk_sequential(
        &self,
        windows: &[CombinedWindow],
        params: &SequentialParams,
    ) -> Result<Vec<Chunk>, ChunkingError> {
        params.validate()?;
        if windows.is_empty() {
            debug!("no windows, nothing to chunk");
            return Ok(Vec::new());
        }
        let embeddings = self.embed_windows(windows).await?;
        let chunks = sequential_chunks(windows, &embeddings, params)?;
        info!(
            strategy = "sequential",
            windows = windows.len(),
            chunks = chunks.len(),
            "chunking complete"
        );
        Ok(chunks)
    }

    pub async fn chunk_by_anchors(
        &self,
        windows: &[CombinedWindow],
        params: &AnchorParams,
    ) -> Result<Vec<Chunk>, ChunkingError> {
        params.validate()?;
        if windows.is_empty() {
            debug!("no windows, nothing to chunk");
            return Ok(Vec::new());
        }
        let embeddings = self.embed_windows(windows).await?;
        let chunks = anchor_chunks(windows, &embeddings, params)?;
        log_anchor_coverage(windows.len(), &chunks);
        Ok(chunks)
    }

    /// Run both chunkers over a single shared embedding pass.
    pub async fn chunk_both(
        &self,
        windows: &[CombinedWindow],
        sequential: &SequentialParams,
        anchor: &AnchorParams,
    ) -> Result<(Vec<Chunk>, Vec<Chunk>), ChunkingError> {
        sequential.validate()?;
        anchor.validate()?;
        if windows.is_empty() {
            debug!("no windows, nothing to chunk");
            return Ok((Vec::new(), Vec::new()));
        }
        let embeddings = self.embed_windows(windows).await?;
        let by_sequence = sequential_chunks(windows, &embeddings, sequential)?;
        let by_anchor = anchor_chunks(windows, &embeddings, anchor)?;
        info!(
            strategy = "sequential",
            windows = windows.len(),
            chunks = by_sequence.len(),
            "chunking complete"
        );
        log_anchor_coverage(windows.len(), &by_anchor);
        Ok((by_sequence, by_anchor))
    }

    /// Embed chunk texts and assign fresh ids, producing the
    /// `(id, text, embedding)` records the vector store ingests.
    pub async fn index_chunks(
        &self,
        chunks: Vec<Chunk>,
    ) -> Result<Vec<IndexedChunk>, ChunkingError> {
        let mut batcher = EmbeddingBatcher::new(self.embedder.clone(), self.batch_size);
        let mut embedded = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            if let Some(done) = batcher.add(Uuid::new_v4(), chunk.text.clone()).await? {
                embedded.extend(done);
            }
        }
        debug!(pending = batcher.pending(), "flushing final embedding batch");
        embedded.extend(batcher.flush().await?);

        if embedded.len() != chunks.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: chunks.len(),
                actual: embedded.len(),
            }
            .into());
        }

        let indexed: Vec<IndexedChunk> = chunks
            .into_iter()
            .zip(embedded)
            .map(|(chunk, (id, embedding))| IndexedChunk {
                id,
                text: chunk.text,
                member_indices: chunk.member_indices,
                embedding,
            })
            .collect();
        info!(chunks = indexed.len(), "chunks embedded for indexing");
        Ok(indexed)
    }
}

fn log_anchor_coverage(windows: usize, chunks: &[Chunk]) {
    let covered: usize = chunks.iter().map(|c| c.member_indices.len()).sum();
    info!(
        strategy = "anchor",
        windows,
        chunks = chunks.len(),
        dropped = windows - covered,
        "chunking complete"
    );
}
