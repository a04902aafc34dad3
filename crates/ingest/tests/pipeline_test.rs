//! Integration tests for the chunking pipeline.
//!
//! A fixed-vocabulary bag-of-words embedder stands in for a real provider so
//! similarities are exact and reproducible.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use semchunk_core::config::AnchorCoverage;
use semchunk_ingest::embedding::{Embedder, EmbeddingError};
use semchunk_ingest::{AnchorParams, ChunkPipeline, ChunkingError, SequentialParams};

const VOCAB: &[&str] = &[
    "cats", "purr", "softly", "loudly", "often", "stocks", "fell", "sharply", "again",
];

const TWO_TOPICS: &str =
    "Cats purr softly. Cats purr loudly. Cats purr often. Stocks fell sharply. Stocks fell again.";

struct BagOfWords {
    calls: AtomicUsize,
}

impl BagOfWords {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for BagOfWords {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0; VOCAB.len()];
                for word in text.split(|c: char| !c.is_alphanumeric()) {
                    let word = word.to_lowercase();
                    if let Some(pos) = VOCAB.iter().position(|w| *w == word) {
                        v[pos] += 1.0;
                    }
                }
                v
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        VOCAB.len()
    }
}

struct Failing;

#[async_trait]
impl Embedder for Failing {
    async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Api("503: overloaded".to_string()))
    }

    fn dimensions(&self) -> usize {
        4
    }
}

fn members(chunks: &[semchunk_core::Chunk]) -> Vec<Vec<usize>> {
    chunks.iter().map(|c| c.member_indices.clone()).collect()
}

#[test]
fn windows_follow_buffer_rule() {
    let windows = ChunkPipeline::windows("A. B. C.", 1);
    let texts: Vec<&str> = windows.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, vec!["A.B.", "A.B.C.", "B.C."]);
}

#[tokio::test]
async fn sequential_splits_between_topics() {
    let embedder = BagOfWords::new();
    let pipeline = ChunkPipeline::new(embedder.clone());
    let windows = ChunkPipeline::windows(TWO_TOPICS, 0);

    let params = SequentialParams {
        threshold: 0.5,
        word_limit: 512,
    };
    let chunks = pipeline.chunk_sequential(&windows, &params).await.unwrap();

    assert_eq!(members(&chunks), vec![vec![0, 1, 2], vec![3, 4]]);
    assert_eq!(chunks[1].text, "Stocks fell sharply. Stocks fell again.");
    assert_eq!(embedder.calls(), 1);
}

#[tokio::test]
async fn anchors_cluster_each_topic() {
    let pipeline = ChunkPipeline::new(BagOfWords::new());
    let windows = ChunkPipeline::windows(TWO_TOPICS, 0);

    let params = AnchorParams {
        anchor_stride: 3,
        word_limit: 9,
        coverage: AnchorCoverage::BestEffort,
    };
    let chunks = pipeline.chunk_by_anchors(&windows, &params).await.unwrap();
    assert_eq!(members(&chunks), vec![vec![0, 1, 2], vec![3, 4]]);
}

#[tokio::test]
async fn chunk_both_shares_one_embedding_pass() {
    let embedder = BagOfWords::new();
    let pipeline = ChunkPipeline::new(embedder.clone());
    let windows = ChunkPipeline::windows(TWO_TOPICS, 1);

    let (by_sequence, by_anchor) = pipeline
        .chunk_both(&windows, &SequentialParams::default(), &AnchorParams::default())
        .await
        .unwrap();

    assert_eq!(embedder.calls(), 1);
    let flat: Vec<usize> = by_sequence
        .iter()
        .flat_map(|c| c.member_indices.clone())
        .collect();
    assert_eq!(flat, (0..windows.len()).collect::<Vec<_>>());

    let mut seen = HashSet::new();
    for chunk in &by_anchor {
        for &i in &chunk.member_indices {
            assert!(seen.insert(i));
        }
    }
}

#[tokio::test]
async fn small_batches_give_identical_chunks() {
    let windows = ChunkPipeline::windows(TWO_TOPICS, 1);
    let params = SequentialParams {
        threshold: 0.6,
        word_limit: 20,
    };

    let whole = ChunkPipeline::new(BagOfWords::new())
        .chunk_sequential(&windows, &params)
        .await
        .unwrap();

    let embedder = BagOfWords::new();
    let batched = ChunkPipeline::new(embedder.clone())
        .with_batching(2, 3)
        .chunk_sequential(&windows, &params)
        .await
        .unwrap();

    assert_eq!(whole, batched);
    assert_eq!(embedder.calls(), 3);
}

#[tokio::test]
async fn empty_text_skips_provider() {
    let embedder = BagOfWords::new();
    let pipeline = ChunkPipeline::new(embedder.clone());
    let windows = ChunkPipeline::windows("", 2);

    assert!(pipeline
        .chunk_sequential(&windows, &SequentialParams::default())
        .await
        .unwrap()
        .is_empty());
    assert!(pipeline
        .chunk_by_anchors(&windows, &AnchorParams::default())
        .await
        .unwrap()
        .is_empty());
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn invalid_parameters_fail_before_embedding() {
    let embedder = BagOfWords::new();
    let pipeline = ChunkPipeline::new(embedder.clone());
    let windows = ChunkPipeline::windows(TWO_TOPICS, 0);

    let err = pipeline
        .chunk_sequential(
            &windows,
            &SequentialParams {
                threshold: 2.0,
                word_limit: 512,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ChunkingError::InvalidParameter(_)));

    let err = pipeline
        .chunk_by_anchors(
            &windows,
            &AnchorParams {
                anchor_stride: 0,
                ..AnchorParams::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ChunkingError::InvalidParameter(_)));

    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn provider_failure_is_propagated() {
    let pipeline = ChunkPipeline::new(Arc::new(Failing));
    let windows = ChunkPipeline::windows(TWO_TOPICS, 0);

    let err = pipeline
        .chunk_sequential(&windows, &SequentialParams::default())
        .await
        .unwrap_err();
    match err {
        ChunkingError::Embedding(EmbeddingError::Api(msg)) => assert!(msg.contains("503")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn index_chunks_attaches_ids_and_vectors() {
    let pipeline = ChunkPipeline::new(BagOfWords::new()).with_batching(1, 1);
    let windows = ChunkPipeline::windows(TWO_TOPICS, 0);
    let chunks = pipeline
        .chunk_sequential(
            &windows,
            &SequentialParams {
                threshold: 0.5,
                word_limit: 512,
            },
        )
        .await
        .unwrap();

    let indexed = pipeline.index_chunks(chunks.clone()).await.unwrap();
    assert_eq!(indexed.len(), chunks.len());

    let ids: HashSet<_> = indexed.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), indexed.len());

    for (record, chunk) in indexed.iter().zip(&chunks) {
        assert_eq!(record.text, chunk.text);
        assert_eq!(record.member_indices, chunk.member_indices);
        assert_eq!(record.embedding.len(), VOCAB.len());
    }
    // "stocks" appears twice in the second chunk.
    assert_eq!(indexed[1].embedding[5], 2.0);
}
