//! Chunking strategies over precomputed window embeddings: sequential
//! (similarity-gated merging) and anchor (similarity-ranked clustering).

use semchunk_core::config::AnchorCoverage;
use semchunk_core::{Chunk, CombinedWindow};

use super::helpers::{check_alignment, count_words, ChunkBuilder};
use super::types::{AnchorParams, ChunkingError, SequentialParams};
use crate::embedding::cosine_similarity;

// ── Sequential strategy ─────────────────────────────────────────────────────

/// Walk the windows in document order, extending the current chunk while the
/// window is similar enough to the window right before it and the word budget
/// holds.
///
/// Similarity is always measured against the immediately preceding window,
/// never against the chunk as a whole, so a slow drift in topic can keep a
/// chunk growing. A window larger than `word_limit` still forms a chunk on its
/// own; windows are never split.
pub fn sequential_chunks(
    windows: &[CombinedWindow],
    embeddings: &[Vec<f32>],
    params: &SequentialParams,
) -> Result<Vec<Chunk>, ChunkingError> {
    params.validate()?;
    check_alignment(windows.len(), embeddings.len())?;

    let Some(first) = windows.first() else {
        return Ok(Vec::new());
    };

    let mut chunks = Vec::new();
    let mut current = ChunkBuilder::seeded(0, &first.text);

    for (i, window) in windows.iter().enumerate().skip(1) {
        let words = count_words(&window.text);
        let similarity = cosine_similarity(&embeddings[i], &embeddings[i - 1]);
        if similarity > params.threshold && current.words() + words <= params.word_limit {
            current.push(i, &window.text, words);
        } else {
            let done = std::mem::replace(&mut current, ChunkBuilder::seeded(i, &window.text));
            chunks.push(done.finish());
        }
    }
    chunks.push(current.finish());

    Ok(chunks)
}

// ── Anchor strategy ─────────────────────────────────────────────────────────

/// Seed a chunk at every `anchor_stride`-th window and fill it with the most
/// similar windows not yet claimed, regardless of position.
///
/// Members appear in similarity-rank order. With
/// [`AnchorCoverage::BestEffort`] windows that no anchor's scan claimed are
/// left out; an anchor already claimed by an earlier scan may produce a chunk
/// without itself, or no chunk. With [`AnchorCoverage::Full`] every unclaimed
/// window then becomes an anchor in turn until all windows are chunked.
pub fn anchor_chunks(
    windows: &[CombinedWindow],
    embeddings: &[Vec<f32>],
    params: &AnchorParams,
) -> Result<Vec<Chunk>, ChunkingError> {
    params.validate()?;
    check_alignment(windows.len(), embeddings.len())?;

    let word_counts: Vec<usize> = windows.iter().map(|w| count_words(&w.text)).collect();
    let mut scan = AnchorScan {
        windows,
        embeddings,
        word_counts: &word_counts,
        word_limit: params.word_limit,
        used: vec![false; windows.len()],
    };

    let mut chunks: Vec<Chunk> = (0..windows.len())
        .step_by(params.anchor_stride)
        .filter_map(|anchor| scan.claim(anchor))
        .collect();

    if params.coverage == AnchorCoverage::Full {
        let mut cursor = 0;
        loop {
            while cursor < windows.len() && scan.used[cursor] {
                cursor += 1;
            }
            if cursor == windows.len() {
                break;
            }
            // A window over the budget can never be claimed by a scan.
            let chunk = scan
                .claim(cursor)
                .unwrap_or_else(|| scan.claim_alone(cursor));
            chunks.push(chunk);
        }
    }

    Ok(chunks)
}

/// State of one anchor-chunking call. `used` is owned here and never shared.
struct AnchorScan<'a> {
    windows: &'a [CombinedWindow],
    embeddings: &'a [Vec<f32>],
    word_counts: &'a [usize],
    word_limit: usize,
    used: Vec<bool>,
}

impl AnchorScan<'_> {
    /// All window indices ranked by similarity to `anchor`, most similar
    /// first. The sort is stable, so ties keep ascending index order.
    fn ranked(&self, anchor: usize) -> Vec<usize> {
        let target = &self.embeddings[anchor];
        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(target, e)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.into_iter().map(|(i, _)| i).collect()
    }

    /// Greedily claim unused windows in rank order while they fit the budget.
    /// The scan ends as soon as the running total reaches the limit; a window
    /// that does not fit is skipped, not a stopping condition.
    fn claim(&mut self, anchor: usize) -> Option<Chunk> {
        let mut builder = ChunkBuilder::default();
        for idx in self.ranked(anchor) {
            if self.used[idx] {
                continue;
            }
            let words = self.word_counts[idx];
            if builder.words() + words <= self.word_limit {
                builder.push(idx, &self.windows[idx].text, words);
                self.used[idx] = true;
            }
            if builder.words() >= self.word_limit {
                break;
            }
        }
        (!builder.is_empty()).then(|| builder.finish())
    }

    fn claim_alone(&mut self, index: usize) -> Chunk {
        self.used[index] = true;
        ChunkBuilder::seeded(index, &self.windows[index].text).finish()
    }
}
