//! Shared accumulation utilities for the chunking strategies.

use semchunk_core::Chunk;

use super::types::ChunkingError;
use crate::embedding::EmbeddingError;

/// Approximate token count via whitespace splitting.
pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Embeddings are indexed positionally, so there must be exactly one per window.
pub(crate) fn check_alignment(windows: usize, embeddings: usize) -> Result<(), ChunkingError> {
    if windows != embeddings {
        return Err(EmbeddingError::CountMismatch {
            expected: windows,
            actual: embeddings,
        }
        .into());
    }
    Ok(())
}

/// In-progress chunk: space-joined text, member order, running word count.
#[derive(Debug, Default)]
pub(crate) struct ChunkBuilder {
    text: String,
    members: Vec<usize>,
    words: usize,
}

impl ChunkBuilder {
    pub(crate) fn seeded(index: usize, text: &str) -> Self {
        let mut builder = Self::default();
        builder.push(index, text, count_words(text));
        builder
    }

    pub(crate) fn push(&mut self, index: usize, text: &str, words: usize) {
        if !self.members.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
        self.members.push(index);
        self.words += words;
    }

    pub(crate) fn words(&self) -> usize {
        self.words
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn finish(self) -> Chunk {
        Chunk {
            text: self.text,
            member_indices: self.members,
        }
    }
}
