use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to a chunk when it is handed to the indexing stage.
pub type ChunkId = Uuid;

/// One sentence of the cleaned document, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub text: String,
    /// 0-based position; contiguous and unique within a document.
    pub index: usize,
}

/// A sentence plus its bounded left/right context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedWindow {
    pub text: String,
    /// Index of the sentence this window was built around.
    pub source_index: usize,
}

/// A retrieval unit assembled from one or more windows.
///
/// `text` is the space-joined concatenation of the member window texts in the
/// order they were appended, and `member_indices` lists the windows in that
/// same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub member_indices: Vec<usize>,
}

impl Chunk {
    /// Whitespace-delimited word count of the chunk text.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A chunk ready for the vector store: `(id, text, embedding)` plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub id: ChunkId,
    pub text: String,
    pub member_indices: Vec<usize>,
    pub embedding: Vec<f32>,
}
