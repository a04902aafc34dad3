//! Sliding-window context combination.

use semchunk_core::{CombinedWindow, SentenceRecord};

/// Build one window per sentence from its bounded neighbourhood.
///
/// Window `i` is the concatenation (no separators) of sentences
/// `max(0, i - buffer_size)..=min(len - 1, i + buffer_size)`, i.e. the left
/// context including sentence `i` followed by the right context. A buffer of
/// zero reproduces the sentence text.
pub fn combine(sentences: &[SentenceRecord], buffer_size: usize) -> Vec<CombinedWindow> {
    let len = sentences.len();
    sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let start = i.saturating_sub(buffer_size);
            let end = i.saturating_add(buffer_size).min(len - 1);
            let span = &sentences[start..=end];
            let mut text = String::with_capacity(span.iter().map(|s| s.text.len()).sum());
            for s in span {
                text.push_str(&s.text);
            }
            CombinedWindow {
                text,
                source_index: sentence.index,
            }
        })
        .collect()
}
