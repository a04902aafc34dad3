//! Rule-based sentence segmentation.
//!
//! A segment ends after `.`, `!` or `?` when the next character is whitespace
//! (the whole whitespace run is consumed as the separator), or at a run of two
//! or more `\n` (the whole run is consumed). Segment text is kept verbatim, so
//! empty segments produced by the rule survive. There is no abbreviation
//! handling: "e.g. this" splits after "e.g.".

use std::iter::FusedIterator;

use semchunk_core::SentenceRecord;

/// Lazily yields the sentences of `text` in document order.
///
/// The iterator borrows the text and can be cloned to restart from any point.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    text: &'a str,
    pos: usize,
    index: usize,
    finished: bool,
}

impl<'a> Sentences<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            index: 0,
            finished: text.is_empty(),
        }
    }

    /// Locate the next separator in `rest`, returned as `(start, end)` byte
    /// offsets relative to `rest`.
    fn next_separator(rest: &str) -> Option<(usize, usize)> {
        let mut prev: Option<char> = None;
        for (i, c) in rest.char_indices() {
            if matches!(prev, Some('.' | '!' | '?')) && c.is_whitespace() {
                let run: usize = rest[i..]
                    .chars()
                    .take_while(|c| c.is_whitespace())
                    .map(char::len_utf8)
                    .sum();
                return Some((i, i + run));
            }
            if c == '\n' && rest[i + 1..].starts_with('\n') {
                let run = rest[i..].bytes().take_while(|&b| b == b'\n').count();
                return Some((i, i + run));
            }
            prev = Some(c);
        }
        None
    }
}

impl Iterator for Sentences<'_> {
    type Item = SentenceRecord;

    fn next(&mut self) -> Option<SentenceRecord> {
        if self.finished {
            return None;
        }
        let rest = &self.text[self.pos..];
        let text = match Self::next_separator(rest) {
            Some((start, end)) => {
                self.pos += end;
                &rest[..start]
            }
            None => {
                self.finished = true;
                rest
            }
        };
        let record = SentenceRecord {
            text: text.to_string(),
            index: self.index,
        };
        self.index += 1;
        Some(record)
    }
}

impl FusedIterator for Sentences<'_> {}

/// Segment `text` into sentence records.
pub fn segment(text: &str) -> Vec<SentenceRecord> {
    Sentences::new(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        segment(text).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        assert_eq!(
            texts("First one. Second one! Third one? Fourth"),
            vec!["First one.", "Second one!", "Third one?", "Fourth"]
        );
    }

    #[test]
    fn splits_on_paragraph_breaks() {
        assert_eq!(
            texts("heading\n\nbody text\n\n\nmore"),
            vec!["heading", "body text", "more"]
        );
    }

    #[test]
    fn single_newline_is_not_a_break() {
        assert_eq!(texts("line one\nline two"), vec!["line one\nline two"]);
    }

    #[test]
    fn punctuation_without_whitespace_does_not_split() {
        assert_eq!(texts("version 1.2.3 is out."), vec!["version 1.2.3 is out."]);
    }

    #[test]
    fn abbreviations_over_segment() {
        assert_eq!(texts("See e.g. this"), vec!["See e.g.", "this"]);
    }

    #[test]
    fn whitespace_run_after_punctuation_is_one_separator() {
        assert_eq!(texts("A.  \n\n B."), vec!["A.", "B."]);
    }

    #[test]
    fn keeps_segment_text_verbatim() {
        assert_eq!(texts("  padded \n\n tail"), vec!["  padded ", " tail"]);
    }

    #[test]
    fn rule_produced_empty_segments_are_kept() {
        assert_eq!(texts("\n\nA. "), vec!["", "A.", ""]);
    }

    #[test]
    fn empty_text_has_no_sentences() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn indices_are_contiguous() {
        let sentences = segment("A. B. C. D.");
        let indices: Vec<usize> = sentences.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn iterator_restarts_from_clone() {
        let mut iter = Sentences::new("One. Two. Three.");
        iter.next();
        let snapshot = iter.clone();
        let first_pass: Vec<_> = iter.collect();
        let second_pass: Vec<_> = snapshot.collect();
        assert_eq!(first_pass, second_pass);
        assert_eq!(first_pass[0].index, 1);
    }

    #[test]
    fn handles_multibyte_whitespace_and_text() {
        assert_eq!(texts("Grüße.\u{3000}Ende!"), vec!["Grüße.", "Ende!"]);
    }

    #[test]
    fn deterministic_on_identical_input() {
        let text = "Alpha. Beta!\n\nGamma? Delta";
        assert_eq!(segment(text), segment(text));
    }
}
