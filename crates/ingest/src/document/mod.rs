//! Text → sentences → windows → chunks.

pub mod chunker;
pub mod segmenter;
pub mod windows;

pub use segmenter::{segment, Sentences};
pub use windows::combine;
