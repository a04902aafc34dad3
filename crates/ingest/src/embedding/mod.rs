pub mod batcher;
pub mod cache;
mod http;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod similarity;
pub mod traits;

pub use batcher::{embed_all, EmbeddingBatcher};
pub use cache::{CachedEmbedder, EmbeddingCache};
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use provider::build_embedder;
pub use similarity::cosine_similarity;
pub use traits::{Embedder, EmbeddingError};
