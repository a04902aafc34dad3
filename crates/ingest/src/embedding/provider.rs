use std::sync::Arc;

use semchunk_core::Config;
use tracing::info;

use super::cache::CachedEmbedder;
use super::ollama::OllamaEmbedder;
use super::openai::OpenAiEmbedder;
use super::traits::{Embedder, EmbeddingError};

/// Build the embedding backend selected by `EMBEDDING_PROVIDER`, wrapped in an
/// LRU cache unless `EMBEDDING_CACHE_CAPACITY` is 0.
pub fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    let capacity = config.embedding.cache_capacity;
    let dims = config.embedding.dimensions;

    match config.embedding.provider.as_str() {
        "ollama" => {
            let embedder = OllamaEmbedder::new(
                config.ollama.url.clone(),
                config.ollama.embedding_model.clone(),
                dims,
            );
            info!(
                "Embedding provider ready: ollama (model: {}, dims: {})",
                config.ollama.embedding_model, dims
            );
            Ok(with_cache(embedder, capacity))
        }
        "openai" => {
            let Some(api_key) = config.openai.api_key.clone() else {
                return Err(EmbeddingError::NotConfigured(
                    "EMBEDDING_PROVIDER=openai but OPENAI_API_KEY is empty".to_string(),
                ));
            };
            let embedder = OpenAiEmbedder::new(
                api_key,
                config.openai.embedding_model.clone(),
                Some(config.openai.base_url.clone()),
                dims,
            );
            info!(
                "Embedding provider ready: openai (model: {}, dims: {})",
                config.openai.embedding_model, dims
            );
            Ok(with_cache(embedder, capacity))
        }
        other => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider '{other}'"
        ))),
    }
}

fn with_cache<E: Embedder + 'static>(embedder: E, capacity: usize) -> Arc<dyn Embedder> {
    if capacity == 0 {
        Arc::new(embedder)
    } else {
        Arc::new(CachedEmbedder::new(embedder, capacity))
    }
}
