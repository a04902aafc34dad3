use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::post_json;
use super::traits::{validate_response, Embedder, EmbeddingError};

/// Embedder backed by a local Ollama instance (`POST /api/embed`).
pub struct OllamaEmbedder {
    client: Client,
    url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    pub fn new(url: String, model: String, dimensions: usize) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            model,
            dimensions,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/embed", self.url)
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl EmbedResponse {
    fn into_embeddings(
        self,
        expected: usize,
        dimensions: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        validate_response(&self.embeddings, expected, dimensions)?;
        Ok(self.embeddings)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        debug!(model = %self.model, inputs = texts.len(), "ollama embed request");
        let response: EmbedResponse = post_json(self.client.post(self.endpoint()), &request).await?;
        response.into_embeddings(texts.len(), self.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
