use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::post_json;
use super::traits::{validate_response, Embedder, EmbeddingError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI-compatible embedding backend (`POST /v1/embeddings`).
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    pub fn new(
        api_key: String,
        model: String,
        base_url: Option<String>,
        dimensions: usize,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            dimensions,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedItem>,
}

#[derive(Deserialize)]
struct EmbedItem {
    embedding: Vec<f32>,
    index: usize,
}

impl EmbedResponse {
    /// Items may arrive out of order; `index` refers to the input position.
    fn into_embeddings(
        mut self,
        expected: usize,
        dimensions: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.data.sort_by_key(|item| item.index);
        let embeddings: Vec<Vec<f32>> = self.data.into_iter().map(|item| item.embedding).collect();
        validate_response(&embeddings, expected, dimensions)?;
        Ok(embeddings)
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        debug!(model = %self.model, inputs = texts.len(), "openai embed request");
        let builder = self.client.post(self.endpoint()).bearer_auth(&self.api_key);
        let response: EmbedResponse = post_json(builder, &request).await?;
        response.into_embeddings(texts.len(), self.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
