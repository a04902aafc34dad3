use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::traits::EmbeddingError;

/// Send a JSON request and decode the JSON reply. Non-2xx replies become
/// [`EmbeddingError::Api`] carrying the status and body.
pub(crate) async fn post_json<B, R>(request: RequestBuilder, body: &B) -> Result<R, EmbeddingError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = request.json(body).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(EmbeddingError::Api(format!("{status}: {body}")));
    }
    Ok(response.json().await?)
}
