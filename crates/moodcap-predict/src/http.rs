//! HTTP predictor backend.
//!
//! The wire contract is fixed: one multipart field named `sound` with MIME
//! type `audio/mp4`, a 200 response carrying `{"result": "<label>"}`.
//! Anything else is a failure.

use async_trait::async_trait;
use moodcap_core::{Label, SourceLocator};
use serde::Deserialize;
use tracing::debug;

use crate::{PredictError, Predictor, Result};

const SOUND_FIELD: &str = "sound";
const SOUND_MIME: &str = "audio/mp4";

/// HTTP client for the predictor endpoint.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    result: String,
}

impl HttpPredictor {
    /// Create a new client targeting the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolve a locator to the bytes that go on the wire.
    async fn resolve(source: SourceLocator) -> Result<(Vec<u8>, String)> {
        let file_name = source.file_name();
        let data = match source {
            SourceLocator::Memory(data) => data,
            SourceLocator::File(path) => tokio::fs::read(&path).await?,
        };
        Ok((data, file_name))
    }

    fn parse_label(body: PredictResponse) -> Result<Label> {
        Ok(body.result.parse::<Label>()?)
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, source: SourceLocator) -> Result<Label> {
        let (data, file_name) = Self::resolve(source).await?;

        debug!(
            endpoint = %self.endpoint,
            audio_bytes = data.len(),
            file_name = %file_name,
            "uploading audio for prediction"
        );

        let form = reqwest::multipart::Form::new().part(
            SOUND_FIELD,
            reqwest::multipart::Part::bytes(data)
                .file_name(file_name)
                .mime_str(SOUND_MIME)?,
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PredictError::Api { status, body });
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| PredictError::MalformedResponse(e.to_string()))?;

        let label = Self::parse_label(body)?;
        debug!(label = %label, "prediction received");
        Ok(label)
    }

    fn name(&self) -> &str {
        "http"
    }
}
