//! # OpenAI Transcription Client
//!
//! Speaks the `POST {base_url}/audio/transcriptions` multipart API with a fixed
//! model and the structured `json` response format. One client is built at
//! startup; the underlying `reqwest::Client` pools connections across requests.

use async_trait::async_trait;
use reqwest::{multipart, Client};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ProviderError;

use super::{AudioUpload, ProviderTranscript, TranscriptionProvider};

/// Structured response format requested from the provider.
const RESPONSE_FORMAT: &str = "json";

pub struct OpenAiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl OpenAiClient {
    /// An empty `api_key` is accepted here; the handler refuses to call the
    /// provider until a real one is configured.
    pub fn new(api_key: SecretString, base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAiClient {
    async fn transcribe(&self, upload: AudioUpload) -> Result<ProviderTranscript, ProviderError> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let filename = upload.resolved_filename();
        let content_type = upload.resolved_content_type().to_string();

        tracing::debug!(
            bytes = upload.bytes.len(),
            filename = %filename,
            content_type = %content_type,
            model = %self.model,
            "Sending transcription request"
        );

        let file = multipart::Part::bytes(upload.bytes)
            .file_name(filename)
            .mime_str(&content_type)
            .map_err(|e| ProviderError::InvalidRequest(format!("Invalid content type: {e}")))?;

        let form = multipart::Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("response_format", RESPONSE_FORMAT);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        tracing::debug!(chars = result.text.len(), "Transcription response received");

        Ok(ProviderTranscript { text: result.text })
    }

    fn name(&self) -> &str {
        "openai"
    }
}
