//! # Transcription Endpoint
//!
//! `POST /api/transcribe` takes a multipart upload with a field named `audio`,
//! relays it to the configured provider and answers with the trimmed text.
//!
//! ## Response:
//! ```json
//! { "text": "hello world" }
//! ```
//!
//! ## Failures (`{"detail": "..."}`):
//! - 500 when no provider credential is configured (the upload is never read)
//! - 400 when the form has no `audio` field
//! - 400 when the declared content type is not `audio/*`
//! - 400 when the provider returns only whitespace
//! - 500 with the error text for anything else

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    transcription::AudioUpload,
};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;
use serde::Serialize;
use tracing::debug;

/// Multipart field carrying the audio file.
pub const AUDIO_FIELD: &str = "audio";

pub const MISSING_API_KEY: &str = "OPENAI_API_KEY is not configured for the transcription relay";

pub const NOT_AUDIO: &str = "The uploaded file is not audio";

pub const EMPTY_TRANSCRIPT: &str = "Whisper returned no text for the submitted audio";

/// Successful transcription. `text` is trimmed and never empty.
#[derive(Debug, Serialize)]
pub struct TranscriptResult {
    pub text: String,
}

pub async fn transcribe(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    if !state.config.has_api_key() {
        return Err(AppError::Config(MISSING_API_KEY.to_string()));
    }

    let upload = read_upload(&mut payload).await?.ok_or_else(|| {
        AppError::BadRequest(format!("Missing required '{AUDIO_FIELD}' file in multipart form"))
    })?;

    if !upload.is_audio() {
        return Err(AppError::BadRequest(NOT_AUDIO.to_string()));
    }

    debug!(
        provider = state.provider.name(),
        bytes = upload.bytes.len(),
        "Relaying audio upload"
    );

    let transcript = state.provider.transcribe(upload).await?;

    let text = transcript.text.trim();
    if text.is_empty() {
        return Err(AppError::EmptyTranscript(EMPTY_TRANSCRIPT.to_string()));
    }

    Ok(HttpResponse::Ok().json(TranscriptResult {
        text: text.to_string(),
    }))
}

/// Buffer the first `audio` field of the form.
///
/// Returns `Ok(None)` when the form has no such field. Other fields are skipped.
async fn read_upload(
    payload: &mut Multipart,
) -> Result<Option<AudioUpload>, actix_multipart::MultipartError> {
    while let Some(mut field) = payload.try_next().await? {
        let is_audio = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .is_some_and(|name| name == AUDIO_FIELD);

        if !is_audio {
            while field.try_next().await?.is_some() {}
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            bytes.extend_from_slice(&chunk);
        }

        return Ok(Some(AudioUpload {
            filename,
            content_type,
            bytes,
        }));
    }

    Ok(None)
}
