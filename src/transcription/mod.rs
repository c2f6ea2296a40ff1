//! # Transcription Module
//!
//! Client side of the external speech-to-text provider. The relay adds no audio
//! processing of its own: an upload goes out as-is and the provider's text comes
//! back untouched. Trimming and empty-text handling live in the HTTP handler.
//!
//! ## Key Components:
//! - **provider**: the [`TranscriptionProvider`] seam and the upload/transcript types
//! - **openai**: [`OpenAiClient`], the production implementation

pub mod openai;      // OpenAI-compatible /audio/transcriptions client
pub mod provider;    // Provider trait and request/response types

pub use openai::OpenAiClient;
pub use provider::{AudioUpload, ProviderTranscript, TranscriptionProvider};
