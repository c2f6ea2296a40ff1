//! # Provider Seam
//!
//! Types passed between the HTTP handler and the speech-to-text provider, and the
//! [`TranscriptionProvider`] trait the handler calls through. Upload metadata is
//! normalized here so every provider forwards the same filename and MIME type.

use async_trait::async_trait;

use crate::error::ProviderError;

/// Filename sent upstream when the client supplied none.
pub const DEFAULT_FILENAME: &str = "audio.webm";

/// MIME type sent upstream when the client declared none.
pub const DEFAULT_CONTENT_TYPE: &str = "audio/webm";

/// Longest filename forwarded upstream.
const MAX_FILENAME_LEN: usize = 80;

/// One uploaded audio file, fully buffered in memory.
///
/// Lives only for the duration of a request.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AudioUpload {
    /// Sanitized filename to forward, falling back to [`DEFAULT_FILENAME`].
    ///
    /// Lowercased, anything outside `[a-z0-9._-]` becomes `-`, runs of `-` are
    /// collapsed and the result is capped at 80 characters.
    pub fn resolved_filename(&self) -> String {
        non_empty(self.filename.as_deref())
            .map(sanitize_filename)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
    }

    /// MIME type to forward, falling back to [`DEFAULT_CONTENT_TYPE`].
    pub fn resolved_content_type(&self) -> &str {
        non_empty(self.content_type.as_deref()).unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// False only when the client declared a non-`audio/*` MIME type.
    pub fn is_audio(&self) -> bool {
        self.resolved_content_type().starts_with("audio/")
    }
}

fn sanitize_filename(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());

    for c in name.chars().flat_map(char::to_lowercase) {
        let c = match c {
            'a'..='z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '-',
        };
        if c == '-' && sanitized.ends_with('-') {
            continue;
        }
        sanitized.push(c);
    }

    sanitized.chars().take(MAX_FILENAME_LEN).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Raw text returned by the provider, before any trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTranscript {
    pub text: String,
}

/// External speech-to-text service.
///
/// Implementations are created once at startup and shared by every request, so
/// they must not hold per-request mutable state.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Submit the audio and return the provider's text.
    async fn transcribe(&self, upload: AudioUpload) -> Result<ProviderTranscript, ProviderError>;

    /// Short provider name used in logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: Option<&str>, content_type: Option<&str>) -> AudioUpload {
        AudioUpload {
            filename: filename.map(str::to_string),
            content_type: content_type.map(str::to_string),
            bytes: vec![1, 2, 3],
        }
    }

    fn upload_named(filename: &str) -> AudioUpload {
        upload(Some(filename), None)
    }

    #[test]
    fn test_defaults_apply_when_missing() {
        let upload = upload(None, None);
        assert_eq!(upload.resolved_filename(), "audio.webm");
        assert_eq!(upload.resolved_content_type(), "audio/webm");
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let upload = upload(Some(""), Some(""));
        assert_eq!(upload.resolved_filename(), DEFAULT_FILENAME);
        assert_eq!(upload.resolved_content_type(), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_filename_is_sanitized() {
        let upload = upload(Some("Voice Memo (2024) #3.M4A"), None);
        assert_eq!(upload.resolved_filename(), "voice-memo-2024-3.m4a");

        let upload = upload_named("Grabación  ñ.webm");
        assert_eq!(upload.resolved_filename(), "grabaci-n-.webm");
    }

    #[test]
    fn test_filename_is_capped() {
        let long = format!("{}.webm", "a".repeat(100));
        let upload = upload_named(&long);
        assert_eq!(upload.resolved_filename().len(), 80);
        assert!(upload.resolved_filename().chars().all(|c| c == 'a'));
    }

    #[test]
    fn test_is_audio() {
        assert!(upload(None, None).is_audio());
        assert!(upload(None, Some("audio/ogg")).is_audio());
        assert!(!upload(None, Some("text/plain")).is_audio());
        assert!(!upload(None, Some("video/webm")).is_audio());
    }

    #[test]
    fn test_supplied_values_are_kept() {
        let upload = upload(Some("memo.m4a"), Some("audio/mp4"));
        assert_eq!(upload.resolved_filename(), "memo.m4a");
        assert_eq!(upload.resolved_content_type(), "audio/mp4");
    }
}
