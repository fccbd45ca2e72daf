// crates/core/src/backend.rs
//! Transcription backend abstraction and the OpenAI Whisper implementation.
//!
//! The backend is treated as an opaque, possibly slow, possibly failing
//! collaborator: it gets an audio file and returns subtitle text. The
//! pipeline owns the timeout; this module only maps transport and provider
//! failures into [`BackendError`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tokio_util::io::ReaderStream;

/// Failures from a transcription attempt.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("cannot read audio file {path}: {source}")]
    ReadAudio {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transcription request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("transcription provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("transcription provider returned an empty transcript")]
    EmptyTranscript,
}

/// External speech-to-text service.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Transcribe the audio file at `audio` into subtitle (SRT) text.
    async fn transcribe(&self, audio: &Path) -> Result<String, BackendError>;
}

/// OpenAI `/audio/transcriptions` client (Whisper, SRT output).
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "whisper-1";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the API base URL (tests point this at a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn audio_part(&self, audio: &Path) -> Result<Part, BackendError> {
        let file = tokio::fs::File::open(audio)
            .await
            .map_err(|source| BackendError::ReadAudio {
                path: audio.to_path_buf(),
                source,
            })?;
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        // Stream the file instead of buffering it: uploads may be hundreds
        // of megabytes.
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        Ok(Part::stream(body)
            .file_name(file_name)
            .mime_str("application/octet-stream")?)
    }
}

#[async_trait]
impl TranscriptionBackend for OpenAiBackend {
    async fn transcribe(&self, audio: &Path) -> Result<String, BackendError> {
        let form = Form::new()
            .part("file", self.audio_part(audio).await?)
            .text("model", self.model.clone())
            .text("response_format", "srt");

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            // Provider error bodies can be large JSON blobs; keep enough to
            // diagnose without flooding the job record.
            let message: String = body.chars().take(500).collect();
            return Err(BackendError::Provider {
                status: status.as_u16(),
                message,
            });
        }
        if body.trim().is_empty() {
            return Err(BackendError::EmptyTranscript);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SRT: &str = "1\n00:00:00,000 --> 00:00:02,000\nhello world\n";

    fn temp_audio() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"fake mp3 bytes").unwrap();
        file
    }

    #[tokio::test]
    async fn test_transcribe_success_returns_body_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/transcriptions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(SRT)
            .create_async()
            .await;

        let backend = OpenAiBackend::new("test-key").with_base_url(server.url());
        let audio = temp_audio();

        let transcript = backend.transcribe(audio.path()).await.unwrap();
        assert_eq!(transcript, SRT);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transcribe_provider_error_maps_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/audio/transcriptions")
            .with_status(401)
            .with_body("{\"error\":{\"message\":\"Incorrect API key\"}}")
            .create_async()
            .await;

        let backend = OpenAiBackend::new("bad-key").with_base_url(server.url());
        let audio = temp_audio();

        let err = backend.transcribe(audio.path()).await.unwrap_err();
        match err {
            BackendError::Provider { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Incorrect API key"));
            }
            other => panic!("expected Provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transcribe_empty_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body("  \n")
            .create_async()
            .await;

        let backend = OpenAiBackend::new("test-key").with_base_url(server.url());
        let audio = temp_audio();

        let err = backend.transcribe(audio.path()).await.unwrap_err();
        assert!(matches!(err, BackendError::EmptyTranscript));
    }

    #[tokio::test]
    async fn test_transcribe_missing_audio_file() {
        let backend = OpenAiBackend::new("test-key").with_base_url("http://127.0.0.1:1");

        let err = backend
            .transcribe(Path::new("/nonexistent/audio.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::ReadAudio { .. }));
    }
}
