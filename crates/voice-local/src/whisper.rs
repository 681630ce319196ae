//! OpenAI Whisper transcription over HTTP.

use crate::{Result, Transcriber, TranscriptionConfig, VoiceError, WhisperEndpoint};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, error, info};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

pub struct WhisperTranscriber {
    config: TranscriptionConfig,
    api_key: String,
    url: String,
    client: reqwest::Client,
}

impl WhisperTranscriber {
    pub fn new(config: TranscriptionConfig) -> Result<Self> {
        let api_key = match config.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => key.to_string(),
            None => std::env::var(API_KEY_ENV).map_err(|_| {
                VoiceError::Config(format!("no API key configured and {API_KEY_ENV} unset"))
            })?,
        };
        let url = format!(
            "{}/{}",
            config.api_base.trim_end_matches('/'),
            config.endpoint.path()
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| VoiceError::Config(e.to_string()))?;
        Ok(Self {
            config,
            api_key,
            url,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn form(&self, wav: &[u8]) -> Result<Form> {
        let part = Part::bytes(wav.to_vec())
            .file_name("voice.wav")
            .mime_str("audio/wav")
            .map_err(|e| VoiceError::Request(e.to_string()))?;
        let mut form = Form::new()
            .part("file", part)
            .text("model", self.config.model.clone());
        if self.config.endpoint == WhisperEndpoint::Transcriptions {
            if let Some(lang) = &self.config.language {
                form = form.text("language", lang.clone());
            }
        }
        Ok(form)
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, wav: &[u8]) -> Result<String> {
        debug!(audio_bytes = wav.len(), url = %self.url, "starting Whisper request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .multipart(self.form(wav)?)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Whisper request failed");
                VoiceError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Whisper API error");
            return Err(VoiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: WhisperResponse = response.json().await?;
        info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }

    fn name(&self) -> &str {
        "whisper"
    }
}
