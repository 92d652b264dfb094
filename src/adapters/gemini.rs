//! Gemini narration adapter.
//!
//! Implements [`NarrationPort`] over the Gemini `generateContent` REST API
//! with a blocking HTTP client.  Errors are mapped onto [`NarrationError`]
//! and are expected to be swallowed by [`narrate`](crate::narration::narrate).

use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::app::ports::NarrationPort;
use crate::config::NarrationConfig;
use crate::error::NarrationError;
use crate::narration::prompt_for;
use crate::sensors::SensorReading;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiNarrator {
    client: reqwest::blocking::Client,
    model: String,
    api_key: Option<String>,
}

impl GeminiNarrator {
    /// Build from config, reading the key from `config.api_key_env`.
    ///
    /// A missing key is not an error here; every call then fails with
    /// [`NarrationError::MissingApiKey`].
    pub fn from_config(config: &NarrationConfig) -> Result<Self, NarrationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NarrationError::Network(e.to_string()))?;
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty());
        Ok(Self {
            client,
            model: config.model.clone(),
            api_key,
        })
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl NarrationPort for GeminiNarrator {
    fn advise(&mut self, reading: &SensorReading) -> Result<String, NarrationError> {
        let key = self.api_key.as_deref().ok_or(NarrationError::MissingApiKey)?;
        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt_for(reading) }] }]
        });

        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .map_err(|e| NarrationError::Network(e.to_string()))?;

        let status = resp.status();
        debug!("Gemini responded {status}");
        match status.as_u16() {
            401 | 403 => return Err(NarrationError::Auth),
            429 => return Err(NarrationError::Quota),
            _ if !status.is_success() => {
                return Err(NarrationError::Network(format!("HTTP {status}")));
            }
            _ => {}
        }

        let parsed: GenerateResponse = resp
            .json()
            .map_err(|e| NarrationError::InvalidResponse(e.to_string()))?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(NarrationError::InvalidResponse(String::from("no text in candidates")));
        }
        Ok(text)
    }
}
