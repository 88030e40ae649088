//! Gemini `generateContent` client.
//!
//! One-shot request/response: no retries, no backoff, no streaming, no
//! cancellation. The call state machine makes the single-in-flight guard
//! explicit instead of relying on a disabled control in a UI layer.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::attachment::Attachment;
use crate::config::PulpitConfig;
use crate::error::PulpitError;

const X_GOOG_API_KEY: &str = "X-Goog-Api-Key";

/// Returned when the service responds successfully but with no text.
/// Deliberately a plain result, not an error.
pub const EMPTY_RESULT_FALLBACK: &str = "생성된 내용이 없습니다.";

/// Lifecycle of the single generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Idle,
    InFlight,
    Completed,
    Failed,
}

/// Blocking HTTP client for the generation service.
///
/// The credential is injected at construction from [`PulpitConfig`]; the
/// client never reads the process environment itself.
pub struct GenerationClient {
    api_key: Option<String>,
    endpoint: Url,
    temperature: f64,
    thinking_budget: u32,
    client: Client,
    state: ClientState,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("endpoint", &self.endpoint)
            .field("temperature", &self.temperature)
            .field("thinking_budget", &self.thinking_budget)
            .field("state", &self.state)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GenerationClient {
    pub fn new(config: &PulpitConfig) -> Result<Self, PulpitError> {
        let endpoint = endpoint_url(&config.api_url, &config.model)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                tracing::error!(err = %e, "failed to build HTTP client");
                PulpitError::GenerationFailed
            })?;

        Ok(Self {
            api_key: config.api_key.clone(),
            endpoint,
            temperature: config.temperature,
            thinking_budget: config.thinking_budget,
            client,
            state: ClientState::Idle,
        })
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    /// Send the prompt (and optional attachment) and return the generated
    /// Markdown.
    ///
    /// Fails with `Busy` while a call is in flight, and with
    /// `MissingCredential` before any network attempt when no API key is
    /// configured. An empty response body yields [`EMPTY_RESULT_FALLBACK`].
    pub fn generate(
        &mut self,
        prompt: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, PulpitError> {
        if self.state == ClientState::InFlight {
            return Err(PulpitError::Busy);
        }

        // Credential check precedes any network traffic.
        let Some(api_key) = self.api_key.clone() else {
            tracing::warn!("no API credential configured; generation not attempted");
            return Err(PulpitError::MissingCredential);
        };

        let mut parts = vec![Part::text(prompt)];
        if let Some(a) = attachment {
            parts.push(Part::inline_data(&a.mime_type, &a.data));
        }
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig {
                    thinking_budget: self.thinking_budget,
                },
                temperature: self.temperature,
            },
        };

        self.state = ClientState::InFlight;
        tracing::info!(
            prompt_len = prompt.len(),
            has_attachment = attachment.is_some(),
            "dispatching generation request"
        );

        let result = self.send_request(&api_key, &request);
        self.state = match result {
            Ok(_) => ClientState::Completed,
            Err(_) => ClientState::Failed,
        };
        result
    }

    fn send_request(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, PulpitError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(X_GOOG_API_KEY, api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .map_err(|e| {
                tracing::error!(err = %e, "generation request failed to send");
                PulpitError::GenerationFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "generation service returned an error"
            );
            return Err(PulpitError::GenerationFailed);
        }

        let api_response: GenerateContentResponse = response.json().map_err(|e| {
            tracing::error!(err = %e, "failed to parse generation response");
            PulpitError::GenerationFailed
        })?;

        let text = api_response.text();
        if text.is_empty() {
            tracing::warn!("generation response contained no text; using fallback");
            return Ok(EMPTY_RESULT_FALLBACK.to_owned());
        }
        Ok(text)
    }

    #[cfg(test)]
    pub(crate) fn force_in_flight(&mut self) {
        self.state = ClientState::InFlight;
    }
}

fn endpoint_url(api_url: &Url, model: &str) -> Result<Url, PulpitError> {
    let base = api_url.as_str().trim_end_matches('/');
    let raw = format!("{base}/v1beta/models/{model}:generateContent");
    Url::parse(&raw).map_err(|e| PulpitError::InvalidApiUrl {
        value: raw,
        detail: e.to_string(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

/// One request/response part: prompt text or inline document data.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_owned()),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: &str, data: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_owned(),
                data: data.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
    temperature: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts, empty when the
    /// response carries no candidate or no text.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}
