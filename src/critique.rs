//! Vision-language critique of the selected squat frame.

use crate::biometrics::Biometrics;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Build the critique prompt from measured biometrics.
///
/// The knee angle is rendered with one decimal place; the depth status uses
/// the classification's display string.
pub fn build_prompt(biometrics: &Biometrics) -> String {
    format!(
        "Analyze this squat frame. Measured Knee Angle: {:.1}°. Depth Status: {}. Give 3 technical cues.",
        biometrics.knee_angle, biometrics.depth_status
    )
}

/// Capability interface for the vision critique collaborator.
///
/// The service is opaque, possibly slow, and possibly failing; failures
/// surface as [`Error::Collaborator`] and are never retried here.
#[async_trait]
pub trait CritiqueService: Send + Sync {
    /// Request a free-text critique for one JPEG image and a prompt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Collaborator`] on transport or service failure.
    async fn critique(&self, image_jpeg: &[u8], prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
    images: Vec<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Critique client for an Ollama-compatible chat endpoint
pub struct OllamaCritic {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaCritic {
    /// Create a client toward `endpoint` asking `model` for critiques.
    ///
    /// The timeout bounds every request; the collaborator offers no
    /// synchronous availability guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Collaborator`] if the HTTP client cannot be built.
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Collaborator(format!("Failed to build critique HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl CritiqueService for OllamaCritic {
    async fn critique(&self, image_jpeg: &[u8], prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
                images: vec![BASE64.encode(image_jpeg)],
            }],
            stream: false,
        };

        let url = format!("{}/api/chat", self.endpoint);
        log::debug!("Requesting critique from {url}");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Collaborator(format!("Critique request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Collaborator(format!("Critique service returned an error: {e}")))?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Collaborator(format!("Malformed critique response: {e}")))?;

        Ok(chat.message.content)
    }
}
