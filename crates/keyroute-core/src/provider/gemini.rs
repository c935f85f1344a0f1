//! Google (Gemini) provider implementation

use super::sanitize::{redact_secret, sanitize_provider_error_text};
use super::{GenerationProvider, ProviderError};
use crate::config::ProviderSettings;
use crate::credential::ApiSecret;
use crate::error::{RouteError, RouteResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    base_url: String,
    http_client: Client,
}

impl GeminiProvider {
    /// Create a provider with connection and request timeouts from `settings`
    pub fn new(settings: &ProviderSettings) -> RouteResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(settings.connect_timeout())
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| {
                RouteError::config_with_context(
                    format!("Failed to create HTTP client: {}", e),
                    "Building the Gemini provider",
                )
            })?;

        debug!(
            "Created Gemini provider for {} with timeouts: connection={}s, request={}s",
            settings.base_url, settings.connect_timeout_secs, settings.request_timeout_secs
        );

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, secret, prompt), level = "debug")]
    async fn generate(
        &self,
        secret: &ApiSecret,
        model: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let request_body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
        });

        let response = self
            .http_client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, secret.expose())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                ProviderError::new(format!(
                    "Gemini request failed: {}",
                    clean(&e.to_string(), secret)
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::with_status(
                status.as_u16(),
                format!(
                    "Gemini API error (status {}): {}",
                    status,
                    clean(&error_text, secret)
                ),
            ));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            ProviderError::new(format!("Failed to parse Gemini response: {}", e))
        })?;

        extract_text(&response_json)
    }
}

fn clean(text: &str, secret: &ApiSecret) -> String {
    sanitize_provider_error_text(&redact_secret(text, secret.expose()))
}

/// Concatenate the text parts of the first candidate
pub(crate) fn extract_text(response: &Value) -> Result<String, ProviderError> {
    let parts = response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array);

    if let Some(parts) = parts {
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();
        if !text.is_empty() {
            return Ok(text);
        }
    }

    if let Some(reason) = response
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        return Err(ProviderError::new(format!(
            "Gemini blocked the prompt: {}",
            reason
        )));
    }

    let finish_reason = response
        .pointer("/candidates/0/finishReason")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    Err(ProviderError::new(format!(
        "Gemini returned no text (finish reason: {})",
        finish_reason
    )))
}
