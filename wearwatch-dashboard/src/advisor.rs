// Wearwatch Dashboard - Predictive maintenance dashboard
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Advisory text generator over an OpenAI-compatible Responses API.
//!
//! The advisor is optional: without an API key no client is built and the
//! report and chatbot features report themselves disabled.

use crate::prompts;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use wearwatch::FeatureMap;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b";

/// Advisor error types.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response contained no text")]
    EmptyResponse,
}

/// Advisor settings.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// `None` disables the advisor.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl ResponsesReply {
    fn into_text(self) -> Option<String> {
        if let Some(text) = self.output_text.filter(|t| !t.trim().is_empty()) {
            return Some(text);
        }
        let text = self
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Advisor client.
#[derive(Debug, Clone)]
pub struct AdvisorClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl AdvisorClient {
    /// Build a client, or `None` when no API key is configured.
    pub fn from_config(config: &AdvisorConfig) -> Result<Option<Self>, AdvisorError> {
        let Some(api_key) = config.api_key.as_ref().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Some(Self {
            client,
            api_key: api_key.clone(),
            endpoint: format!("{}/responses", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let request = ResponsesRequest {
            model: &self.model,
            input: prompt,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("advisor replied {} ({} bytes)", status, body.len());

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorReply>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AdvisorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ResponsesReply = serde_json::from_str(&body)?;
        reply.into_text().ok_or(AdvisorError::EmptyResponse)
    }

    /// Short maintenance report for a scored snapshot.
    pub async fn maintenance_report(
        &self,
        features: &FeatureMap,
        label: u8,
        probability: f64,
    ) -> Result<String, AdvisorError> {
        self.generate(&prompts::maintenance_report(features, label, probability))
            .await
    }

    /// Answer a user question.
    pub async fn answer(
        &self,
        feature_names: &[String],
        question: &str,
    ) -> Result<String, AdvisorError> {
        self.generate(&prompts::chatbot(feature_names, question))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_key_disables_advisor() {
        assert!(AdvisorClient::from_config(&AdvisorConfig::default())
            .unwrap()
            .is_none());

        let blank = AdvisorConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(AdvisorClient::from_config(&blank).unwrap().is_none());
    }

    #[test]
    fn test_endpoint_from_base_url() {
        let config = AdvisorConfig {
            api_key: Some("key".to_string()),
            base_url: "http://localhost:9000/v1/".to_string(),
            ..Default::default()
        };
        let client = AdvisorClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.endpoint, "http://localhost:9000/v1/responses");
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_top_level_output_text() {
        let reply: ResponsesReply =
            serde_json::from_str(r#"{ "output_text": "Replace the tool." }"#).unwrap();
        assert_eq!(reply.into_text().as_deref(), Some("Replace the tool."));
    }

    #[test]
    fn test_nested_output_text() {
        let reply: ResponsesReply = serde_json::from_str(
            r#"{
                "output": [
                    { "type": "reasoning", "summary": [] },
                    { "type": "message", "content": [
                        { "type": "output_text", "text": "Torque is high." },
                        { "type": "output_text", "text": "Check the spindle." }
                    ] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(
            reply.into_text().as_deref(),
            Some("Torque is high.\nCheck the spindle.")
        );
    }

    #[test]
    fn test_empty_reply() {
        let reply: ResponsesReply = serde_json::from_str(r#"{ "output": [] }"#).unwrap();
        assert!(reply.into_text().is_none());
    }
}
