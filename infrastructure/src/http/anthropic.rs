//! Anthropic messages-API transport

use super::{ProviderTransport, map_transport_error, truncate_body};
use async_trait::async_trait;
use resolve_application::LlmError;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_API_VERSION: &str = "2023-06-01";

pub struct AnthropicTransport {
    client: reqwest::Client,
    messages_url: String,
    api_key: String,
    api_version: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<UserMessage<'a>>,
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

impl AnthropicTransport {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            messages_url: format!("{}/v1/messages", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }
}

#[async_trait]
impl ProviderTransport for AnthropicTransport {
    async fn send(
        &self,
        system: &str,
        user: &str,
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model,
            max_tokens,
            temperature,
            system,
            messages: vec![UserMessage {
                role: "user",
                content: user,
            }],
        };

        debug!("POST {} (model {})", self.messages_url, model);
        let response = self
            .client
            .post(&self.messages_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::BadStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let decoded: MessagesResponse = response.json().await.map_err(map_transport_error)?;
        let text: String = decoded
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = MessagesRequest {
            model: "claude-sonnet-4-20250514",
            max_tokens: 240,
            temperature: 0.2,
            system: "sys",
            messages: vec![UserMessage {
                role: "user",
                content: "usr",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["system"], "sys");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 240);
    }

    #[test]
    fn test_response_concatenates_text_blocks() {
        let raw = r#"{"content": [
            {"type": "text", "text": "EXPLANATION: a\n"},
            {"type": "tool_use", "id": "x"},
            {"type": "text", "text": "SUMMARY: b"}
        ]}"#;
        let decoded: MessagesResponse = serde_json::from_str(raw).unwrap();
        let text: String = decoded
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect();
        assert_eq!(text, "EXPLANATION: a\nSUMMARY: b");
    }
}
