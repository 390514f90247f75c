//! OpenAI-compatible chat-completions transport
//!
//! Serves any API speaking the `/chat/completions` dialect: OpenAI
//! itself, DeepSeek, and Mistral, configured with their own base URLs
//! and keys. Also backs the assisting model, which additionally uses the
//! `response_format: json_object` constraint for its strict-JSON calls.

use super::{ProviderTransport, map_transport_error, truncate_body};
use async_trait::async_trait;
use resolve_application::LlmError;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct OpenAiCompatTransport {
    client: reqwest::Client,
    chat_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl OpenAiCompatTransport {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            chat_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }

    /// Shared by the plain and JSON-constrained paths.
    pub(crate) async fn send_chat(
        &self,
        system: &str,
        user: &str,
        model: &str,
        temperature: f32,
        max_tokens: u32,
        json_object: bool,
    ) -> Result<String, LlmError> {
        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
            response_format: json_object.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        debug!("POST {} (model {})", self.chat_url, model);
        let response = self
            .client
            .post(&self.chat_url)
            .bearer_auth(&self.api_key)
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

        let decoded: ChatResponse = response.json().await.map_err(map_transport_error)?;
        let content = decoded
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(content)
    }
}

#[async_trait]
impl ProviderTransport for OpenAiCompatTransport {
    async fn send(
        &self,
        system: &str,
        user: &str,
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.send_chat(system, user, model, temperature, max_tokens, false)
            .await
    }
}
