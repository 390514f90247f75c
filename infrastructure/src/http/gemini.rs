//! Gemini generateContent transport

use super::{ProviderTransport, map_transport_error, truncate_body};
use async_trait::async_trait;
use resolve_application::LlmError;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct GeminiTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    system_instruction: Instruction<'a>,
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Instruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiTransport {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn generate_url(&self, model: &str) -> String {
        // The key travels as a query parameter on this API, not a header
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }
}

#[async_trait]
impl ProviderTransport for GeminiTransport {
    async fn send(
        &self,
        system: &str,
        user: &str,
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let body = GenerateRequest {
            system_instruction: Instruction {
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: user }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            },
        };

        debug!("POST gemini generateContent (model {})", model);
        let response = self
            .client
            .post(self.generate_url(model))
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

        let decoded: GenerateResponse = response.json().await.map_err(map_transport_error)?;
        let text: String = decoded
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

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
        let body = GenerateRequest {
            system_instruction: Instruction {
                parts: vec![Part { text: "sys" }],
            },
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "usr" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                max_output_tokens: 240,
            },
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["system_instruction"]["parts"][0]["text"], "sys");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 240);
    }

    #[test]
    fn test_generate_url_carries_model_and_key() {
        let transport = GeminiTransport::new(
            reqwest::Client::new(),
            "https://generativelanguage.googleapis.com/",
            "k123",
        );
        assert_eq!(
            transport.generate_url("gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key=k123"
        );
    }

    #[test]
    fn test_response_concatenates_parts() {
        let raw = r#"{"candidates": [{"content": {"parts": [
            {"text": "EXPLANATION: a\n"}, {"text": "SUMMARY: b"}
        ]}}]}"#;
        let decoded: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text: String = decoded.candidates[0]
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.clone())
            .collect();
        assert_eq!(text, "EXPLANATION: a\nSUMMARY: b");
    }
}
