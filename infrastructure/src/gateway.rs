//! Gateway adapters wiring the HTTP transports to the application ports
//!
//! The advocate gateway holds one binding per panel provider; the assist
//! gateway holds the single OpenAI-compatible binding used by labeler,
//! classifier, and arbiter calls. A missing credential short-circuits to
//! `LlmError::MissingApiKey` before any request is made.

use crate::config::file_config::FileConfig;
use crate::http::{
    AnthropicTransport, GeminiTransport, OpenAiCompatTransport, ProviderTransport,
};
use async_trait::async_trait;
use resolve_application::{AdvocateGateway, AssistGateway, LlmError};
use resolve_domain::Provider;
use std::sync::Arc;
use std::time::Duration;

/// One provider's transport plus its bound generation parameters.
pub struct ProviderBinding {
    pub transport: Arc<dyn ProviderTransport>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_key_present: bool,
}

/// Advocate panel gateway backed by the HTTP transports.
pub struct HttpAdvocateGateway {
    /// Indexed by `Provider::ordinal()`
    bindings: [ProviderBinding; Provider::COUNT],
}

impl HttpAdvocateGateway {
    pub fn new(bindings: [ProviderBinding; Provider::COUNT]) -> Self {
        Self { bindings }
    }

    /// Build the full panel from configuration.
    pub fn from_config(config: &FileConfig) -> Self {
        let client = http_client(config);
        let p = &config.providers;

        let openai_key = p.openai.resolve_api_key();
        let anthropic_key = p.anthropic.resolve_api_key();
        let gemini_key = p.gemini.resolve_api_key();
        let deepseek_key = p.deepseek.resolve_api_key();
        let mistral_key = p.mistral.resolve_api_key();

        let binding = |transport: Arc<dyn ProviderTransport>,
                       entry: &crate::config::file_config::ProviderEntry,
                       key: &str| ProviderBinding {
            transport,
            model: entry.model.clone(),
            temperature: entry.temperature,
            max_tokens: entry.max_tokens,
            api_key_present: !key.is_empty(),
        };

        Self::new([
            binding(
                Arc::new(OpenAiCompatTransport::new(
                    client.clone(),
                    &p.openai.base_url,
                    openai_key.clone(),
                )),
                &p.openai,
                &openai_key,
            ),
            binding(
                Arc::new(AnthropicTransport::new(
                    client.clone(),
                    &p.anthropic.base_url,
                    anthropic_key.clone(),
                )),
                &p.anthropic,
                &anthropic_key,
            ),
            binding(
                Arc::new(GeminiTransport::new(
                    client.clone(),
                    &p.gemini.base_url,
                    gemini_key.clone(),
                )),
                &p.gemini,
                &gemini_key,
            ),
            binding(
                Arc::new(OpenAiCompatTransport::new(
                    client.clone(),
                    &p.deepseek.base_url,
                    deepseek_key.clone(),
                )),
                &p.deepseek,
                &deepseek_key,
            ),
            binding(
                Arc::new(OpenAiCompatTransport::new(
                    client,
                    &p.mistral.base_url,
                    mistral_key.clone(),
                )),
                &p.mistral,
                &mistral_key,
            ),
        ])
    }
}

#[async_trait]
impl AdvocateGateway for HttpAdvocateGateway {
    async fn query(
        &self,
        provider: Provider,
        system: &str,
        user: &str,
    ) -> Result<String, LlmError> {
        let binding = &self.bindings[provider.ordinal()];
        if !binding.api_key_present {
            return Err(LlmError::MissingApiKey);
        }
        binding
            .transport
            .send(
                system,
                user,
                &binding.model,
                binding.temperature,
                binding.max_tokens,
            )
            .await
    }
}

/// Assisting-model gateway. Always OpenAI-compatible; the JSON-mode path
/// adds the `response_format: json_object` constraint.
pub struct HttpAssistGateway {
    transport: OpenAiCompatTransport,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_key_present: bool,
}

impl HttpAssistGateway {
    pub fn from_config(config: &FileConfig) -> Self {
        let key = config.assist.resolve_api_key();
        Self {
            transport: OpenAiCompatTransport::new(
                http_client(config),
                &config.assist.base_url,
                key.clone(),
            ),
            model: config.assist.model.clone(),
            temperature: config.assist.temperature,
            max_tokens: config.assist.max_tokens,
            api_key_present: !key.is_empty(),
        }
    }

    async fn send(&self, system: &str, user: &str, json: bool) -> Result<String, LlmError> {
        if !self.api_key_present {
            return Err(LlmError::MissingApiKey);
        }
        self.transport
            .send_chat(
                system,
                user,
                &self.model,
                self.temperature,
                self.max_tokens,
                json,
            )
            .await
    }
}

#[async_trait]
impl AssistGateway for HttpAssistGateway {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.send(system, user, false).await
    }

    async fn complete_json(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.send(system, user, true).await
    }
}

fn http_client(config: &FileConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(
            config.deliberation.request_timeout_secs,
        ))
        .build()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file_config::{AssistConfig, ProviderEntry};

    fn keyless_config() -> FileConfig {
        let entry = |env: &str| ProviderEntry {
            api_key_env: format!("RESOLVE_TEST_UNSET_{env}"),
            base_url: "https://example.invalid".to_string(),
            model: "m".to_string(),
            ..Default::default()
        };
        FileConfig {
            providers: crate::config::file_config::ProvidersConfig {
                openai: entry("OPENAI"),
                anthropic: entry("ANTHROPIC"),
                gemini: entry("GEMINI"),
                deepseek: entry("DEEPSEEK"),
                mistral: entry("MISTRAL"),
            },
            assist: AssistConfig {
                api_key_env: "RESOLVE_TEST_UNSET_ASSIST".to_string(),
                base_url: "https://example.invalid".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits_without_a_request() {
        let gateway = HttpAdvocateGateway::from_config(&keyless_config());
        for provider in Provider::ALL {
            let err = gateway.query(provider, "sys", "usr").await.unwrap_err();
            assert!(matches!(err, LlmError::MissingApiKey), "{provider:?}");
        }
    }

    #[tokio::test]
    async fn test_assist_missing_key_short_circuits() {
        let gateway = HttpAssistGateway::from_config(&keyless_config());
        let err = gateway.complete_json("sys", "usr").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }
}
