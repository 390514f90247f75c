//! Advocate fan-out use case
//!
//! Queries every provider on the panel concurrently for one question and
//! always returns a full, provider-ordered result set. Failures never
//! abort the batch — each provider's slot is filled with a placeholder
//! result instead.

use crate::ports::llm::{AdvocateGateway, LlmError};
use crate::ports::progress::{DeliberationPhase, ProgressNotifier};
use resolve_domain::prompt::advocate::advocate_system;
use resolve_domain::{AdvocateResult, Provider, into_provider_order, parse_advocate_reply};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{info, warn};

/// Default per-call deadline. Each provider call carries its own; a slow
/// provider never blocks its siblings.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Use case for querying all advocates concurrently.
pub struct AdvocateFanOut<G: AdvocateGateway + 'static> {
    gateway: Arc<G>,
    call_timeout: Duration,
}

impl<G: AdvocateGateway + 'static> AdvocateFanOut<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Query every provider with the same user message.
    pub async fn run(
        &self,
        user_message: &str,
        progress: &dyn ProgressNotifier,
    ) -> Vec<AdvocateResult> {
        let message = user_message.to_string();
        self.run_each(move |_| message.clone(), progress).await
    }

    /// Query every provider with its own user message (reconsideration
    /// rounds, where each advocate sees different rival reasoning).
    pub async fn run_personalized<F>(
        &self,
        message_for: F,
        progress: &dyn ProgressNotifier,
    ) -> Vec<AdvocateResult>
    where
        F: Fn(Provider) -> String,
    {
        self.run_each(message_for, progress).await
    }

    async fn run_each<F>(
        &self,
        message_for: F,
        progress: &dyn ProgressNotifier,
    ) -> Vec<AdvocateResult>
    where
        F: Fn(Provider) -> String,
    {
        progress.on_phase_start(DeliberationPhase::Advocates, Provider::COUNT);

        let mut join_set = JoinSet::new();

        for provider in Provider::ALL {
            let gateway = Arc::clone(&self.gateway);
            let user = message_for(provider);
            let deadline = self.call_timeout;

            join_set.spawn(async move {
                Self::query_one(&gateway, provider, &user, deadline).await
            });
        }

        let mut results = Vec::with_capacity(Provider::COUNT);

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((result, answered)) => {
                    progress.on_advocate_complete(result.provider, answered);
                    results.push(result);
                }
                Err(e) => {
                    // A panicked task still must not shrink the batch.
                    warn!("Advocate task join error: {}", e);
                }
            }
        }

        // Each spawned task writes only its own slot; normalize the
        // completion-order race away before anything downstream sees it.
        let mut results = into_provider_order(results);

        // Backfill any slot lost to a panic so the contract holds.
        if results.len() != Provider::COUNT {
            for provider in Provider::ALL {
                if !results.iter().any(|r| r.provider == provider) {
                    results.push(AdvocateResult::no_response(
                        provider,
                        "The advocate task failed unexpectedly.",
                    ));
                }
            }
            results = into_provider_order(results);
        }

        progress.on_phase_complete(DeliberationPhase::Advocates);
        results
    }

    /// Returns the result plus whether the provider genuinely answered.
    async fn query_one(
        gateway: &G,
        provider: Provider,
        user: &str,
        deadline: Duration,
    ) -> (AdvocateResult, bool) {
        let call = gateway.query(provider, advocate_system(provider), user);

        match timeout(deadline, call).await {
            Ok(Ok(text)) => {
                info!("Advocate {} responded", provider);
                let parsed = parse_advocate_reply(&text);
                (
                    AdvocateResult::new(provider, parsed.explanation, parsed.summary),
                    true,
                )
            }
            Ok(Err(LlmError::MissingApiKey)) => {
                warn!("Advocate {} has no API key", provider);
                (AdvocateResult::missing_key(provider), false)
            }
            Ok(Err(e)) => {
                warn!("Advocate {} failed: {}", provider, e);
                (
                    AdvocateResult::no_response(
                        provider,
                        format!("{} request failed: {}.", provider.display_name(), e),
                    ),
                    false,
                )
            }
            Err(_) => {
                warn!("Advocate {} timed out after {:?}", provider, deadline);
                (
                    AdvocateResult::no_response(
                        provider,
                        format!(
                            "{} did not respond within {} seconds.",
                            provider.display_name(),
                            deadline.as_secs()
                        ),
                    ),
                    false,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use resolve_domain::{MISSING_KEY_SUMMARY, NO_RESPONSE_SUMMARY};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Gateway that answers from a canned script after a per-provider
    /// delay, so completion order can be forced to differ from panel
    /// order.
    struct ScriptedGateway {
        replies: HashMap<Provider, Result<String, ()>>,
        delays_ms: HashMap<Provider, u64>,
        missing_keys: Vec<Provider>,
        calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn answering_all() -> Self {
            let replies = Provider::ALL
                .iter()
                .map(|&p| {
                    (
                        p,
                        Ok(format!(
                            "EXPLANATION: reasoning from {}\nSUMMARY: answer from {}",
                            p.as_str(),
                            p.as_str()
                        )),
                    )
                })
                .collect();
            Self {
                replies,
                delays_ms: HashMap::new(),
                missing_keys: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AdvocateGateway for ScriptedGateway {
        async fn query(
            &self,
            provider: Provider,
            _system: &str,
            _user: &str,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.missing_keys.contains(&provider) {
                return Err(LlmError::MissingApiKey);
            }
            if let Some(&ms) = self.delays_ms.get(&provider) {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            match self.replies.get(&provider) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(())) => Err(LlmError::BadStatus {
                    status: 500,
                    body: "boom".to_string(),
                }),
                None => Err(LlmError::Transport("unscripted provider".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_output_is_full_panel_in_fixed_order_despite_delays() {
        let mut gateway = ScriptedGateway::answering_all();
        // Reverse the completion order: first provider finishes last.
        gateway.delays_ms = Provider::ALL
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, (Provider::COUNT - i) as u64 * 20))
            .collect();

        let fan_out = AdvocateFanOut::new(Arc::new(gateway));
        let results = fan_out.run("QUESTION: test", &NoProgress).await;

        assert_eq!(results.len(), Provider::COUNT);
        let order: Vec<Provider> = results.iter().map(|r| r.provider).collect();
        assert_eq!(order, Provider::ALL.to_vec());
        assert_eq!(results[0].summary, "answer from openai");
        assert_eq!(results[4].summary, "answer from mistral");
    }

    #[tokio::test]
    async fn test_failures_become_inline_placeholders() {
        let mut gateway = ScriptedGateway::answering_all();
        gateway.replies.insert(Provider::Gemini, Err(()));
        gateway.missing_keys.push(Provider::Mistral);

        let fan_out = AdvocateFanOut::new(Arc::new(gateway));
        let results = fan_out.run("QUESTION: test", &NoProgress).await;

        assert_eq!(results.len(), Provider::COUNT);
        assert_eq!(results[2].provider, Provider::Gemini);
        assert_eq!(results[2].summary, NO_RESPONSE_SUMMARY);
        assert_eq!(results[4].provider, Provider::Mistral);
        assert_eq!(results[4].summary, MISSING_KEY_SUMMARY);
        // Healthy providers are untouched by their neighbors' failures
        assert_eq!(results[0].summary, "answer from openai");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_a_local_failure() {
        let mut gateway = ScriptedGateway::answering_all();
        gateway.delays_ms.insert(Provider::DeepSeek, 120_000);

        let fan_out =
            AdvocateFanOut::new(Arc::new(gateway)).with_timeout(Duration::from_secs(30));
        let results = fan_out.run("QUESTION: test", &NoProgress).await;

        assert_eq!(results.len(), Provider::COUNT);
        assert_eq!(results[3].provider, Provider::DeepSeek);
        assert_eq!(results[3].summary, NO_RESPONSE_SUMMARY);
        assert!(results[3].explanation.contains("30 seconds"));
        assert_eq!(results[0].summary, "answer from openai");
    }

    #[tokio::test]
    async fn test_personalized_messages_reach_their_provider() {
        struct EchoGateway;

        #[async_trait]
        impl AdvocateGateway for EchoGateway {
            async fn query(
                &self,
                _provider: Provider,
                _system: &str,
                user: &str,
            ) -> Result<String, LlmError> {
                Ok(format!("EXPLANATION: echo\nSUMMARY: {user}"))
            }
        }

        let fan_out = AdvocateFanOut::new(Arc::new(EchoGateway));
        let results = fan_out
            .run_personalized(|p| format!("message for {}", p.as_str()), &NoProgress)
            .await;

        for (result, provider) in results.iter().zip(Provider::ALL) {
            assert_eq!(result.summary, format!("message for {}", provider.as_str()));
        }
    }
}
