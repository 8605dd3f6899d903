//! Hint and solution assistant.
//!
//! Turns a free-text task into one chat request against an `LlmProvider`.
//! Failures never escape: every provider error becomes the same fixed reply.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::model::HintMode;
use crate::traits::{GenerateRequest, LlmProvider, DEFAULT_SYSTEM_PROMPT};

/// Reply for a blank task. The provider is not called.
pub const EMPTY_TASK_MESSAGE: &str = "Please enter a task before requesting hints or solutions.";

/// Reply when the provider answered without any content.
pub const NO_CONTENT_MESSAGE: &str = "No response from AI.";

/// Reply for any provider failure.
pub const FAILURE_MESSAGE: &str = "Failed to fetch solution.";

/// Default model for the hosted provider.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Configuration for the assistant.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Model to request.
    pub model: String,
    /// Sampling temperature; provider default when unset.
    pub temperature: Option<f64>,
    /// Max tokens; provider default when unset.
    pub max_tokens: Option<u32>,
    /// Optional system prompt override.
    pub system_prompt_override: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            system_prompt_override: None,
        }
    }
}

/// How a request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    Answered,
    EmptyTask,
    NoContent,
    Failed,
}

/// What the user sees after asking for a hint or solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub mode: HintMode,
    pub status: ReplyStatus,
    pub text: String,
}

impl AssistantReply {
    fn new(mode: HintMode, status: ReplyStatus, text: impl Into<String>) -> Self {
        Self {
            mode,
            status,
            text: text.into(),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_request_start(&self, mode: HintMode, model: &str);
    fn on_request_complete(&self, reply: &AssistantReply, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_request_start(&self, _: HintMode, _: &str) {}
    fn on_request_complete(&self, _: &AssistantReply, _: Duration) {}
}

/// Build the user message for a task.
pub fn build_prompt(mode: HintMode, task: &str) -> String {
    let lead = match mode {
        HintMode::Hint => "Give a hint for writing an Ansible playbook to:",
        HintMode::Solution => "Write an Ansible playbook to:",
    };
    format!("{lead} {task}")
}

/// Asks a provider for hints and solutions, one request at a time.
pub struct Assistant {
    provider: Arc<dyn LlmProvider>,
    config: AssistantConfig,
}

impl Assistant {
    pub fn new(provider: Arc<dyn LlmProvider>, config: AssistantConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Ask for a hint or a solution. Never fails.
    pub async fn request(
        &self,
        mode: HintMode,
        task: &str,
        progress: &dyn ProgressReporter,
    ) -> AssistantReply {
        if task.trim().is_empty() {
            return AssistantReply::new(mode, ReplyStatus::EmptyTask, EMPTY_TASK_MESSAGE);
        }

        let start = Instant::now();
        progress.on_request_start(mode, &self.config.model);

        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: build_prompt(mode, task),
            system_prompt: Some(
                self.config
                    .system_prompt_override
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            ),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let reply = match self.provider.generate(&request).await {
            Ok(response) if response.content.trim().is_empty() => {
                tracing::warn!(provider = self.provider.name(), "provider returned no content");
                AssistantReply::new(mode, ReplyStatus::NoContent, NO_CONTENT_MESSAGE)
            }
            Ok(response) => {
                tracing::info!(
                    provider = self.provider.name(),
                    model = %response.model,
                    latency_ms = response.latency_ms,
                    total_tokens = response.token_usage.total_tokens,
                    "{mode} received"
                );
                AssistantReply::new(mode, ReplyStatus::Answered, response.content)
            }
            Err(e) => {
                let kind = e
                    .downcast_ref::<ProviderError>()
                    .map(ProviderError::kind)
                    .unwrap_or("other");
                tracing::error!(
                    provider = self.provider.name(),
                    kind,
                    "error fetching {mode}: {e:#}"
                );
                AssistantReply::new(mode, ReplyStatus::Failed, FAILURE_MESSAGE)
            }
        };

        progress.on_request_complete(&reply, start.elapsed());
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::traits::{GenerateResponse, ModelInfo, TokenUsage};

    /// Provider stub that replays one canned outcome.
    struct StubProvider {
        outcome: Result<String, u16>,
        calls: AtomicU32,
        last_prompt: Mutex<Option<GenerateRequest>>,
    }

    impl StubProvider {
        fn answering(content: &str) -> Self {
            Self {
                outcome: Ok(content.to_string()),
                calls: AtomicU32::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                outcome: Err(status),
                calls: AtomicU32::new(0),
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            *self.last_prompt.lock().unwrap() = Some(request.clone());
            match &self.outcome {
                Ok(content) => Ok(GenerateResponse {
                    content: content.clone(),
                    model: request.model.clone(),
                    token_usage: TokenUsage::default(),
                    latency_ms: 1,
                }),
                Err(status) => Err(ProviderError::ApiError {
                    status: *status,
                    message: "stub failure".into(),
                }
                .into()),
            }
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    fn assistant(provider: Arc<StubProvider>) -> Assistant {
        Assistant::new(provider, AssistantConfig::default())
    }

    #[test]
    fn prompts_per_mode() {
        assert_eq!(
            build_prompt(HintMode::Hint, "install nginx"),
            "Give a hint for writing an Ansible playbook to: install nginx"
        );
        assert_eq!(
            build_prompt(HintMode::Solution, "install nginx"),
            "Write an Ansible playbook to: install nginx"
        );
    }

    #[tokio::test]
    async fn blank_task_skips_provider() {
        let provider = Arc::new(StubProvider::answering("unused"));
        let reply = assistant(provider.clone())
            .request(HintMode::Hint, "   \n\t", &NoopReporter)
            .await;
        assert_eq!(reply.status, ReplyStatus::EmptyTask);
        assert_eq!(reply.text, EMPTY_TASK_MESSAGE);
        assert_eq!(provider.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn answered_reply_passes_content_through() {
        let provider = Arc::new(StubProvider::answering("Use the apt module."));
        let reply = assistant(provider.clone())
            .request(HintMode::Hint, "install nginx", &NoopReporter)
            .await;
        assert_eq!(reply.status, ReplyStatus::Answered);
        assert_eq!(reply.text, "Use the apt module.");
        assert_eq!(provider.calls.load(Ordering::Relaxed), 1);

        let sent = provider.last_prompt.lock().unwrap().clone().unwrap();
        assert_eq!(sent.model, DEFAULT_MODEL);
        assert_eq!(sent.system_prompt.as_deref(), Some(DEFAULT_SYSTEM_PROMPT));
        assert!(sent.prompt.starts_with("Give a hint"));
        assert!(sent.temperature.is_none());
    }

    #[tokio::test]
    async fn empty_content_becomes_no_response() {
        let provider = Arc::new(StubProvider::answering("  "));
        let reply = assistant(provider)
            .request(HintMode::Solution, "install nginx", &NoopReporter)
            .await;
        assert_eq!(reply.status, ReplyStatus::NoContent);
        assert_eq!(reply.text, NO_CONTENT_MESSAGE);
    }

    #[tokio::test]
    async fn failure_collapses_without_retry() {
        let provider = Arc::new(StubProvider::failing(503));
        let reply = assistant(provider.clone())
            .request(HintMode::Solution, "install nginx", &NoopReporter)
            .await;
        assert_eq!(reply.status, ReplyStatus::Failed);
        assert_eq!(reply.text, FAILURE_MESSAGE);
        assert_eq!(provider.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn system_prompt_override_is_sent() {
        let provider = Arc::new(StubProvider::answering("ok"));
        let config = AssistantConfig {
            system_prompt_override: Some("Be terse.".into()),
            temperature: Some(0.2),
            ..Default::default()
        };
        Assistant::new(provider.clone(), config)
            .request(HintMode::Hint, "start apache", &NoopReporter)
            .await;
        let sent = provider.last_prompt.lock().unwrap().clone().unwrap();
        assert_eq!(sent.system_prompt.as_deref(), Some("Be terse."));
        assert_eq!(sent.temperature, Some(0.2));
    }

    struct CountingReporter {
        started: AtomicU32,
        completed: AtomicU32,
    }

    impl ProgressReporter for CountingReporter {
        fn on_request_start(&self, _: HintMode, _: &str) {
            self.started.fetch_add(1, Ordering::Relaxed);
        }
        fn on_request_complete(&self, _: &AssistantReply, _: Duration) {
            self.completed.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[tokio::test]
    async fn reporter_sees_one_request() {
        let reporter = CountingReporter {
            started: AtomicU32::new(0),
            completed: AtomicU32::new(0),
        };
        let provider = Arc::new(StubProvider::failing(500));
        assistant(provider)
            .request(HintMode::Hint, "install nginx", &reporter)
            .await;
        assert_eq!(reporter.started.load(Ordering::Relaxed), 1);
        assert_eq!(reporter.completed.load(Ordering::Relaxed), 1);
    }
}
