//! OpenAI-compatible chat completions provider.
//!
//! Serves both Groq (the default hosted backend) and OpenAI itself; the two
//! differ only in base URL and model catalogue.

use std::time::Instant;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tutor_core::error::ProviderError;
use tutor_core::traits::{
    GenerateRequest, GenerateResponse, LlmProvider, ModelInfo, TokenUsage, DEFAULT_SYSTEM_PROMPT,
};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Which hosted service an [`OpenAiProvider`] talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Groq,
    OpenAi,
}

impl Flavor {
    fn name(&self) -> &'static str {
        match self {
            Flavor::Groq => "groq",
            Flavor::OpenAi => "openai",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            Flavor::Groq => GROQ_BASE_URL,
            Flavor::OpenAi => OPENAI_BASE_URL,
        }
    }
}

/// OpenAI-compatible API provider.
pub struct OpenAiProvider {
    flavor: Flavor,
    api_key: String,
    base_url: String,
    org_id: Option<String>,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        flavor: Flavor,
        api_key: &str,
        base_url: Option<String>,
        org_id: Option<String>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        let base_url = base_url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| flavor.default_base_url().to_string());

        Ok(Self {
            flavor,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            org_id,
            client,
        })
    }

    /// Groq provider with the default base URL.
    pub fn groq(api_key: &str) -> anyhow::Result<Self> {
        Self::new(Flavor::Groq, api_key, None, None)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: ChatUsage,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        self.flavor.name()
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let start = Instant::now();

        let system_prompt = request
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let body = ChatRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let mut req = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json");

        if let Some(org) = &self.org_id {
            req = req.header("OpenAI-Organization", org);
        }

        let response = req.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                ProviderError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(ProviderError::ModelNotFound(request.model.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        Ok(GenerateResponse {
            content,
            model: api_response.model.unwrap_or_else(|| request.model.clone()),
            token_usage: TokenUsage {
                prompt_tokens: api_response.usage.prompt_tokens,
                completion_tokens: api_response.usage.completion_tokens,
                total_tokens: api_response.usage.total_tokens,
            },
            latency_ms,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        let provider = self.flavor.name();
        let catalogue: &[(&str, &str, u32)] = match self.flavor {
            Flavor::Groq => &[
                ("llama3-70b-8192", "Llama 3 70B", 8_192),
                ("llama3-8b-8192", "Llama 3 8B", 8_192),
                ("mixtral-8x7b-32768", "Mixtral 8x7B", 32_768),
            ],
            Flavor::OpenAi => &[
                ("gpt-4o", "GPT-4o", 128_000),
                ("gpt-4o-mini", "GPT-4o Mini", 128_000),
            ],
        };
        catalogue
            .iter()
            .map(|(id, name, max_context)| ModelInfo {
                id: (*id).into(),
                name: (*name).into(),
                provider: provider.into(),
                max_context: *max_context,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: "llama3-70b-8192".into(),
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
        }
    }

    fn provider(server: &MockServer) -> OpenAiProvider {
        OpenAiProvider::new(Flavor::Groq, "test-key", Some(server.uri()), None).unwrap()
    }

    #[tokio::test]
    async fn successful_generation() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {"content": "Use the apt module with state: present.", "role": "assistant"}, "index": 0}],
            "model": "llama3-70b-8192",
            "usage": {"prompt_tokens": 40, "completion_tokens": 15, "total_tokens": 55}
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3-70b-8192",
                "messages": [
                    {"role": "system", "content": DEFAULT_SYSTEM_PROMPT},
                    {"role": "user", "content": "install nginx"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(&server)
            .generate(&request("install nginx"))
            .await
            .unwrap();
        assert!(response.content.contains("apt module"));
        assert_eq!(response.token_usage.total_tokens, 55);
        assert_eq!(response.model, "llama3-70b-8192");
    }

    #[tokio::test]
    async fn unset_sampling_options_are_not_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&server)
            .await;

        provider(&server).generate(&request("x")).await.unwrap();

        let received = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[tokio::test]
    async fn missing_content_yields_empty_string() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"choices": [{"message": {"content": null}}]})),
            )
            .mount(&server)
            .await;

        let response = provider(&server).generate(&request("x")).await.unwrap();
        assert!(response.content.is_empty());
        assert_eq!(response.model, "llama3-70b-8192");
    }

    #[tokio::test]
    async fn empty_choices_yield_empty_string() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let response = provider(&server).generate(&request("x")).await.unwrap();
        assert!(response.content.is_empty());
    }

    #[tokio::test]
    async fn error_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let err = provider(&server).generate(&request("x")).await.unwrap_err();
        match err.downcast_ref::<ProviderError>() {
            Some(ProviderError::ApiError { status, message }) => {
                assert_eq!(*status, 500);
                assert_eq!(message, "internal error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn auth_and_rate_limit_are_classified() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer bad-key"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let bad = OpenAiProvider::new(Flavor::Groq, "bad-key", Some(server.uri()), None).unwrap();
        let err = bad.generate(&request("x")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProviderError>(),
            Some(ProviderError::AuthenticationFailed(_))
        ));

        let err = provider(&server).generate(&request("x")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProviderError>(),
            Some(ProviderError::RateLimited {
                retry_after_ms: 7000
            })
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider(&server).generate(&request("x")).await.unwrap_err();
        assert!(err.to_string().contains("failed to parse response"));
    }

    #[test]
    fn catalogue_and_names() {
        let groq = OpenAiProvider::groq("k").unwrap();
        assert_eq!(groq.name(), "groq");
        assert!(groq
            .available_models()
            .iter()
            .any(|m| m.id == "llama3-70b-8192"));

        let openai = OpenAiProvider::new(Flavor::OpenAi, "k", None, None).unwrap();
        assert_eq!(openai.name(), "openai");
        assert_eq!(openai.base_url, OPENAI_BASE_URL);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let p = OpenAiProvider::new(
            Flavor::Groq,
            "k",
            Some("http://localhost:9999/".into()),
            None,
        )
        .unwrap();
        assert_eq!(p.base_url, "http://localhost:9999");
    }
}
