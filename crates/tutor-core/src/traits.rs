//! Core trait definitions for LLM providers and playbook runners.
//!
//! `LlmProvider` is implemented by the `tutor-providers` crate;
//! `PlaybookRunner` by [`crate::terminal::MockTerminal`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for hosted LLM backends that answer hint and solution requests.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "groq").
    fn name(&self) -> &str;

    /// Send one chat completion request.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List known models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request sent to an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "llama3-70b-8192").
    pub model: String,
    /// The user message.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate; provider default when unset.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature; provider default when unset.
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// Response from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response content. Empty when the provider returned none.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// Playbook Runner trait
// ---------------------------------------------------------------------------

/// Trait for anything that can "run" a playbook and report terminal output.
pub trait PlaybookRunner: Send + Sync {
    /// Run the given playbook text.
    fn run(&self, playbook: &str) -> anyhow::Result<RunOutput>;
}

/// Terminal output of a playbook run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutput {
    /// Everything the run printed.
    pub output: String,
    /// Whether the run reported success.
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Default system prompt
// ---------------------------------------------------------------------------

/// Default system prompt for hint and solution requests.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an Ansible expert helping users write playbooks.";

// ---------------------------------------------------------------------------
// Markdown YAML extraction
// ---------------------------------------------------------------------------

/// Kind of a fenced block, decided by the first word of its info string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceKind {
    Yaml,
    Unlabeled,
    Other,
}

impl FenceKind {
    /// Classify the text after the opening backticks, e.g. `yaml title=site.yml`.
    fn from_info(info: &str) -> Self {
        match info.split_whitespace().next().map(str::to_ascii_lowercase) {
            None => FenceKind::Unlabeled,
            Some(lang) if lang == "yaml" || lang == "yml" => FenceKind::Yaml,
            Some(_) => FenceKind::Other,
        }
    }
}

/// Split a markdown response into its fenced blocks, in order.
///
/// A block left open by a truncated response still counts if it has content.
fn fenced_blocks(response: &str) -> Vec<(FenceKind, String)> {
    let mut blocks = Vec::new();
    let mut open: Option<(FenceKind, Vec<&str>)> = None;

    for line in response.lines() {
        let trimmed = line.trim();
        open = match open.take() {
            None => trimmed
                .strip_prefix("```")
                .map(|info| (FenceKind::from_info(info.trim_start_matches('`')), Vec::new())),
            Some((kind, body)) if trimmed == "```" => {
                blocks.push((kind, body.join("\n")));
                None
            }
            Some((kind, mut body)) => {
                body.push(line);
                Some((kind, body))
            }
        };
    }

    if let Some((kind, body)) = open.filter(|(_, body)| !body.is_empty()) {
        blocks.push((kind, body.join("\n")));
    }

    blocks
}

/// Extract a playbook from a markdown-formatted LLM response.
///
/// YAML-labelled fences win (`yaml`/`yml`, extra words after the label are
/// allowed); otherwise unlabelled fences; otherwise the raw response.
/// Multiple blocks of the winning kind are joined by a blank line.
pub fn extract_yaml_from_markdown(response: &str) -> String {
    let blocks = fenced_blocks(response);

    for wanted in [FenceKind::Yaml, FenceKind::Unlabeled] {
        let picked: Vec<&str> = blocks
            .iter()
            .filter(|(kind, _)| *kind == wanted)
            .map(|(_, body)| body.as_str())
            .collect();
        if !picked.is_empty() {
            return picked.join("\n\n");
        }
    }

    response.to_string()
}
