//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tutor_core::assistant::{AssistantConfig, DEFAULT_MODEL};
use tutor_core::traits::LlmProvider;

use crate::openai::{Flavor, OpenAiProvider};

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Groq {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Groq {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Groq")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
        }
    }
}

/// Top-level tutor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature; the provider's own default when unset.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Max tokens per answer; the provider's own default when unset.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// System prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_provider() -> String {
    "groq".to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: None,
            max_tokens: None,
            system_prompt: None,
        }
    }
}

impl TutorConfig {
    /// Assistant settings for `model`, or the configured default model.
    pub fn assistant_config(&self, model: Option<&str>) -> AssistantConfig {
        AssistantConfig {
            model: model.unwrap_or(&self.default_model).to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            system_prompt_override: self.system_prompt.clone(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Groq { api_key, base_url } => ProviderConfig::Groq {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
    }
}

/// First non-empty value among the given environment variables.
fn env_key(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|n| std::env::var(n).ok())
        .find(|v| !v.is_empty())
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `tutor.toml` in the current directory
/// 2. `~/.config/tutor/config.toml`
///
/// Environment variable overrides: `TUTOR_GROQ_KEY` (or `GROQ_API_KEY`),
/// `TUTOR_OPENAI_KEY` (or `OPENAI_API_KEY`).
pub fn load_config_from(path: Option<&Path>) -> Result<TutorConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("tutor.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<TutorConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => TutorConfig::default(),
    };

    Ok(finish_config(
        config,
        env_key(&["TUTOR_GROQ_KEY", "GROQ_API_KEY"]),
        env_key(&["TUTOR_OPENAI_KEY", "OPENAI_API_KEY"]),
    ))
}

/// Add the always-present groq entry, expand `${VAR}` references, then apply
/// key overrides. Override keys are used as given.
fn finish_config(
    mut config: TutorConfig,
    groq_key: Option<String>,
    openai_key: Option<String>,
) -> TutorConfig {
    config
        .providers
        .entry("groq".into())
        .or_insert(ProviderConfig::Groq {
            api_key: String::new(),
            base_url: None,
        });

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    if let Some(key) = groq_key {
        if let Some(ProviderConfig::Groq { api_key, .. }) = config.providers.get_mut("groq") {
            *api_key = key;
        }
    }

    if let Some(key) = openai_key {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("tutor"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    match config {
        ProviderConfig::Groq { api_key, base_url } => Ok(Box::new(OpenAiProvider::new(
            Flavor::Groq,
            api_key,
            base_url.clone(),
            None,
        )?)),
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Ok(Box::new(OpenAiProvider::new(
            Flavor::OpenAi,
            api_key,
            base_url.clone(),
            org_id.clone(),
        )?)),
    }
}

/// Look up `name` in the config and build it.
pub fn provider_by_name(config: &TutorConfig, name: &str) -> Result<Box<dyn LlmProvider>> {
    let Some(provider_config) = config.providers.get(name) else {
        let mut available: Vec<&String> = config.providers.keys().collect();
        available.sort();
        anyhow::bail!("provider '{name}' not found in config. Available: {available:?}");
    };
    create_provider(provider_config)
}
