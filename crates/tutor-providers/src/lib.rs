//! tutor-providers — Hosted LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for Groq and OpenAI chat completions,
//! plus a mock for tests, and loads `tutor.toml`.

pub mod config;
pub mod mock;
pub mod openai;

pub use config::{create_provider, load_config_from, provider_by_name, ProviderConfig, TutorConfig};
pub use tutor_core::error::ProviderError;
