//! The `tutor hint` and `tutor solution` commands.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use tutor_core::assistant::{Assistant, AssistantReply, ProgressReporter, ReplyStatus};
use tutor_core::model::HintMode;
use tutor_core::traits::extract_yaml_from_markdown;
use tutor_providers::config::load_config_from;
use tutor_providers::provider_by_name;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_request_start(&self, _mode: HintMode, _model: &str) {
        eprintln!("Loading...");
    }

    fn on_request_complete(&self, reply: &AssistantReply, elapsed: Duration) {
        tracing::debug!(status = ?reply.status, "request finished in {:.1}s", elapsed.as_secs_f64());
    }
}

pub async fn execute(
    mode: HintMode,
    task: String,
    provider_name: Option<String>,
    model: Option<String>,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let provider_name = provider_name.unwrap_or_else(|| config.default_provider.clone());
    let provider = provider_by_name(&config, &provider_name)?;

    let assistant = Assistant::new(
        Arc::from(provider),
        config.assistant_config(model.as_deref()),
    );

    let reply = assistant.request(mode, &task, &ConsoleReporter).await;

    println!("{}", mode.heading());
    println!("{}", reply.text);

    if let Some(path) = output {
        if reply.status == ReplyStatus::Answered {
            let playbook = extract_yaml_from_markdown(&reply.text);
            std::fs::write(&path, format!("{}\n", playbook.trim_end()))
                .with_context(|| format!("failed to write playbook: {}", path.display()))?;
            eprintln!("Playbook saved to: {}", path.display());
        } else {
            eprintln!("Nothing to save to {}", path.display());
        }
    }

    Ok(())
}
