//! tutor CLI — score Ansible playbook drafts and ask an LLM for help.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use tutor_core::model::HintMode;

mod commands;

#[derive(Parser)]
#[command(name = "tutor", version, about = "Ansible playbook learning tutor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a playbook draft
    Check {
        /// Playbook file; reads stdin when omitted or "-"
        path: Option<PathBuf>,

        /// Rubric TOML file (default: built-in rubric)
        #[arg(long)]
        rubric: Option<PathBuf>,

        /// Output format: text, json, table
        #[arg(long, default_value = "text")]
        format: String,

        /// Exit code 1 if the score is below this value
        #[arg(long)]
        fail_under: Option<u32>,
    },

    /// Ask the LLM for a hint
    Hint {
        /// What the playbook should do (e.g. "install and start nginx")
        #[arg(long)]
        task: String,

        /// Provider name from the config
        #[arg(long)]
        provider: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Ask the LLM for a full solution
    Solution {
        /// What the playbook should do (e.g. "install and start nginx")
        #[arg(long)]
        task: String,

        /// Provider name from the config
        #[arg(long)]
        provider: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save the suggested playbook to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Simulate running a playbook
    Run {
        /// Playbook file; reads nothing when omitted
        path: Option<PathBuf>,
    },

    /// Validate a rubric TOML file
    Validate {
        /// Path to the rubric file
        #[arg(long)]
        rubric: PathBuf,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and rubric
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tutor=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            path,
            rubric,
            format,
            fail_under,
        } => commands::check::execute(path, rubric, format, fail_under),
        Commands::Hint {
            task,
            provider,
            model,
            config,
        } => {
            commands::assist::execute(HintMode::Hint, task, provider, model, config, None).await
        }
        Commands::Solution {
            task,
            provider,
            model,
            config,
            output,
        } => {
            commands::assist::execute(HintMode::Solution, task, provider, model, config, output)
                .await
        }
        Commands::Run { path } => commands::run::execute(path),
        Commands::Validate { rubric } => commands::validate::execute(rubric),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
