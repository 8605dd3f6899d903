//! The `tutor check` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use tutor_core::model::{EvaluationResult, Rubric};
use tutor_core::parser::load_rubric_or_standard;

/// JSON shape printed by `--format json`.
#[derive(Serialize)]
struct CheckReport<'a> {
    rubric: &'a str,
    evaluated_at: DateTime<Utc>,
    max_score: u32,
    #[serde(flatten)]
    result: &'a EvaluationResult,
}

pub fn execute(
    path: Option<PathBuf>,
    rubric_path: Option<PathBuf>,
    format: String,
    fail_under: Option<u32>,
) -> Result<()> {
    let rubric = load_rubric_or_standard(rubric_path.as_deref())?;
    let submission = super::read_submission(path.as_ref())?;

    let result = rubric.evaluate(&submission);
    tracing::debug!(rubric = %rubric.id, score = result.score, "evaluated submission");

    match format.as_str() {
        "json" => {
            let report = CheckReport {
                rubric: &rubric.id,
                evaluated_at: Utc::now(),
                max_score: rubric.max_score(),
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "table" => print_table(&rubric, &submission, &result),
        _ => print_text(&rubric, &result),
    }

    if let Some(threshold) = fail_under {
        if result.score < threshold {
            eprintln!("Score {} is below {threshold}", result.score);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_text(rubric: &Rubric, result: &EvaluationResult) {
    println!("Score: {} / {}", result.score, rubric.max_score());
    for msg in &result.feedback {
        println!("  - {msg}");
    }
}

fn print_table(rubric: &Rubric, submission: &str, result: &EvaluationResult) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Check", "Points", "Result", "Feedback"]);

    for (check, outcome) in rubric.checks.iter().zip(rubric.outcomes(submission)) {
        let (status, points, feedback) = if outcome.passed {
            ("PASS", outcome.points, "")
        } else {
            ("MISS", 0, check.message.as_str())
        };
        table.add_row(vec![
            Cell::new(&check.token),
            Cell::new(format!("{points}/{}", check.points)),
            Cell::new(status),
            Cell::new(feedback),
        ]);
    }

    println!("{table}");
    println!("Score: {} / {}", result.score, rubric.max_score());
}
