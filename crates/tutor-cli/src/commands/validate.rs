//! The `tutor validate` command.

use std::path::PathBuf;

use anyhow::Result;

use tutor_core::parser::{parse_rubric, validate_rubric};

pub fn execute(rubric_path: PathBuf) -> Result<()> {
    let rubric = parse_rubric(&rubric_path)?;

    println!(
        "Rubric: {} ({} checks, {} points)",
        rubric.name,
        rubric.checks.len(),
        rubric.max_score()
    );

    let warnings = validate_rubric(&rubric);
    for w in &warnings {
        let prefix = w
            .token
            .as_ref()
            .map(|t| format!("  [{t}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Rubric valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
