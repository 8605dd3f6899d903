//! TOML rubric parser.
//!
//! Loads rubrics from TOML files and validates them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Check, Rubric, DEFAULT_CHECK_POINTS, MAX_SCORE};

/// Intermediate TOML structure for parsing rubric files.
#[derive(Debug, Deserialize)]
struct TomlRubricFile {
    rubric: TomlRubricHeader,
    #[serde(default)]
    checks: Vec<TomlCheck>,
}

#[derive(Debug, Deserialize)]
struct TomlRubricHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlCheck {
    token: String,
    #[serde(default = "default_points")]
    points: u32,
    message: String,
}

fn default_points() -> u32 {
    DEFAULT_CHECK_POINTS
}

/// Parse a single TOML file into a `Rubric`.
pub fn parse_rubric(path: &Path) -> Result<Rubric> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rubric file: {}", path.display()))?;

    parse_rubric_str(&content, path)
}

/// Parse a TOML string into a `Rubric` (useful for testing).
pub fn parse_rubric_str(content: &str, source_path: &Path) -> Result<Rubric> {
    let parsed: TomlRubricFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    if parsed.checks.is_empty() {
        anyhow::bail!("rubric has no checks: {}", source_path.display());
    }

    let checks: Vec<Check> = parsed
        .checks
        .into_iter()
        .map(|c| Check::new(c.token, c.points, c.message))
        .collect();

    let total: u64 = checks.iter().map(|c| u64::from(c.points)).sum();
    if total > u64::from(MAX_SCORE) {
        anyhow::bail!(
            "rubric points must not exceed {MAX_SCORE}, got {total}: {}",
            source_path.display()
        );
    }

    Ok(Rubric {
        id: parsed.rubric.id,
        name: parsed.rubric.name,
        description: parsed.rubric.description,
        checks,
    })
}

/// Load a rubric from `path`, or the standard rubric when none is given.
pub fn load_rubric_or_standard(path: Option<&Path>) -> Result<Rubric> {
    match path {
        Some(p) => parse_rubric(p),
        None => Ok(Rubric::standard()),
    }
}

/// A warning from rubric validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The offending token (if applicable).
    pub token: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a rubric for common issues.
pub fn validate_rubric(rubric: &Rubric) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen = std::collections::HashSet::new();
    for check in &rubric.checks {
        if !seen.insert(check.token.as_str()) {
            warnings.push(ValidationWarning {
                token: Some(check.token.clone()),
                message: format!("duplicate token: {}", check.token),
            });
        }
    }

    for check in &rubric.checks {
        if check.token.is_empty() {
            warnings.push(ValidationWarning {
                token: None,
                message: "empty token always matches".into(),
            });
        }
        if check.message.trim().is_empty() {
            warnings.push(ValidationWarning {
                token: Some(check.token.clone()),
                message: "feedback message is empty".into(),
            });
        }
        if check.points == 0 {
            warnings.push(ValidationWarning {
                token: Some(check.token.clone()),
                message: "check awards no points".into(),
            });
        }
    }

    let total = rubric.max_score();
    if total != MAX_SCORE {
        warnings.push(ValidationWarning {
            token: None,
            message: format!("checks award {total} points in total, expected {MAX_SCORE}"),
        });
    }

    warnings
}
