//! Core data model types for playbook-tutor.
//!
//! These are the types the rest of the system uses to describe scoring
//! checks, rubrics, evaluation results, and assistant requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Points awarded by a check when the rubric file does not say otherwise.
pub const DEFAULT_CHECK_POINTS: u32 = 20;

/// Highest score any rubric may award.
pub const MAX_SCORE: u32 = 100;

/// The checks of the standard rubric: `(token, message)`, each worth
/// [`DEFAULT_CHECK_POINTS`].
const STANDARD_CHECKS: [(&str, &str); 5] = [
    ("apt:", "Missing apt module"),
    ("service:", "Missing service module"),
    ("state: present", "'state: present' might be missing"),
    ("state: started", "'state: started' might be missing"),
    (
        "become: yes",
        "'become: yes' is a good practice for installing packages",
    ),
];

/// A single substring presence check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Literal substring that must appear in the submission.
    pub token: String,
    /// Points awarded when the token is present.
    pub points: u32,
    /// Feedback shown when the token is absent.
    pub message: String,
}

impl Check {
    pub fn new(token: impl Into<String>, points: u32, message: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            points,
            message: message.into(),
        }
    }
}

/// An ordered table of checks. Feedback is always reported in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rubric {
    /// Unique identifier for this rubric.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of what this rubric looks for.
    #[serde(default)]
    pub description: String,
    /// The checks, in reporting order.
    pub checks: Vec<Check>,
}

impl Rubric {
    /// The built-in rubric for the "install and start a package" exercise.
    pub fn standard() -> Self {
        Self {
            id: "standard".into(),
            name: "Install and start a service".into(),
            description: "Package installed with apt, service started, privilege escalation enabled"
                .into(),
            checks: STANDARD_CHECKS
                .iter()
                .map(|(token, message)| Check::new(*token, DEFAULT_CHECK_POINTS, *message))
                .collect(),
        }
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self::standard()
    }
}

/// Outcome of scoring one submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Sum of points awarded by passing checks.
    pub score: u32,
    /// One message per failing check, in rubric order.
    pub feedback: Vec<String>,
}

impl EvaluationResult {
    /// Returns `true` if every check passed.
    pub fn is_perfect(&self) -> bool {
        self.feedback.is_empty()
    }
}

/// Per-check detail, used for tabular output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub token: String,
    pub points: u32,
    pub passed: bool,
}

/// What the user is asking the assistant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintMode {
    Hint,
    Solution,
}

impl HintMode {
    /// Heading printed above the assistant's answer.
    pub fn heading(&self) -> &'static str {
        match self {
            HintMode::Hint => "Hint:",
            HintMode::Solution => "Suggested Solution:",
        }
    }
}

impl fmt::Display for HintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintMode::Hint => write!(f, "hint"),
            HintMode::Solution => write!(f, "solution"),
        }
    }
}

impl FromStr for HintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hint" => Ok(HintMode::Hint),
            "solution" => Ok(HintMode::Solution),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}
