//! Mock terminal.
//!
//! Nothing is ever executed: every run prints the same canned transcript.

use crate::traits::{PlaybookRunner, RunOutput};

/// Transcript printed by every mock run.
pub const MOCK_OUTPUT: &str = "Running: ansible-playbook playbook.yml\n\nPLAY [localhost] SUCCESS";

/// A `PlaybookRunner` that pretends every playbook succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockTerminal;

impl MockTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl PlaybookRunner for MockTerminal {
    fn run(&self, playbook: &str) -> anyhow::Result<RunOutput> {
        tracing::debug!(bytes = playbook.len(), "mock terminal run");
        Ok(RunOutput {
            output: MOCK_OUTPUT.to_string(),
            success: true,
        })
    }
}
