//! Playbook scoring.
//!
//! Every check is a plain, case-sensitive substring test against the raw
//! submission. Tokens inside comments or quoted strings still count.

use crate::model::{CheckOutcome, EvaluationResult, Rubric};

/// Score a submission against the standard rubric.
///
/// Total for any input: the empty string scores 0 with all five messages.
pub fn evaluate(submission: &str) -> EvaluationResult {
    Rubric::standard().evaluate(submission)
}

impl Rubric {
    /// Score a submission against this rubric.
    pub fn evaluate(&self, submission: &str) -> EvaluationResult {
        let mut score = 0;
        let mut feedback = Vec::new();

        for check in &self.checks {
            if submission.contains(check.token.as_str()) {
                score += check.points;
            } else {
                feedback.push(check.message.clone());
            }
        }

        EvaluationResult { score, feedback }
    }

    /// Per-check pass/fail detail, in rubric order.
    pub fn outcomes(&self, submission: &str) -> Vec<CheckOutcome> {
        self.checks
            .iter()
            .map(|check| CheckOutcome {
                token: check.token.clone(),
                points: check.points,
                passed: submission.contains(check.token.as_str()),
            })
            .collect()
    }

    /// Score awarded when every check passes.
    pub fn max_score(&self) -> u32 {
        self.checks.iter().map(|c| c.points).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Check;

    const ALL_MESSAGES: [&str; 5] = [
        "Missing apt module",
        "Missing service module",
        "'state: present' might be missing",
        "'state: started' might be missing",
        "'become: yes' is a good practice for installing packages",
    ];

    #[test]
    fn empty_submission_scores_zero() {
        let result = evaluate("");
        assert_eq!(result.score, 0);
        assert_eq!(result.feedback, ALL_MESSAGES);
    }

    #[test]
    fn no_tokens_gives_all_feedback_in_order() {
        let result = evaluate("- hosts: all\n  tasks:\n    - debug: msg=hello\n");
        assert_eq!(result.score, 0);
        assert_eq!(result.feedback, ALL_MESSAGES);
    }

    #[test]
    fn complete_playbook_scores_full_marks() {
        let input = "- apt:\n    name: nginx\n    state: present\n  become: yes\n  service:\n    state: started";
        let result = evaluate(input);
        assert_eq!(result.score, 100);
        assert!(result.feedback.is_empty());
        assert!(result.is_perfect());
    }

    #[test]
    fn only_apt_scores_twenty() {
        let result = evaluate("- apt:\n    name: nginx");
        assert_eq!(result.score, 20);
        assert_eq!(result.feedback, &ALL_MESSAGES[1..]);
    }

    #[test]
    fn tokens_count_regardless_of_position_or_context() {
        let input = "# become: yes\nname: \"service: state: started\"\n# apt: state: present";
        let result = evaluate(input);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let result = evaluate("APT:\nSERVICE:\nState: Present\nstate: STARTED\nBecome: Yes");
        assert_eq!(result.score, 0);
        assert_eq!(result.feedback.len(), 5);
    }

    #[test]
    fn score_is_multiple_of_twenty_within_bounds() {
        let samples = [
            "",
            "apt:",
            "apt: service:",
            "state: present state: started",
            "become: yes apt: service: state: present",
            "apt: service: state: present state: started become: yes",
            "become: no",
            "state: presentstate: started",
        ];
        for sample in samples {
            let result = evaluate(sample);
            assert!(result.score <= 100, "score out of range for {sample:?}");
            assert_eq!(result.score % 20, 0, "score not a multiple of 20 for {sample:?}");
            assert_eq!(
                result.score / 20 + result.feedback.len() as u32,
                5,
                "every check must either score or report for {sample:?}"
            );
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let input = "- apt:\n    state: present\n";
        assert_eq!(evaluate(input), evaluate(input));
    }

    #[test]
    fn custom_rubric_uses_its_own_points() {
        let rubric = Rubric {
            id: "custom".into(),
            name: "Custom".into(),
            description: String::new(),
            checks: vec![
                Check::new("hosts:", 50, "Missing hosts"),
                Check::new("tasks:", 50, "Missing tasks"),
            ],
        };
        let result = rubric.evaluate("- hosts: web\n");
        assert_eq!(result.score, 50);
        assert_eq!(result.feedback, vec!["Missing tasks"]);
        assert_eq!(rubric.max_score(), 100);
    }

    #[test]
    fn outcomes_follow_rubric_order() {
        let outcomes = Rubric::standard().outcomes("service:\nbecome: yes");
        let passed: Vec<bool> = outcomes.iter().map(|o| o.passed).collect();
        assert_eq!(passed, vec![false, true, false, false, true]);
        assert_eq!(outcomes[0].token, "apt:");
    }
}
