//! Non-fatal linting of whole rule-sets
//!
//! The `Linter` runs every default check plus any additive custom checks
//! and reports all problems instead of stopping at the first one. It never
//! touches a `RuleRegistry`: rules are linted whether or not they were
//! registered.

use crate::types::{Alert, LintProblem, RecordingRule};
use crate::validation::{ALERT_CHECKS, RECORDING_RULE_CHECKS};

/// Additive lint check for alerts
pub trait AlertCheck: Send + Sync {
    fn check(&self, alert: &Alert) -> Vec<LintProblem>;
}

/// Additive lint check for recording rules
pub trait RecordingRuleCheck: Send + Sync {
    fn check(&self, rule: &RecordingRule) -> Vec<LintProblem>;
}

impl<F> AlertCheck for F
where
    F: Fn(&Alert) -> Vec<LintProblem> + Send + Sync,
{
    fn check(&self, alert: &Alert) -> Vec<LintProblem> {
        self(alert)
    }
}

impl<F> RecordingRuleCheck for F
where
    F: Fn(&RecordingRule) -> Vec<LintProblem> + Send + Sync,
{
    fn check(&self, rule: &RecordingRule) -> Vec<LintProblem> {
        self(rule)
    }
}

/// Exhaustive rule linter
#[derive(Default)]
pub struct Linter {
    alert_checks: Vec<Box<dyn AlertCheck>>,
    recording_rule_checks: Vec<Box<dyn RecordingRuleCheck>>,
}

impl Linter {
    /// Create a linter running only the default checks
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a custom alert check, run after the default checks
    pub fn add_alert_check(&mut self, check: impl AlertCheck + 'static) -> &mut Self {
        self.alert_checks.push(Box::new(check));
        self
    }

    /// Add a custom recording rule check, run after the default checks
    pub fn add_recording_rule_check(
        &mut self,
        check: impl RecordingRuleCheck + 'static,
    ) -> &mut Self {
        self.recording_rule_checks.push(Box::new(check));
        self
    }

    /// Builder form of `add_alert_check`
    pub fn with_alert_check(mut self, check: impl AlertCheck + 'static) -> Self {
        self.add_alert_check(check);
        self
    }

    /// Builder form of `add_recording_rule_check`
    pub fn with_recording_rule_check(mut self, check: impl RecordingRuleCheck + 'static) -> Self {
        self.add_recording_rule_check(check);
        self
    }

    /// Number of custom checks registered, across both kinds
    pub fn custom_check_count(&self) -> usize {
        self.alert_checks.len() + self.recording_rule_checks.len()
    }

    /// All problems found in one alert
    pub fn lint_alert(&self, alert: &Alert) -> Vec<LintProblem> {
        let mut problems: Vec<LintProblem> = ALERT_CHECKS
            .iter()
            .filter_map(|check| check(alert).err())
            .map(|e| LintProblem::new(&alert.name, e.message()))
            .collect();

        for check in &self.alert_checks {
            problems.extend(check.check(alert));
        }
        problems
    }

    /// All problems found in a sequence of alerts, in input order
    pub fn lint_alerts(&self, alerts: &[Alert]) -> Vec<LintProblem> {
        let problems: Vec<LintProblem> =
            alerts.iter().flat_map(|a| self.lint_alert(a)).collect();
        tracing::debug!(
            alerts = alerts.len(),
            problems = problems.len(),
            "Alerts linted"
        );
        problems
    }

    /// All problems found in one recording rule
    pub fn lint_recording_rule(&self, rule: &RecordingRule) -> Vec<LintProblem> {
        let mut problems: Vec<LintProblem> = RECORDING_RULE_CHECKS
            .iter()
            .filter_map(|check| check(rule).err())
            .map(|e| LintProblem::new(&rule.name, e.message()))
            .collect();

        for check in &self.recording_rule_checks {
            problems.extend(check.check(rule));
        }
        problems
    }

    /// All problems found in a sequence of recording rules, in input order
    pub fn lint_recording_rules(&self, rules: &[RecordingRule]) -> Vec<LintProblem> {
        let problems: Vec<LintProblem> = rules
            .iter()
            .flat_map(|r| self.lint_recording_rule(r))
            .collect();
        tracing::debug!(
            recording_rules = rules.len(),
            problems = problems.len(),
            "Recording rules linted"
        );
        problems
    }
}

/// Optional custom checks for operator alerts
pub mod checks {
    use crate::types::{Alert, LintProblem};

    /// Longest alert name accepted by `alert_name_length`
    pub const MAX_ALERT_NAME_LEN: usize = 50;

    /// Accepted values of the `operator_health_impact` label
    pub const HEALTH_IMPACTS: [&str; 3] = ["critical", "warning", "none"];

    fn problem(alert: &Alert, description: &str) -> Vec<LintProblem> {
        vec![LintProblem::new(&alert.name, description)]
    }

    pub fn alert_name_length(alert: &Alert) -> Vec<LintProblem> {
        if alert.name.chars().count() > MAX_ALERT_NAME_LEN {
            return problem(alert, "alert name exceeds 50 characters");
        }
        Vec::new()
    }

    pub fn alert_description_annotation(alert: &Alert) -> Vec<LintProblem> {
        if alert.annotation("description").is_empty() {
            return problem(alert, "alert must have a description annotation");
        }
        Vec::new()
    }

    pub fn alert_runbook_url_annotation(alert: &Alert) -> Vec<LintProblem> {
        if alert.annotation("runbook_url").is_empty() {
            return problem(alert, "alert must have a runbook_url annotation");
        }
        Vec::new()
    }

    pub fn alert_health_impact_label(alert: &Alert) -> Vec<LintProblem> {
        if !HEALTH_IMPACTS.contains(&alert.label("operator_health_impact")) {
            return problem(
                alert,
                "alert must have a operator_health_impact label with value critical, warning, or none",
            );
        }
        Vec::new()
    }

    /// Reports each missing label as its own problem
    pub fn alert_part_of_and_component_labels(alert: &Alert) -> Vec<LintProblem> {
        ["kubernetes_operator_part_of", "kubernetes_operator_component"]
            .into_iter()
            .filter(|label| alert.label(label).is_empty())
            .map(|label| {
                LintProblem::new(&alert.name, format!("alert must have a {label} label"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::checks::*;
    use super::*;

    fn valid_alert() -> Alert {
        Alert::new("ExampleAlert", "sum(rate(http_requests_total[5m]))")
            .with_label("severity", "critical")
            .with_annotation("summary", "Example summary")
            .with_annotation("description", "Example description")
    }

    #[test]
    fn test_valid_alert_has_no_problems() {
        assert!(Linter::new().lint_alert(&valid_alert()).is_empty());
    }

    #[test]
    fn test_default_checks_are_exhaustive() {
        let alert = Alert::new("example_alert", "");
        let problems = Linter::new().lint_alert(&alert);
        let descriptions: Vec<&str> = problems.iter().map(|p| p.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "alert must have a name in PascalCase format",
                "alert must have an expression",
                "alert must have a severity label",
                "alert must have a summary annotation",
                "alert must have a description annotation",
            ]
        );
        assert!(problems.iter().all(|p| p.resource_name == "example_alert"));
    }

    #[test]
    fn test_single_default_violation() {
        let mut alert = valid_alert();
        alert.labels.insert("severity".into(), "invalid_severity".into());
        let problems = Linter::new().lint_alert(&alert);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].description.contains("severity"));
    }

    #[test]
    fn test_all_custom_checks_pass() {
        let alert = valid_alert()
            .with_label("operator_health_impact", "critical")
            .with_label("kubernetes_operator_part_of", "example_part_of")
            .with_label("kubernetes_operator_component", "example_component")
            .with_annotation("runbook_url", "example/runbook/url");

        let mut linter = Linter::new();
        linter
            .add_alert_check(alert_name_length)
            .add_alert_check(alert_description_annotation)
            .add_alert_check(alert_runbook_url_annotation)
            .add_alert_check(alert_health_impact_label)
            .add_alert_check(alert_part_of_and_component_labels);
        assert_eq!(linter.custom_check_count(), 5);
        assert!(linter.lint_alert(&alert).is_empty());
    }

    #[test]
    fn test_alert_name_too_long() {
        let mut alert = valid_alert();
        alert.name = "ExampleAlertWithVeryLongNameExtendedToMeetRequiredLength".to_string();
        let problems = Linter::new()
            .with_alert_check(alert_name_length)
            .lint_alert(&alert);
        assert_eq!(problems.len(), 1);
        assert!(problems[0]
            .description
            .contains("alert name exceeds 50 characters"));
    }

    #[test]
    fn test_missing_runbook_url() {
        let problems = Linter::new()
            .with_alert_check(alert_runbook_url_annotation)
            .lint_alert(&valid_alert());
        assert_eq!(problems.len(), 1);
        assert!(problems[0]
            .description
            .contains("alert must have a runbook_url annotation"));
    }

    #[test]
    fn test_invalid_health_impact() {
        let alert =
            valid_alert().with_label("operator_health_impact", "invalid_operator_health_impact");
        let problems = Linter::new()
            .with_alert_check(alert_health_impact_label)
            .lint_alert(&alert);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].description.contains(
            "alert must have a operator_health_impact label with value critical, warning, or none"
        ));
    }

    #[test]
    fn test_missing_part_of_and_component_are_separate_problems() {
        let problems = Linter::new()
            .with_alert_check(alert_part_of_and_component_labels)
            .lint_alert(&valid_alert());
        assert_eq!(problems.len(), 2);
        assert!(problems[0]
            .description
            .contains("alert must have a kubernetes_operator_part_of label"));
        assert!(problems[1]
            .description
            .contains("alert must have a kubernetes_operator_component label"));
    }

    #[test]
    fn test_missing_description_reported_by_default_and_custom_check() {
        let mut alert = valid_alert();
        alert.annotations.remove("description");
        let problems = Linter::new()
            .with_alert_check(alert_description_annotation)
            .lint_alert(&alert);
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_lint_alerts_preserves_input_order() {
        let alerts = vec![
            Alert::new("second_alert", "x > 1"),
            valid_alert(),
            Alert::new("FirstAlert", ""),
        ];
        let problems = Linter::new().lint_alerts(&alerts);
        assert_eq!(problems.first().unwrap().resource_name, "second_alert");
        assert_eq!(problems.last().unwrap().resource_name, "FirstAlert");
        assert!(problems.iter().all(|p| p.resource_name != "ExampleAlert"));
    }

    #[test]
    fn test_recording_rule_lint() {
        let linter = Linter::new().with_recording_rule_check(|r: &RecordingRule| {
            if r.help.is_empty() {
                vec![LintProblem::new(&r.name, "recording rule must have help text")]
            } else {
                Vec::new()
            }
        });

        let rules = vec![
            RecordingRule::new("ExampleRecordingRule", "sum(rate(http_requests_total[5m]))")
                .with_help("documented"),
            RecordingRule::new("", "sum(x)"),
            RecordingRule::new("no_expr", ""),
        ];
        let problems = linter.lint_recording_rules(&rules);
        let descriptions: Vec<&str> = problems.iter().map(|p| p.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "recording rule must have a name",
                "recording rule must have help text",
                "recording rule must have an expression",
                "recording rule must have help text",
            ]
        );
    }
}
