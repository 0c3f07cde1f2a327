//! Validation policy for recording rules and alerts
//!
//! The default rule-set is defined once, as an ordered table of checks per
//! rule kind. Strict validation (used by the registry) stops at the first
//! failing check; the linter runs every check and collects the failures.
//!
//! Embedding applications replace the policy by injecting their own
//! `RecordingRuleValidator` / `AlertValidator` into the registry. Plain
//! closures implement both traits.

use crate::error::ValidationError;
use crate::types::{Alert, RecordingRule};
use once_cell::sync::Lazy;
use regex::Regex;

/// A single default check
pub type Check<T> = fn(&T) -> Result<(), ValidationError>;

/// Accepted values of the `severity` label
pub const SEVERITIES: [&str; 3] = ["critical", "warning", "info"];

static PASCAL_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]*(?:[A-Z][a-z]*)*$").expect("Invalid regex"));

/// Strict validator for recording rules
pub trait RecordingRuleValidator: Send + Sync {
    fn validate(&self, rule: &RecordingRule) -> Result<(), ValidationError>;
}

/// Strict validator for alerts
pub trait AlertValidator: Send + Sync {
    fn validate(&self, alert: &Alert) -> Result<(), ValidationError>;
}

impl<F> RecordingRuleValidator for F
where
    F: Fn(&RecordingRule) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, rule: &RecordingRule) -> Result<(), ValidationError> {
        self(rule)
    }
}

impl<F> AlertValidator for F
where
    F: Fn(&Alert) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, alert: &Alert) -> Result<(), ValidationError> {
        self(alert)
    }
}

/// The default policy, based on the operator observability style guide
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl RecordingRuleValidator for DefaultValidator {
    fn validate(&self, rule: &RecordingRule) -> Result<(), ValidationError> {
        RECORDING_RULE_CHECKS.iter().try_for_each(|check| check(rule))
    }
}

impl AlertValidator for DefaultValidator {
    fn validate(&self, alert: &Alert) -> Result<(), ValidationError> {
        ALERT_CHECKS.iter().try_for_each(|check| check(alert))
    }
}

/// Default recording rule checks, in evaluation order
pub const RECORDING_RULE_CHECKS: &[Check<RecordingRule>] =
    &[recording_rule_name, recording_rule_expression];

/// Default alert checks, in evaluation order
pub const ALERT_CHECKS: &[Check<Alert>] = &[
    alert_name,
    alert_expression,
    alert_severity,
    alert_summary,
    alert_description,
];

/// Whether `s` is PascalCase: uppercase first letter, words joined without
/// separators, letters only
pub fn is_pascal_case(s: &str) -> bool {
    PASCAL_CASE.is_match(s)
}

fn recording_rule_name(rule: &RecordingRule) -> Result<(), ValidationError> {
    if rule.name.is_empty() {
        return Err(ValidationError::new("recording rule must have a name"));
    }
    Ok(())
}

fn recording_rule_expression(rule: &RecordingRule) -> Result<(), ValidationError> {
    if rule.expression.is_empty() {
        return Err(ValidationError::new("recording rule must have an expression"));
    }
    Ok(())
}

fn alert_name(alert: &Alert) -> Result<(), ValidationError> {
    if alert.name.is_empty() || !is_pascal_case(&alert.name) {
        return Err(ValidationError::new(
            "alert must have a name in PascalCase format",
        ));
    }
    Ok(())
}

fn alert_expression(alert: &Alert) -> Result<(), ValidationError> {
    if alert.expression.is_empty() {
        return Err(ValidationError::new("alert must have an expression"));
    }
    Ok(())
}

// Alerts MUST include a severity label indicating the alert's urgency.
fn alert_severity(alert: &Alert) -> Result<(), ValidationError> {
    let severity = alert.label("severity");
    if severity.is_empty() {
        return Err(ValidationError::new("alert must have a severity label"));
    }
    if !SEVERITIES.contains(&severity) {
        return Err(ValidationError::new(
            "alert severity must be one of critical, warning, info",
        ));
    }
    Ok(())
}

fn alert_summary(alert: &Alert) -> Result<(), ValidationError> {
    if alert.annotation("summary").is_empty() {
        return Err(ValidationError::new("alert must have a summary annotation"));
    }
    Ok(())
}

fn alert_description(alert: &Alert) -> Result<(), ValidationError> {
    if alert.annotation("description").is_empty() {
        return Err(ValidationError::new(
            "alert must have a description annotation",
        ));
    }
    Ok(())
}
