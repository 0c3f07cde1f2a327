//! Core rule types for the a3s-rules system
//!
//! Field names follow the Prometheus rule-file conventions (`expr`, `for`,
//! `keep_firing_for`) so rule definitions can be written in YAML by hand.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The two rule kinds held by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Named aggregation expression
    RecordingRule,
    /// Condition-triggered notification
    Alert,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::RecordingRule => f.write_str("recording rule"),
            RuleKind::Alert => f.write_str("alert"),
        }
    }
}

/// Type of the metric a recording rule produces
///
/// Informational only: used for documentation, never for evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricType {
    Counter,
    #[default]
    Gauge,
    Histogram,
    Summary,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MetricType::Counter => "Counter",
            MetricType::Gauge => "Gauge",
            MetricType::Histogram => "Histogram",
            MetricType::Summary => "Summary",
        };
        f.write_str(s)
    }
}

/// API maturity tag carried through to documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityLevel {
    Alpha,
    Beta,
    #[serde(rename = "GA")]
    Ga,
}

impl fmt::Display for StabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StabilityLevel::Alpha => "Alpha",
            StabilityLevel::Beta => "Beta",
            StabilityLevel::Ga => "GA",
        };
        f.write_str(s)
    }
}

/// A named, precomputed aggregation expression
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingRule {
    /// Name of the series the rule records
    pub name: String,

    /// Human-readable documentation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,

    /// Aggregation query text
    #[serde(rename = "expr", alias = "expression")]
    pub expression: String,

    /// Labels attached verbatim to the recorded series
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub const_labels: BTreeMap<String, String>,

    /// Type of the recorded metric
    #[serde(default)]
    pub metric_type: MetricType,

    /// Optional maturity tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability_level: Option<StabilityLevel>,

    /// Free-form documentation fields
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_fields: BTreeMap<String, String>,
}

impl RecordingRule {
    /// Create a recording rule with a name and expression
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            ..Default::default()
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn with_const_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.const_labels.insert(key.into(), value.into());
        self
    }

    pub fn with_metric_type(mut self, metric_type: MetricType) -> Self {
        self.metric_type = metric_type;
        self
    }

    pub fn with_stability_level(mut self, level: StabilityLevel) -> Self {
        self.stability_level = Some(level);
        self
    }

    pub fn with_extra_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_fields.insert(key.into(), value.into());
        self
    }
}

/// A named condition that raises a notification while it holds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// PascalCase alert name
    #[serde(rename = "alert", alias = "name")]
    pub name: String,

    /// Condition expression
    #[serde(rename = "expr", alias = "expression")]
    pub expression: String,

    /// How long the condition must hold before firing (e.g. "5m")
    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<String>,

    /// How long to keep firing after the condition clears
    #[serde(
        rename = "keep_firing_for",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub keep_firing_for_duration: Option<String>,

    /// Routing labels; `severity` is mandatory
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Descriptive annotations; `summary` and `description` are mandatory
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl Alert {
    /// Create an alert with a name and expression
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            ..Default::default()
        }
    }

    pub fn with_for(mut self, duration: impl Into<String>) -> Self {
        self.for_duration = Some(duration.into());
        self
    }

    pub fn with_keep_firing_for(mut self, duration: impl Into<String>) -> Self {
        self.keep_firing_for_duration = Some(duration.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Label value, treating a missing label as empty
    pub fn label(&self, key: &str) -> &str {
        self.labels.get(key).map(String::as_str).unwrap_or_default()
    }

    /// Annotation value, treating a missing annotation as empty
    pub fn annotation(&self, key: &str) -> &str {
        self.annotations
            .get(key)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// A non-fatal problem reported by the linter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintProblem {
    /// Name of the offending rule
    pub resource_name: String,

    /// What is wrong with it
    pub description: String,
}

impl LintProblem {
    pub fn new(resource_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for LintProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.resource_name, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_rule_builder() {
        let rule = RecordingRule::new("number_of_pods", "sum(up) or vector(0)")
            .with_help("Number of pods")
            .with_const_label("controller", "guestbook")
            .with_metric_type(MetricType::Counter)
            .with_stability_level(StabilityLevel::Alpha);

        assert_eq!(rule.name, "number_of_pods");
        assert_eq!(rule.expression, "sum(up) or vector(0)");
        assert_eq!(rule.const_labels["controller"], "guestbook");
        assert_eq!(rule.metric_type, MetricType::Counter);
        assert_eq!(rule.stability_level, Some(StabilityLevel::Alpha));
    }

    #[test]
    fn test_alert_yaml_field_names() {
        let yaml = r#"
alert: GuestbookOperatorDown
expr: number_of_pods == 0
for: 5m
keep_firing_for: 10m
labels:
  severity: critical
annotations:
  summary: Guestbook operator is down
"#;
        let alert: Alert = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(alert.name, "GuestbookOperatorDown");
        assert_eq!(alert.expression, "number_of_pods == 0");
        assert_eq!(alert.for_duration.as_deref(), Some("5m"));
        assert_eq!(alert.keep_firing_for_duration.as_deref(), Some("10m"));
        assert_eq!(alert.label("severity"), "critical");
        assert_eq!(alert.annotation("description"), "");
    }

    #[test]
    fn test_recording_rule_defaults_when_deserialized() {
        let rule: RecordingRule =
            serde_yaml::from_str("name: a_rule\nexpression: sum(x)\n").unwrap();
        assert_eq!(rule.expression, "sum(x)");
        assert_eq!(rule.metric_type, MetricType::Gauge);
        assert!(rule.help.is_empty());
        assert!(rule.stability_level.is_none());
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(RuleKind::RecordingRule.to_string(), "recording rule");
        assert_eq!(MetricType::Histogram.to_string(), "Histogram");
        assert_eq!(StabilityLevel::Ga.to_string(), "GA");
        assert_eq!(
            LintProblem::new("ExampleAlert", "too long").to_string(),
            "ExampleAlert: too long"
        );
    }

    #[test]
    fn test_lint_problem_serialization() {
        let json = serde_json::to_string(&LintProblem::new("A", "b")).unwrap();
        assert!(json.contains("\"resourceName\":\"A\""));
    }
}
