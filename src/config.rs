//! Configuration for artifact assembly and declarative rule registration

use crate::error::{RuleError, Result};
use crate::registry::RuleRegistry;
use crate::types::{Alert, RecordingRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Metadata envelope of an assembled artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Resource name
    #[serde(default = "default_name")]
    pub name: String,

    /// Resource namespace
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Labels applied to the resource itself
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            namespace: default_namespace(),
            labels: BTreeMap::new(),
        }
    }
}

fn default_name() -> String {
    "prometheus-rules".into()
}

fn default_namespace() -> String {
    "default".into()
}

impl ArtifactConfig {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(RuleError::Config("artifact name cannot be empty".to_string()));
        }
        if self.namespace.is_empty() {
            return Err(RuleError::Config(
                "artifact namespace cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Declarative observability configuration
///
/// ```yaml
/// artifact:
///   name: guestbook-operator-prometheus-rules
///   namespace: default
/// observability:
///   common_labels:
///     controller: guestbook
///   groups:
///     - name: operator
///       recording_rules:
///         - name: number_of_pods
///           expr: sum(up{pod=~'guestbook-operator-.*'})
///       alerts:
///         - alert: GuestbookOperatorDown
///           expr: number_of_pods == 0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub artifact: ArtifactConfig,

    #[serde(default)]
    pub observability: Observability,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observability {
    /// Labels merged into every rule of every group
    #[serde(default)]
    pub common_labels: BTreeMap<String, String>,

    #[serde(default)]
    pub groups: Vec<RuleGroupConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroupConfig {
    pub name: String,

    /// Labels merged into every rule of this group, over the top-level ones
    #[serde(default)]
    pub common_labels: BTreeMap<String, String>,

    #[serde(default)]
    pub recording_rules: Vec<RecordingRule>,

    #[serde(default)]
    pub alerts: Vec<Alert>,
}

impl RulesConfig {
    pub fn from_yaml_str(src: &str) -> Result<Self> {
        serde_yaml::from_str(src)
            .map_err(|e| RuleError::Config(format!("parse error: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)
            .map_err(|e| RuleError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_yaml::from_str(&src)
            .map_err(|e| RuleError::Config(format!("parse error in {}: {e}", path.display())))
    }

    /// Register every group's rules, with common labels applied
    ///
    /// Groups are registered in order. A group is all-or-nothing: both of
    /// its batches are validated before either is merged. The first
    /// rejected group stops the process and earlier groups stay registered.
    pub fn register_into(&self, registry: &RuleRegistry) -> Result<()> {
        for group in &self.observability.groups {
            let mut labels = self.observability.common_labels.clone();
            labels.extend(group.common_labels.clone());

            let recording_rules: Vec<RecordingRule> = group
                .recording_rules
                .iter()
                .cloned()
                .map(|mut r| {
                    r.const_labels.extend(labels.clone());
                    r
                })
                .collect();
            let alerts: Vec<Alert> = group
                .alerts
                .iter()
                .cloned()
                .map(|mut a| {
                    a.labels.extend(labels.clone());
                    a
                })
                .collect();

            registry.validate_recording_rules(&recording_rules)?;
            registry.validate_alerts(&alerts)?;

            registry.register_recording_rules(recording_rules)?;
            registry.register_alerts(alerts)?;

            tracing::debug!(
                group = %group.name,
                recording_rules = group.recording_rules.len(),
                alerts = group.alerts.len(),
                "Rule group registered"
            );
        }
        Ok(())
    }
}
