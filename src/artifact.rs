//! Artifact assembly — group, sort, and wrap registered rules
//!
//! A `RuleArtifact` is an immutable snapshot of the registry. It serializes
//! to the `monitoring.coreos.com/v1` `PrometheusRule` resource shape.

use crate::error::{RuleError, Result};
use crate::registry::RuleRegistry;
use crate::types::{Alert, RecordingRule};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Name of the group holding every recording rule
pub const RECORDING_RULES_GROUP: &str = "recordingRules.rules";

/// Name of the group holding every alert
pub const ALERTS_GROUP: &str = "alerts.rules";

const API_VERSION: &str = "monitoring.coreos.com/v1";
const KIND: &str = "PrometheusRule";

/// A rule inside an artifact group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactRule {
    Recording(RecordingRule),
    Alert(Alert),
}

impl ArtifactRule {
    pub fn name(&self) -> &str {
        match self {
            ArtifactRule::Recording(r) => &r.name,
            ArtifactRule::Alert(a) => &a.name,
        }
    }

    pub fn expression(&self) -> &str {
        match self {
            ArtifactRule::Recording(r) => &r.expression,
            ArtifactRule::Alert(a) => &a.expression,
        }
    }
}

/// A named, ordered group of rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroup {
    name: String,
    rules: Vec<ArtifactRule>,
}

impl RuleGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[ArtifactRule] {
        &self.rules
    }
}

/// Assembled rule set, ready for a monitoring backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleArtifact {
    name: String,
    namespace: String,
    labels: BTreeMap<String, String>,
    groups: Vec<RuleGroup>,
}

impl RuleArtifact {
    /// Assemble the registry's current contents
    ///
    /// Recording rules come first, then alerts; a kind with no entries
    /// produces no group. Rules inside a group are sorted by name.
    pub fn build(
        registry: &RuleRegistry,
        name: impl Into<String>,
        namespace: impl Into<String>,
        labels: BTreeMap<String, String>,
    ) -> Result<Self> {
        let (recording_rules, alerts) = registry.snapshot().map_err(|e| {
            RuleError::Assembly(format!("cannot read rule registry: {}", e))
        })?;
        let artifact = Self::from_rules(name, namespace, labels, recording_rules, alerts);

        tracing::info!(
            name = %artifact.name,
            namespace = %artifact.namespace,
            groups = artifact.groups.len(),
            rules = artifact.rule_count(),
            "Rule artifact built"
        );
        Ok(artifact)
    }

    /// Assemble an artifact from rule lists already sorted by name
    fn from_rules(
        name: impl Into<String>,
        namespace: impl Into<String>,
        labels: BTreeMap<String, String>,
        recording_rules: Vec<RecordingRule>,
        alerts: Vec<Alert>,
    ) -> Self {
        let mut groups = Vec::with_capacity(2);
        if !recording_rules.is_empty() {
            groups.push(RuleGroup {
                name: RECORDING_RULES_GROUP.to_string(),
                rules: recording_rules
                    .into_iter()
                    .map(ArtifactRule::Recording)
                    .collect(),
            });
        }
        if !alerts.is_empty() {
            groups.push(RuleGroup {
                name: ALERTS_GROUP.to_string(),
                rules: alerts.into_iter().map(ArtifactRule::Alert).collect(),
            });
        }

        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels,
            groups,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// Look up a group by name
    pub fn group(&self, name: &str) -> Option<&RuleGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Total number of rules across groups
    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Render as a `PrometheusRule` YAML manifest
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render as a `PrometheusRule` JSON manifest
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    api_version: &'static str,
    kind: &'static str,
    metadata: Metadata<'a>,
    spec: Spec<'a>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    name: &'a str,
    namespace: &'a str,
    #[serde(skip_serializing_if = "is_empty_map")]
    labels: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct Spec<'a> {
    groups: Vec<GroupManifest<'a>>,
}

#[derive(Serialize)]
struct GroupManifest<'a> {
    name: &'a str,
    rules: Vec<RuleManifest<'a>>,
}

#[derive(Serialize)]
struct RuleManifest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alert: Option<&'a str>,
    expr: &'a str,
    #[serde(rename = "for", skip_serializing_if = "Option::is_none")]
    for_duration: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_firing_for: Option<&'a str>,
    #[serde(skip_serializing_if = "is_empty_map")]
    labels: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "is_empty_map")]
    annotations: &'a BTreeMap<String, String>,
}

fn is_empty_map(map: &&BTreeMap<String, String>) -> bool {
    map.is_empty()
}

static NO_ANNOTATIONS: BTreeMap<String, String> = BTreeMap::new();

impl<'a> From<&'a ArtifactRule> for RuleManifest<'a> {
    fn from(rule: &'a ArtifactRule) -> Self {
        match rule {
            ArtifactRule::Recording(r) => RuleManifest {
                record: Some(&r.name),
                alert: None,
                expr: &r.expression,
                for_duration: None,
                keep_firing_for: None,
                labels: &r.const_labels,
                annotations: &NO_ANNOTATIONS,
            },
            ArtifactRule::Alert(a) => RuleManifest {
                record: None,
                alert: Some(&a.name),
                expr: &a.expression,
                for_duration: a.for_duration.as_deref(),
                keep_firing_for: a.keep_firing_for_duration.as_deref(),
                labels: &a.labels,
                annotations: &a.annotations,
            },
        }
    }
}

impl Serialize for RuleArtifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Manifest {
            api_version: API_VERSION,
            kind: KIND,
            metadata: Metadata {
                name: &self.name,
                namespace: &self.namespace,
                labels: &self.labels,
            },
            spec: Spec {
                groups: self
                    .groups
                    .iter()
                    .map(|g| GroupManifest {
                        name: &g.name,
                        rules: g.rules.iter().map(RuleManifest::from).collect(),
                    })
                    .collect(),
            },
        }
        .serialize(serializer)
    }
}
