//! Declarative alert files
//!
//! Alerts can be kept in `*_alerts.yaml` files next to the code that owns
//! them:
//!
//! ```yaml
//! common_labels:
//!   - name: controller
//!     value: example-operator
//! alerts:
//!   - alert: CustomAlertForIncident
//!     expr: custom_incident_count > 0
//!     for: 5m
//!     labels:
//!       severity: critical
//!     annotations:
//!       summary: Custom Incident Alert
//!       description: This alert is triggered when a custom incident is detected.
//! ```
//!
//! Common labels are merged into every alert's labels, overriding labels of
//! the same name. Loading never registers anything; hand the result to
//! `RuleRegistry::register_alerts` or a `Linter`.

use crate::error::{RuleError, Result};
use crate::types::Alert;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name suffix picked up by `load_alert_dir`
pub const ALERT_FILE_SUFFIX: &str = "_alerts.yaml";

/// Parsed contents of one alert file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFile {
    #[serde(default)]
    pub common_labels: Vec<CommonLabel>,

    #[serde(default)]
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonLabel {
    pub name: String,
    pub value: String,
}

impl AlertFile {
    pub fn from_yaml_str(src: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(src)?)
    }

    /// The file's alerts with common labels applied
    pub fn into_alerts(self) -> Vec<Alert> {
        let common_labels = self.common_labels;
        self.alerts
            .into_iter()
            .map(|mut alert| {
                for label in &common_labels {
                    alert.labels.insert(label.name.clone(), label.value.clone());
                }
                alert.for_duration = alert.for_duration.filter(|d| !d.is_empty());
                alert.keep_firing_for_duration =
                    alert.keep_firing_for_duration.filter(|d| !d.is_empty());
                alert
            })
            .collect()
    }
}

/// Load the alerts of a single file
pub fn load_alert_file(path: &Path) -> Result<Vec<Alert>> {
    let src = std::fs::read_to_string(path).map_err(|e| RuleError::Load {
        path: path.display().to_string(),
        reason: format!("error reading file: {e}"),
    })?;

    let file = AlertFile::from_yaml_str(&src).map_err(|e| RuleError::Load {
        path: path.display().to_string(),
        reason: format!("error parsing yaml file: {e}"),
    })?;

    let alerts = file.into_alerts();
    tracing::debug!(path = %path.display(), count = alerts.len(), "Alert file loaded");
    Ok(alerts)
}

/// Load every `*_alerts.yaml` file in `dir`, in file name order
pub fn load_alert_dir(dir: &Path) -> Result<Vec<Alert>> {
    let mut alerts = Vec::new();
    for path in find_alert_files(dir)? {
        alerts.extend(load_alert_file(&path)?);
    }
    Ok(alerts)
}

fn find_alert_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| RuleError::Load {
        path: dir.display().to_string(),
        reason: format!("error finding yaml files: {e}"),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(ALERT_FILE_SUFFIX))
        })
        .collect();
    paths.sort();
    Ok(paths)
}
