//! Rule registry — the authoritative set of accepted recording rules and alerts
//!
//! Entries are keyed by `(name, expression)`: re-registering the same pair
//! replaces the stored payload in place, while a new expression under an
//! existing name becomes a separate entry. Every batch is validated in full
//! before any of it is merged, so a rejected batch leaves the registry
//! untouched.

use crate::artifact::RuleArtifact;
use crate::config::ArtifactConfig;
use crate::error::{RuleError, Result};
use crate::types::{Alert, RecordingRule, RuleKind};
use crate::validation::{AlertValidator, DefaultValidator, RecordingRuleValidator};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Composite identity of a registered rule: `(name, expression)`
pub type RuleKey = (String, String);

trait Identity {
    fn name(&self) -> &str;
    fn expression(&self) -> &str;

    fn key(&self) -> RuleKey {
        (self.name().to_string(), self.expression().to_string())
    }
}

impl Identity for RecordingRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn expression(&self) -> &str {
        &self.expression
    }
}

impl Identity for Alert {
    fn name(&self) -> &str {
        &self.name
    }

    fn expression(&self) -> &str {
        &self.expression
    }
}

#[derive(Default)]
struct RegistryState {
    /// Insertion-ordered; replacing a key keeps its original position
    recording_rules: IndexMap<RuleKey, RecordingRule>,
    alerts: IndexMap<RuleKey, Alert>,
}

/// Registry of recording rules and alerts
///
/// Created by the composition root and shared by reference (or `Arc`) with
/// every registration call site. Mutators take the write lock, readers the
/// read lock; nothing performs I/O while holding it.
pub struct RuleRegistry {
    state: RwLock<RegistryState>,
    recording_rule_validator: Box<dyn RecordingRuleValidator>,
    alert_validator: Box<dyn AlertValidator>,
}

impl RuleRegistry {
    /// Create an empty registry using the default validation policy
    pub fn new() -> Self {
        Self::with_validators(DefaultValidator, DefaultValidator)
    }

    /// Create an empty registry with custom validators for both kinds
    pub fn with_validators(
        recording_rule_validator: impl RecordingRuleValidator + 'static,
        alert_validator: impl AlertValidator + 'static,
    ) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            recording_rule_validator: Box::new(recording_rule_validator),
            alert_validator: Box::new(alert_validator),
        }
    }

    /// Replace the recording rule validator
    pub fn with_recording_rule_validator(
        mut self,
        validator: impl RecordingRuleValidator + 'static,
    ) -> Self {
        self.recording_rule_validator = Box::new(validator);
        self
    }

    /// Replace the alert validator
    pub fn with_alert_validator(mut self, validator: impl AlertValidator + 'static) -> Self {
        self.alert_validator = Box::new(validator);
        self
    }

    /// Validate and merge a batch of recording rules
    ///
    /// All-or-nothing: the first invalid rule rejects the whole batch.
    pub fn register_recording_rules(
        &self,
        batch: impl IntoIterator<Item = RecordingRule>,
    ) -> Result<()> {
        let batch: Vec<RecordingRule> = batch.into_iter().collect();
        self.validate_recording_rules(&batch)?;

        let mut state = self.write()?;
        let batch_size = batch.len();
        merge(&mut state.recording_rules, batch);

        tracing::info!(
            kind = %RuleKind::RecordingRule,
            batch = batch_size,
            total = state.recording_rules.len(),
            "Rules registered"
        );
        Ok(())
    }

    /// Validate and merge a batch of alerts
    ///
    /// All-or-nothing: the first invalid alert rejects the whole batch.
    pub fn register_alerts(&self, batch: impl IntoIterator<Item = Alert>) -> Result<()> {
        let batch: Vec<Alert> = batch.into_iter().collect();
        self.validate_alerts(&batch)?;

        let mut state = self.write()?;
        let batch_size = batch.len();
        merge(&mut state.alerts, batch);

        tracing::info!(
            kind = %RuleKind::Alert,
            batch = batch_size,
            total = state.alerts.len(),
            "Rules registered"
        );
        Ok(())
    }

    /// Check a batch of recording rules against the active validator
    /// without registering it
    pub fn validate_recording_rules(&self, batch: &[RecordingRule]) -> Result<()> {
        validate_batch(RuleKind::RecordingRule, batch, |r| {
            self.recording_rule_validator.validate(r)
        })
    }

    /// Check a batch of alerts against the active validator without
    /// registering it
    pub fn validate_alerts(&self, batch: &[Alert]) -> Result<()> {
        validate_batch(RuleKind::Alert, batch, |a| self.alert_validator.validate(a))
    }

    /// All recording rules, sorted by name (ties keep registration order)
    pub fn list_recording_rules(&self) -> Result<Vec<RecordingRule>> {
        let state = self.read()?;
        Ok(sorted_by_name(&state.recording_rules))
    }

    /// All alerts, sorted by name (ties keep registration order)
    pub fn list_alerts(&self) -> Result<Vec<Alert>> {
        let state = self.read()?;
        Ok(sorted_by_name(&state.alerts))
    }

    /// Both rule lists, read under a single lock acquisition
    pub fn snapshot(&self) -> Result<(Vec<RecordingRule>, Vec<Alert>)> {
        let state = self.read()?;
        Ok((
            sorted_by_name(&state.recording_rules),
            sorted_by_name(&state.alerts),
        ))
    }

    /// Number of registered recording rules
    pub fn recording_rule_count(&self) -> Result<usize> {
        Ok(self.read()?.recording_rules.len())
    }

    /// Number of registered alerts
    pub fn alert_count(&self) -> Result<usize> {
        Ok(self.read()?.alerts.len())
    }

    /// Remove every entry of both kinds
    pub fn clean(&self) -> Result<()> {
        let mut state = self.write()?;
        let removed = state.recording_rules.len() + state.alerts.len();
        state.recording_rules.clear();
        state.alerts.clear();

        tracing::debug!(removed, "Rule registry cleaned");
        Ok(())
    }

    /// Assemble the registered rules into an artifact
    pub fn build_artifact(
        &self,
        name: impl Into<String>,
        namespace: impl Into<String>,
        labels: BTreeMap<String, String>,
    ) -> Result<RuleArtifact> {
        RuleArtifact::build(self, name, namespace, labels)
    }

    /// Assemble the registered rules using an artifact configuration
    pub fn build_artifact_from_config(&self, config: &ArtifactConfig) -> Result<RuleArtifact> {
        config.validate()?;
        self.build_artifact(&config.name, &config.namespace, config.labels.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState>> {
        self.state.read().map_err(|e| {
            RuleError::Registry(format!("Rule registry lock poisoned: {}", e))
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>> {
        self.state.write().map_err(|e| {
            RuleError::Registry(format!("Rule registry lock poisoned: {}", e))
        })
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_batch<T, F>(kind: RuleKind, batch: &[T], validate: F) -> Result<()>
where
    T: Identity,
    F: Fn(&T) -> std::result::Result<(), crate::error::ValidationError>,
{
    for rule in batch {
        if let Err(source) = validate(rule) {
            tracing::warn!(
                kind = %kind,
                rule = %rule.name(),
                reason = %source,
                batch = batch.len(),
                "Rule batch rejected"
            );
            return Err(RuleError::Validation {
                kind,
                name: rule.name().to_string(),
                source,
            });
        }
    }
    Ok(())
}

fn merge<T: Identity>(entries: &mut IndexMap<RuleKey, T>, batch: Vec<T>) {
    for rule in batch {
        entries.insert(rule.key(), rule);
    }
}

fn sorted_by_name<T: Identity + Clone>(entries: &IndexMap<RuleKey, T>) -> Vec<T> {
    let mut rules: Vec<T> = entries.values().cloned().collect();
    rules.sort_by(|a, b| a.name().cmp(b.name()));
    rules
}
