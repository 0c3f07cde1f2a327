//! # a3s-rules
//!
//! Recording rule and alert registry, validation, and artifact assembly for
//! the A3S ecosystem.
//!
//! ## Overview
//!
//! Independent subsystems declare recording rules and alerts into one
//! `RuleRegistry`. Every batch is validated against a pluggable policy,
//! merged by `(name, expression)` identity, and finally assembled into a
//! sorted, grouped `PrometheusRule` artifact.
//!
//! ## Quick Start
//!
//! ```rust
//! use a3s_rules::{Alert, RecordingRule, RuleRegistry};
//! use std::collections::BTreeMap;
//!
//! # fn example() -> a3s_rules::Result<()> {
//! let registry = RuleRegistry::new();
//!
//! registry.register_recording_rules(vec![
//!     RecordingRule::new("number_of_pods", "sum(up{pod=~'guestbook-operator-.*'})"),
//! ])?;
//! registry.register_alerts(vec![
//!     Alert::new("GuestbookOperatorDown", "number_of_pods == 0")
//!         .with_label("severity", "critical")
//!         .with_annotation("summary", "Guestbook operator is down")
//!         .with_annotation("description", "No guestbook operator pod is up."),
//! ])?;
//!
//! let artifact = registry.build_artifact("guestbook-rules", "default", BTreeMap::new())?;
//! println!("{}", artifact.to_yaml()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **RuleRegistry** — lock-guarded identity map per rule kind
//! - **RecordingRuleValidator / AlertValidator** — strict, injectable policy
//! - **Linter** — exhaustive, non-fatal checks over whole rule-sets
//! - **RuleArtifact** — immutable grouped snapshot of the registry
//! - **loader / RulesConfig** — declarative YAML inputs

pub mod artifact;
pub mod config;
pub mod docs;
pub mod error;
pub mod lint;
pub mod loader;
pub mod registry;
pub mod types;
pub mod validation;

// Re-export core types
pub use artifact::{ArtifactRule, RuleArtifact, RuleGroup, ALERTS_GROUP, RECORDING_RULES_GROUP};
pub use config::{ArtifactConfig, Observability, RuleGroupConfig, RulesConfig};
pub use error::{Result, RuleError, ValidationError};
pub use lint::{AlertCheck, Linter, RecordingRuleCheck};
pub use loader::{load_alert_dir, load_alert_file, AlertFile, CommonLabel};
pub use registry::{RuleKey, RuleRegistry};
pub use types::{Alert, LintProblem, MetricType, RecordingRule, RuleKind, StabilityLevel};
pub use validation::{is_pascal_case, AlertValidator, DefaultValidator, RecordingRuleValidator};
