//! Markdown documentation for recording rules and alerts
//!
//! Templates are rendered with `minijinja`. Custom templates receive the
//! same context as the defaults: a `rules` or `alerts` list sorted by name.

use crate::error::Result;
use crate::types::{Alert, RecordingRule};
use minijinja::{context, Environment};
use serde::Serialize;
use std::collections::BTreeMap;

/// Default template for recording rule docs
pub const RECORDING_RULES_TEMPLATE: &str = r#"# Operator Recording Rules
{% for rule in rules %}
### {{ rule.name }}
{{ rule.help }}. Type: {{ rule.type }}.
{%- if rule.stability_level %} Stability: {{ rule.stability_level }}.{% endif %}
{% endfor %}
## Developing new recording rules

All recording rules documented here are auto-generated and reflect exactly what
is being registered. After adding or changing recording rules please
regenerate this document.
"#;

/// Default template for alert docs
pub const ALERTS_TEMPLATE: &str = r#"# Operator Alerts
{% for alert in alerts %}
### {{ alert.name }}
**Summary:** {{ alert.summary }}

**Description:** {{ alert.description }}

**Severity:** {{ alert.severity }}
{%- if alert.runbook_url %}

**Runbook:** {{ alert.runbook_url }}
{%- endif %}
{% endfor %}"#;

#[derive(Serialize)]
struct RecordingRuleDoc<'a> {
    name: &'a str,
    help: &'a str,
    #[serde(rename = "type")]
    metric_type: String,
    stability_level: Option<String>,
    extra_fields: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct AlertDoc<'a> {
    name: &'a str,
    summary: &'a str,
    description: &'a str,
    severity: &'a str,
    runbook_url: &'a str,
    labels: &'a BTreeMap<String, String>,
}

/// Render recording rule docs with the default template
pub fn build_recording_rules_docs(rules: &[RecordingRule]) -> Result<String> {
    build_recording_rules_docs_with_template(rules, RECORDING_RULES_TEMPLATE)
}

/// Render recording rule docs with a custom template
pub fn build_recording_rules_docs_with_template(
    rules: &[RecordingRule],
    template: &str,
) -> Result<String> {
    let mut docs: Vec<RecordingRuleDoc<'_>> = rules
        .iter()
        .map(|r| RecordingRuleDoc {
            name: &r.name,
            help: &r.help,
            metric_type: r.metric_type.to_string(),
            stability_level: r.stability_level.map(|s| s.to_string()),
            extra_fields: &r.extra_fields,
        })
        .collect();
    docs.sort_by(|a, b| a.name.cmp(b.name));

    render(template, context! { rules => docs })
}

/// Render alert docs with the default template
pub fn build_alerts_docs(alerts: &[Alert]) -> Result<String> {
    build_alerts_docs_with_template(alerts, ALERTS_TEMPLATE)
}

/// Render alert docs with a custom template
pub fn build_alerts_docs_with_template(alerts: &[Alert], template: &str) -> Result<String> {
    let mut docs: Vec<AlertDoc<'_>> = alerts
        .iter()
        .map(|a| AlertDoc {
            name: &a.name,
            summary: a.annotation("summary"),
            description: a.annotation("description"),
            severity: a.label("severity"),
            runbook_url: a.annotation("runbook_url"),
            labels: &a.labels,
        })
        .collect();
    docs.sort_by(|a, b| a.name.cmp(b.name));

    render(template, context! { alerts => docs })
}

fn render(template: &str, ctx: minijinja::Value) -> Result<String> {
    let env = Environment::new();
    Ok(env.render_str(template, ctx)?)
}
