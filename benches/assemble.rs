//! Performance benchmarks for a3s-rules
//!
//! Run with: cargo bench

use a3s_rules::lint::checks;
use a3s_rules::{Alert, Linter, RecordingRule, RuleRegistry};
use criterion::{criterion_group, criterion_main, Criterion};
use std::collections::BTreeMap;

fn sample_alerts(n: usize) -> Vec<Alert> {
    (0..n)
        .map(|i| {
            let suffix = (b'A' + (i % 26) as u8) as char;
            Alert::new(format!("ExampleAlert{suffix}"), format!("x > {i}"))
                .with_label("severity", "warning")
                .with_annotation("summary", "Example summary")
                .with_annotation("description", "Example description")
        })
        .collect()
}

fn sample_rules(n: usize) -> Vec<RecordingRule> {
    (0..n)
        .map(|i| RecordingRule::new(format!("rule_{i}"), format!("sum(metric_{i})")))
        .collect()
}

fn bench_registration(c: &mut Criterion) {
    let alerts = sample_alerts(500);
    let rules = sample_rules(500);

    c.bench_function("register 500 alerts", |b| {
        b.iter(|| {
            let reg = RuleRegistry::new();
            reg.register_alerts(alerts.clone()).unwrap();
        });
    });

    c.bench_function("register 500 recording rules", |b| {
        b.iter(|| {
            let reg = RuleRegistry::new();
            reg.register_recording_rules(rules.clone()).unwrap();
        });
    });
}

fn bench_assembly(c: &mut Criterion) {
    let reg = RuleRegistry::new();
    reg.register_alerts(sample_alerts(500)).unwrap();
    reg.register_recording_rules(sample_rules(500)).unwrap();

    c.bench_function("build_artifact 1000 rules", |b| {
        b.iter(|| reg.build_artifact("rules", "default", BTreeMap::new()).unwrap());
    });

    let artifact = reg.build_artifact("rules", "default", BTreeMap::new()).unwrap();
    c.bench_function("artifact to_yaml 1000 rules", |b| {
        b.iter(|| artifact.to_yaml().unwrap());
    });
}

fn bench_lint(c: &mut Criterion) {
    let alerts = sample_alerts(500);
    let linter = Linter::new()
        .with_alert_check(checks::alert_name_length)
        .with_alert_check(checks::alert_runbook_url_annotation)
        .with_alert_check(checks::alert_part_of_and_component_labels);

    c.bench_function("lint 500 alerts", |b| {
        b.iter(|| linter.lint_alerts(&alerts));
    });
}

criterion_group!(benches, bench_registration, bench_assembly, bench_lint);
criterion_main!(benches);
