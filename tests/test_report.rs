use devsecops_audit::finding::{Finding, Severity};
use devsecops_audit::i18n::Translations;
use devsecops_audit::report::{json, markdown, pdf, MetricValue, Report, ReportError};

fn sample_report() -> Report {
    let mut report = Report::new("acme-payments", "en");
    report.add_finding(Finding::new(
        Severity::Medium,
        "Mutable base image tag",
        "dockerfile check flagged rule dockerfile/DF-003",
        "Pin the base image",
        "dockerfile check",
        "Dockerfile (line 1)",
    ));
    report.add_finding(Finding::new(
        Severity::Critical,
        "Container runs as root",
        "dockerfile check flagged rule dockerfile/DF-001",
        "Add a non-root USER",
        "dockerfile check",
        "Dockerfile (line 11)",
    ));
    let mut privileged = Finding::new(
        Severity::Critical,
        "Privileged service",
        "compose check flagged rule compose/CP-001",
        "Drop privileged mode",
        "compose check",
        "docker-compose.yml (service: web)",
    );
    privileged
        .references
        .push("https://docs.docker.com/engine/containers/run/".to_string());
    report.add_finding(privileged);
    report.add_metric("findings_total", 3usize);
    report.add_metric("coverage", 0.87);
    report.add_summary("executive_summary", "Two critical issues were found.");
    report.add_summary("next_steps", "Fix the root user first.");
    report
}

/// Markdown text with the embedded chart line removed — the chart encoding is
/// the one accepted source of variation between renders.
fn without_chart(text: &str) -> String {
    text.lines()
        .filter(|l| !l.contains("data:image/png;base64,"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn markdown_rendering_is_deterministic() {
    let t = Translations::builtin();
    let report = sample_report();
    let first = markdown::render(&report, &t).unwrap();
    let second = markdown::render(&report, &t).unwrap();
    assert_eq!(without_chart(&first), without_chart(&second));
}

#[test]
fn markdown_groups_by_severity_preserving_insertion_order() {
    let t = Translations::builtin();
    let report = sample_report();
    let text = markdown::render(&report, &t).unwrap();

    // CRITICAL group renders before MEDIUM.
    let critical_pos = text.find("## CRITICAL Findings").unwrap();
    let medium_pos = text.find("## MEDIUM Findings").unwrap();
    assert!(critical_pos < medium_pos);

    // Within CRITICAL, insertion order holds: root finding was added before
    // the privileged one.
    let root_pos = text.find("Container runs as root").unwrap();
    let privileged_pos = text.find("Privileged service").unwrap();
    assert!(root_pos < privileged_pos);

    // References render as a nested list under their finding.
    assert!(text.contains("https://docs.docker.com/engine/containers/run/"));
}

#[test]
fn markdown_renders_localized_labels() {
    let t = Translations::builtin();
    let mut report = sample_report();
    report.locale = "pt".to_string();
    let text = markdown::render(&report, &t).unwrap();
    assert!(text.contains("Relatório DevSecOps"));
    assert!(text.contains("Sumário Executivo"));
}

#[test]
fn json_export_round_trips() {
    let report = sample_report();
    let exported = json::render(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&exported).unwrap();

    assert_eq!(value["project_name"], "acme-payments");
    assert_eq!(value["findings"].as_array().unwrap().len(), 3);
    assert_eq!(value["metrics"]["findings_total"], 3);
    assert_eq!(value["metrics"]["coverage"], 0.87);
    assert_eq!(
        value["summaries"]["executive_summary"],
        "Two critical issues were found."
    );
    // JSON is the chart-exempt format.
    assert!(!exported.contains("data:image/png"));
}

#[test]
fn metrics_last_write_wins() {
    let mut report = Report::new("p", "en");
    report.add_metric("findings_total", 1usize);
    report.add_metric("findings_total", 9usize);
    assert_eq!(
        report.metrics.get("findings_total"),
        Some(&MetricValue::Integer(9))
    );
}

#[test]
fn summaries_last_write_wins() {
    let mut report = Report::new("p", "en");
    report.add_summary("executive_summary", "first");
    report.add_summary("executive_summary", "second");
    assert_eq!(
        report.summaries.get("executive_summary").map(String::as_str),
        Some("second")
    );
}

#[test]
fn severity_counts_cover_all_buckets() {
    let report = sample_report();
    assert_eq!(report.severity_counts(), [2, 0, 1, 0]);
}

#[test]
fn empty_renderer_chain_is_a_recoverable_error() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("report.pdf");
    let result = pdf::render_with(&[], "<html></html>", &out);
    assert!(matches!(result, Err(ReportError::NoPdfRenderer)));
    // Atomicity: a failed export leaves no partial file behind.
    assert!(!out.exists());
}

#[test]
fn no_renderer_error_names_the_fallback() {
    let err = ReportError::NoPdfRenderer.to_string();
    assert!(err.contains("HTML"));
}
