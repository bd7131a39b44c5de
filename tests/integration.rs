use assert_cmd::Command;
use predicates::prelude::*;

fn devsecops_audit() -> Command {
    Command::cargo_bin("devsecops-audit").unwrap()
}

#[test]
fn analyze_dirty_dockerfile_reports_critical_and_suggestion() {
    // FROM ubuntu:latest + USER root + no HEALTHCHECK must produce at least
    // one critical (root user) and one suggestion (healthcheck), and exit
    // cleanly.
    devsecops_audit()
        .args(["analyze", "tests/fixtures/Dockerfile.dirty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Container runs as root"))
        .stdout(predicate::str::contains("No HEALTHCHECK instruction"));
}

#[test]
fn analyze_clean_dockerfile_reports_no_issues() {
    devsecops_audit()
        .args(["analyze", "tests/fixtures/Dockerfile.clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn analyze_privileged_compose_flags_the_service() {
    devsecops_audit()
        .args(["analyze", "tests/fixtures/compose-dirty.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Service runs privileged"))
        .stdout(predicate::str::contains("service: web"));
}

#[test]
fn analyze_malformed_yaml_reports_error_in_band() {
    devsecops_audit()
        .args(["analyze", "tests/fixtures/broken.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Malformed YAML"));
}

#[test]
fn analyze_missing_file_fails() {
    devsecops_audit()
        .args(["analyze", "tests/fixtures/does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn analyze_unsupported_file_prints_hint() {
    devsecops_audit()
        .args(["analyze", "Cargo.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unsupported file type"));
}

#[test]
fn read_plan_without_pdf_prints_tagged_message() {
    devsecops_audit()
        .args(["read-plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Work plan not found"));
}

#[test]
fn check_tools_lists_scanners_and_renderers() {
    devsecops_audit()
        .args(["check-tools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scanner Availability"))
        .stdout(predicate::str::contains("PDF Renderer Availability"));
}

#[test]
fn list_rules_shows_rules() {
    devsecops_audit()
        .args(["list-rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dockerfile/DF-001"))
        .stdout(predicate::str::contains("compose/CP-001"))
        .stdout(predicate::str::contains("policy/PL-001"));
}

#[test]
fn explain_known_rule() {
    devsecops_audit()
        .args(["explain", "dockerfile/DF-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dockerfile/DF-001"))
        .stdout(predicate::str::contains("Remediation"));
}

#[test]
fn explain_unknown_rule_fails() {
    devsecops_audit()
        .args(["explain", "nonexistent/rule"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown rule"));
}

#[test]
fn unknown_command_prints_usage() {
    devsecops_audit()
        .args(["frobnicate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn scan_rejects_unknown_kind() {
    devsecops_audit()
        .args(["scan", "fuzzer", "target"])
        .assert()
        .failure();
}

#[test]
fn generate_report_writes_all_text_formats() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("devsecops-audit.toml"),
        "[report]\ndir = \"out\"\n\n[collectors]\nsast = false\ncontainer = false\ndast = false\n",
    )
    .unwrap();
    // A config file with issues so the report carries findings.
    std::fs::write(
        tmp.path().join("Dockerfile"),
        "FROM ubuntu:latest\nCOPY app /app\nCMD [\"/app/server\"]\n",
    )
    .unwrap();

    devsecops_audit()
        .current_dir(tmp.path())
        .args(["generate-report", "--project", "integration"])
        .assert()
        .success()
        .stdout(predicate::str::contains("report.md"));

    let out = tmp.path().join("out");
    assert!(out.join("report.md").exists());
    assert!(out.join("report.html").exists());
    assert!(out.join("report.json").exists());

    let markdown = std::fs::read_to_string(out.join("report.md")).unwrap();
    assert!(markdown.contains("DevSecOps Report: integration"));
    assert!(markdown.contains("Container runs as root"));
    assert!(markdown.contains("data:image/png;base64,"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("report.json")).unwrap()).unwrap();
    assert_eq!(json["project_name"], "integration");
    assert!(json["findings"].as_array().unwrap().len() >= 2);
}
