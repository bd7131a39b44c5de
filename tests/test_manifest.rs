use std::path::Path;

use devsecops_audit::collectors::manifest;
use devsecops_audit::finding::IssueCategory;

fn check_fixture(fixture: &str) -> devsecops_audit::finding::FileAnalysis {
    let path = Path::new("tests/fixtures").join(fixture);
    manifest::check(&path)
}

#[test]
fn clean_manifest_has_no_issues() {
    let analysis = check_fixture("manifest-clean.yaml");
    assert!(analysis.error.is_none());
    assert!(
        analysis.issues.is_empty(),
        "Expected no issues, got: {:?}",
        analysis.issues
    );
}

#[test]
fn privileged_container_is_critical() {
    let analysis = check_fixture("manifest-dirty.yaml");
    let privileged = analysis
        .issues
        .iter()
        .find(|i| i.rule_id == "manifest/MF-001")
        .expect("Expected MF-001 for privileged securityContext");
    assert_eq!(privileged.category, IssueCategory::Critical);
}

#[test]
fn host_network_is_flagged() {
    let analysis = check_fixture("manifest-dirty.yaml");
    assert!(analysis.issues.iter().any(|i| i.rule_id == "manifest/MF-002"));
}

#[test]
fn missing_limits_is_flagged() {
    let analysis = check_fixture("manifest-dirty.yaml");
    assert!(analysis.issues.iter().any(|i| i.rule_id == "manifest/MF-003"));
}

#[test]
fn security_context_without_run_as_non_root_is_flagged() {
    let analysis = check_fixture("manifest-dirty.yaml");
    assert!(analysis.issues.iter().any(|i| i.rule_id == "manifest/MF-004"));
}

#[test]
fn latest_image_tag_is_a_suggestion() {
    let analysis = check_fixture("manifest-dirty.yaml");
    let tag = analysis
        .issues
        .iter()
        .find(|i| i.rule_id == "manifest/MF-005")
        .expect("Expected MF-005 for busybox:latest");
    assert_eq!(tag.category, IssueCategory::Suggestion);
}

#[test]
fn malformed_yaml_reports_in_band_error() {
    let analysis = check_fixture("broken.yaml");
    assert!(analysis.error.is_some());
    assert!(analysis.issues.is_empty());
}
