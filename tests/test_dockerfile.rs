use std::path::Path;

use devsecops_audit::collectors::dockerfile;
use devsecops_audit::finding::IssueCategory;

fn check_fixture(fixture: &str) -> devsecops_audit::finding::FileAnalysis {
    let path = Path::new("tests/fixtures").join(fixture);
    dockerfile::check(&path)
}

fn has_rule(analysis: &devsecops_audit::finding::FileAnalysis, rule_id: &str) -> bool {
    analysis.issues.iter().any(|i| i.rule_id == rule_id)
}

#[test]
fn clean_dockerfile_has_no_issues() {
    let analysis = check_fixture("Dockerfile.clean");
    assert!(analysis.error.is_none());
    assert!(
        analysis.issues.is_empty(),
        "Expected no issues, got: {:?}",
        analysis.issues
    );
}

#[test]
fn dirty_dockerfile_flags_root_user() {
    let analysis = check_fixture("Dockerfile.dirty");
    let root: Vec<_> = analysis
        .issues
        .iter()
        .filter(|i| i.rule_id == "dockerfile/DF-001")
        .collect();
    assert!(!root.is_empty(), "Expected DF-001 for USER root");
    assert_eq!(root[0].category, IssueCategory::Critical);
}

#[test]
fn missing_user_directive_always_flags_root() {
    let analysis = check_fixture("Dockerfile.noroot");
    assert!(
        has_rule(&analysis, "dockerfile/DF-001"),
        "A Dockerfile without USER must get the root-usage critical"
    );
    let issue = analysis
        .issues
        .iter()
        .find(|i| i.rule_id == "dockerfile/DF-001")
        .unwrap();
    assert_eq!(issue.category, IssueCategory::Critical);
    // No USER line exists to point at.
    assert!(issue.location.is_none());
}

#[test]
fn dirty_dockerfile_flags_pipe_to_shell() {
    let analysis = check_fixture("Dockerfile.dirty");
    assert!(has_rule(&analysis, "dockerfile/DF-002"));
}

#[test]
fn dirty_dockerfile_flags_mutable_tag() {
    let analysis = check_fixture("Dockerfile.dirty");
    assert!(has_rule(&analysis, "dockerfile/DF-003"));
}

#[test]
fn dirty_dockerfile_flags_embedded_secret() {
    let analysis = check_fixture("Dockerfile.dirty");
    let secret = analysis
        .issues
        .iter()
        .find(|i| i.rule_id == "dockerfile/DF-004")
        .expect("Expected DF-004 for ENV API_KEY");
    assert_eq!(secret.category, IssueCategory::Warning);
}

#[test]
fn dirty_dockerfile_flags_add_url_and_sudo() {
    let analysis = check_fixture("Dockerfile.dirty");
    assert!(has_rule(&analysis, "dockerfile/DF-005"));
    assert!(has_rule(&analysis, "dockerfile/DF-006"));
}

#[test]
fn dirty_dockerfile_suggests_healthcheck_and_copy() {
    let analysis = check_fixture("Dockerfile.dirty");
    let healthcheck = analysis
        .issues
        .iter()
        .find(|i| i.rule_id == "dockerfile/DF-007")
        .expect("Expected DF-007 for missing HEALTHCHECK");
    assert_eq!(healthcheck.category, IssueCategory::Suggestion);
    assert!(has_rule(&analysis, "dockerfile/DF-008"));
}

#[test]
fn dirty_dockerfile_flags_apt_cache() {
    let analysis = check_fixture("Dockerfile.dirty");
    assert!(has_rule(&analysis, "dockerfile/DF-009"));
}

#[test]
fn cleaned_apt_cache_on_continued_run_is_accepted() {
    // The clean fixture spreads apt-get install over backslash continuations;
    // the parser must fold them before the cache rule looks at the args.
    let analysis = check_fixture("Dockerfile.clean");
    assert!(!has_rule(&analysis, "dockerfile/DF-009"));
}

#[test]
fn check_is_idempotent() {
    let first = check_fixture("Dockerfile.dirty");
    let second = check_fixture("Dockerfile.dirty");
    let ids = |a: &devsecops_audit::finding::FileAnalysis| {
        a.issues
            .iter()
            .map(|i| (i.rule_id.clone(), i.location.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn unreadable_dockerfile_reports_in_band_error() {
    let analysis = dockerfile::check(Path::new("tests/fixtures/Dockerfile.missing"));
    assert!(analysis.error.is_some());
    assert!(analysis.issues.is_empty());
}
