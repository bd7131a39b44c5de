use std::path::Path;

use devsecops_audit::collectors::policy;

fn check_fixture(fixture: &str) -> devsecops_audit::finding::FileAnalysis {
    let path = Path::new("tests/fixtures").join(fixture);
    policy::check(&path)
}

#[test]
fn policy_with_rules_and_package_is_clean() {
    let analysis = check_fixture("policy-good.rego");
    assert!(analysis.error.is_none());
    assert!(
        analysis.issues.is_empty(),
        "Expected no issues, got: {:?}",
        analysis.issues
    );
}

#[test]
fn empty_policy_flags_missing_rules() {
    let analysis = check_fixture("policy-empty.rego");
    assert!(analysis.issues.iter().any(|i| i.rule_id == "policy/PL-001"));
}

#[test]
fn empty_policy_flags_missing_package() {
    let analysis = check_fixture("policy-empty.rego");
    assert!(analysis.issues.iter().any(|i| i.rule_id == "policy/PL-003"));
}

#[test]
fn commented_default_allow_does_not_fire() {
    // The fixture carries `# default allow = false` in a comment; rule heads
    // behind a comment marker must not count.
    let analysis = check_fixture("policy-empty.rego");
    assert!(!analysis.issues.iter().any(|i| i.rule_id == "policy/PL-002"));
}
