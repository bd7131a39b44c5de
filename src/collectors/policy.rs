//! Rego policy heuristics.
//!
//! A built-in check for OPA/Kyverno-style policy-as-code files. Purely
//! textual: the rules look for the presence of `deny`/`allow` rule heads, a
//! permissive `default allow = true`, and a `package` declaration.
//!
//! # Rules
//!
//! | ID | Category | What it checks |
//! |----|----------|----------------|
//! | `policy/PL-001` | warning | No `deny`/`allow` rules detected |
//! | `policy/PL-002` | warning | `default allow = true` (fail-open policy) |
//! | `policy/PL-003` | suggestion | No `package` declaration |

use crate::collectors::RuleInfo;
use crate::finding::{FileAnalysis, FileKind, Issue, IssueCategory};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static RE_RULE_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(deny|allow|violation)\b").unwrap());

static RE_DEFAULT_ALLOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*default\s+allow\s*:?=\s*true\b").unwrap());

static RE_PACKAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*package\s+\S+").unwrap());

struct PolicyRule {
    id: &'static str,
    category: IssueCategory,
    message: &'static str,
    remediation: &'static str,
    violates: fn(&str) -> bool,
}

static RULES: &[PolicyRule] = &[
    PolicyRule {
        id: "policy/PL-001",
        category: IssueCategory::Warning,
        message: "No deny/allow rules detected",
        remediation: "A policy without rule heads enforces nothing; add deny or allow rules",
        violates: |text| !RE_RULE_HEAD.is_match(text),
    },
    PolicyRule {
        id: "policy/PL-002",
        category: IssueCategory::Warning,
        message: "Policy defaults to allow",
        remediation: "Use `default allow = false` and grant access through explicit rules",
        violates: |text| RE_DEFAULT_ALLOW.is_match(text),
    },
    PolicyRule {
        id: "policy/PL-003",
        category: IssueCategory::Suggestion,
        message: "No package declaration",
        remediation: "Declare a package so the policy can be addressed by queries",
        violates: |text| !RE_PACKAGE.is_match(text),
    },
];

/// Runs the policy rule table against the Rego file at `path`.
pub fn check(path: &Path) -> FileAnalysis {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            return FileAnalysis::failed(path, FileKind::Policy, format!("Failed to read policy: {e}"))
        }
    };

    let mut issues = Vec::new();
    for rule in RULES {
        if (rule.violates)(&text) {
            issues.push(Issue {
                rule_id: rule.id.to_string(),
                category: rule.category,
                message: rule.message.to_string(),
                recommendation: rule.remediation.to_string(),
                location: None,
            });
        }
    }

    FileAnalysis::clean(path, FileKind::Policy, issues)
}

/// Returns the [`RuleInfo`] catalogue for the policy check.
pub fn rules() -> Vec<RuleInfo> {
    RULES
        .iter()
        .map(|r| RuleInfo {
            id: r.id,
            category: match r.category {
                IssueCategory::Critical => "critical",
                IssueCategory::Warning => "warning",
                IssueCategory::Suggestion => "suggestion",
            },
            check: "policy",
            message: r.message,
            remediation: r.remediation,
        })
        .collect()
}
