//! Generic YAML/JSON manifest heuristics.
//!
//! A built-in check for Kubernetes-style manifests and other structured
//! configuration. YAML and JSON both deserialize into `serde_json::Value`,
//! so one rule table covers the two syntaxes. Predicates walk the whole
//! document tree; they do not depend on a particular resource layout.
//!
//! # Rules
//!
//! | ID | Category | What it checks |
//! |----|----------|----------------|
//! | `manifest/MF-001` | critical | `privileged: true` anywhere in the document |
//! | `manifest/MF-002` | warning | `hostNetwork: true` or `hostPID: true` |
//! | `manifest/MF-003` | warning | No `resources`/`limits` keys anywhere |
//! | `manifest/MF-004` | warning | Runs as root (`runAsUser: 0`, or a security context without `runAsNonRoot`) |
//! | `manifest/MF-005` | suggestion | Container image with a mutable tag |

use crate::collectors::{image_tag_is_mutable, RuleInfo};
use crate::finding::{FileAnalysis, FileKind, Issue, IssueCategory};
use serde_json::Value;
use std::path::Path;

/// Visits every key/value pair in the document tree, depth first.
fn walk_entries(value: &Value, visit: &mut impl FnMut(&str, &Value)) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                visit(key, child);
                walk_entries(child, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_entries(item, visit);
            }
        }
        _ => {}
    }
}

fn has_entry(doc: &Value, wanted_key: &str, pred: impl Fn(&Value) -> bool) -> bool {
    let mut found = false;
    walk_entries(doc, &mut |key, value| {
        if !found && key == wanted_key && pred(value) {
            found = true;
        }
    });
    found
}

fn bool_entry(doc: &Value, key: &str) -> bool {
    has_entry(doc, key, |v| v.as_bool() == Some(true))
}

fn is_privileged(doc: &Value) -> bool {
    bool_entry(doc, "privileged")
}

fn shares_host_namespace(doc: &Value) -> bool {
    bool_entry(doc, "hostNetwork") || bool_entry(doc, "hostPID")
}

fn lacks_resource_limits(doc: &Value) -> bool {
    !has_entry(doc, "resources", |_| true) && !has_entry(doc, "limits", |_| true)
}

fn runs_as_root(doc: &Value) -> bool {
    if has_entry(doc, "runAsUser", |v| v.as_u64() == Some(0)) {
        return true;
    }
    // A security context that never opts into runAsNonRoot leaves the
    // container free to run as uid 0.
    has_entry(doc, "securityContext", |v| v.is_object()) && !bool_entry(doc, "runAsNonRoot")
}

fn uses_mutable_image(doc: &Value) -> bool {
    has_entry(doc, "image", |v| {
        v.as_str().is_some_and(image_tag_is_mutable)
    })
}

struct ManifestRule {
    id: &'static str,
    category: IssueCategory,
    message: &'static str,
    remediation: &'static str,
    violates: fn(&Value) -> bool,
}

static RULES: &[ManifestRule] = &[
    ManifestRule {
        id: "manifest/MF-001",
        category: IssueCategory::Critical,
        message: "Privileged container in manifest",
        remediation: "Remove `privileged: true`; grant individual capabilities instead",
        violates: is_privileged,
    },
    ManifestRule {
        id: "manifest/MF-002",
        category: IssueCategory::Warning,
        message: "Workload shares a host namespace",
        remediation: "Remove hostNetwork/hostPID; expose ports through a Service",
        violates: shares_host_namespace,
    },
    ManifestRule {
        id: "manifest/MF-003",
        category: IssueCategory::Warning,
        message: "No resource limits detected",
        remediation: "Set resources.limits for every container to contain runaway workloads",
        violates: lacks_resource_limits,
    },
    ManifestRule {
        id: "manifest/MF-004",
        category: IssueCategory::Warning,
        message: "Workload may run as root",
        remediation: "Set runAsNonRoot: true (and a non-zero runAsUser) in the security context",
        violates: runs_as_root,
    },
    ManifestRule {
        id: "manifest/MF-005",
        category: IssueCategory::Suggestion,
        message: "Container image uses a mutable tag",
        remediation: "Pin images to a version tag or digest",
        violates: uses_mutable_image,
    },
];

/// Runs the manifest rule table against the YAML or JSON file at `path`.
pub fn check(path: &Path) -> FileAnalysis {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            return FileAnalysis::failed(path, FileKind::Manifest, format!("Failed to read manifest: {e}"))
        }
    };

    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let doc: Value = if is_json {
        match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                return FileAnalysis::failed(path, FileKind::Manifest, format!("Malformed JSON: {e}"))
            }
        }
    } else {
        match serde_yaml::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                return FileAnalysis::failed(path, FileKind::Manifest, format!("Malformed YAML: {e}"))
            }
        }
    };

    let mut issues = Vec::new();
    for rule in RULES {
        if (rule.violates)(&doc) {
            issues.push(Issue {
                rule_id: rule.id.to_string(),
                category: rule.category,
                message: rule.message.to_string(),
                recommendation: rule.remediation.to_string(),
                location: None,
            });
        }
    }

    FileAnalysis::clean(path, FileKind::Manifest, issues)
}

/// Returns the [`RuleInfo`] catalogue for the manifest check.
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
            check: "manifest",
            message: r.message,
            remediation: r.remediation,
        })
        .collect()
}
