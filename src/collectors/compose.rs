//! Compose file heuristics.
//!
//! A built-in check — no external tool required. The file is parsed with
//! serde_yaml and every entry under the top-level `services` mapping is
//! evaluated against a fixed per-service rule table. Issues carry the
//! service name as their location.
//!
//! # Rules
//!
//! | ID | Category | What it checks |
//! |----|----------|----------------|
//! | `compose/CP-001` | critical | `privileged: true` |
//! | `compose/CP-002` | critical | `network_mode: host` or `pid: host` |
//! | `compose/CP-003` | warning | Docker socket bind-mounted into the service |
//! | `compose/CP-004` | warning | No resource limits |
//! | `compose/CP-005` | warning | Mutable image tag |
//! | `compose/CP-006` | warning | Secret-looking inline environment value |
//! | `compose/CP-007` | suggestion | No `healthcheck` |

use crate::collectors::{image_tag_is_mutable, RuleInfo, RE_SECRET};
use crate::finding::{FileAnalysis, FileKind, Issue, IssueCategory};
use serde_yaml::Value;
use std::path::Path;

/// Cheap structural probe used by file-kind detection: a compose file is a
/// YAML mapping with a top-level `services` mapping.
pub fn looks_like_compose(text: &str) -> bool {
    matches!(
        serde_yaml::from_str::<Value>(text),
        Ok(Value::Mapping(ref m)) if m.get("services").is_some_and(Value::is_mapping)
    )
}

fn str_field<'a>(service: &'a Value, key: &str) -> Option<&'a str> {
    service.get(key).and_then(Value::as_str)
}

fn is_privileged(service: &Value) -> bool {
    service
        .get("privileged")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn shares_host_namespace(service: &Value) -> bool {
    str_field(service, "network_mode") == Some("host") || str_field(service, "pid") == Some("host")
}

fn mounts_docker_socket(service: &Value) -> bool {
    let Some(volumes) = service.get("volumes").and_then(Value::as_sequence) else {
        return false;
    };
    volumes.iter().any(|v| {
        // Short syntax "host:container[:mode]" or long syntax with `source:`.
        let source = v
            .as_str()
            .map(|s| s.split(':').next().unwrap_or(""))
            .or_else(|| v.get("source").and_then(Value::as_str))
            .unwrap_or("");
        source.ends_with("docker.sock")
    })
}

fn lacks_resource_limits(service: &Value) -> bool {
    let has_deploy_limits = service
        .get("deploy")
        .and_then(|d| d.get("resources"))
        .and_then(|r| r.get("limits"))
        .is_some();
    let has_legacy_limits = service.get("mem_limit").is_some() || service.get("cpus").is_some();
    !has_deploy_limits && !has_legacy_limits
}

fn uses_mutable_image(service: &Value) -> bool {
    match str_field(service, "image") {
        Some(image) => image_tag_is_mutable(image),
        // No image means the service is built from a local context; the
        // Dockerfile check covers its base image.
        None => false,
    }
}

fn has_inline_secret(service: &Value) -> bool {
    let Some(env) = service.get("environment") else {
        return false;
    };
    match env {
        // List form: ["KEY=value", …]
        Value::Sequence(entries) => entries
            .iter()
            .filter_map(Value::as_str)
            .any(|e| RE_SECRET.is_match(e)),
        // Map form: {KEY: value, …}
        Value::Mapping(map) => map.iter().any(|(k, v)| {
            let (Some(key), Some(val)) = (k.as_str(), yaml_scalar_to_string(v)) else {
                return false;
            };
            RE_SECRET.is_match(&format!("{key}={val}"))
        }),
        _ => false,
    }
}

fn yaml_scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lacks_healthcheck(service: &Value) -> bool {
    service.get("healthcheck").is_none()
}

struct ComposeRule {
    id: &'static str,
    category: IssueCategory,
    message: &'static str,
    remediation: &'static str,
    violates: fn(&Value) -> bool,
}

static RULES: &[ComposeRule] = &[
    ComposeRule {
        id: "compose/CP-001",
        category: IssueCategory::Critical,
        message: "Service runs privileged",
        remediation: "Drop privileged mode; grant individual capabilities with cap_add instead",
        violates: is_privileged,
    },
    ComposeRule {
        id: "compose/CP-002",
        category: IssueCategory::Critical,
        message: "Service shares a host namespace",
        remediation: "Remove network_mode/pid host sharing; publish individual ports instead",
        violates: shares_host_namespace,
    },
    ComposeRule {
        id: "compose/CP-003",
        category: IssueCategory::Warning,
        message: "Docker socket mounted into the service",
        remediation: "Mounting /var/run/docker.sock grants host-level control; use a scoped API proxy",
        violates: mounts_docker_socket,
    },
    ComposeRule {
        id: "compose/CP-004",
        category: IssueCategory::Warning,
        message: "No resource limits configured",
        remediation: "Set deploy.resources.limits (or mem_limit/cpus) to contain runaway services",
        violates: lacks_resource_limits,
    },
    ComposeRule {
        id: "compose/CP-005",
        category: IssueCategory::Warning,
        message: "Image uses a mutable tag",
        remediation: "Pin the image to a version tag or digest",
        violates: uses_mutable_image,
    },
    ComposeRule {
        id: "compose/CP-006",
        category: IssueCategory::Warning,
        message: "Secret-looking value in inline environment",
        remediation: "Move secrets to an env_file or a secrets block",
        violates: has_inline_secret,
    },
    ComposeRule {
        id: "compose/CP-007",
        category: IssueCategory::Suggestion,
        message: "No healthcheck configured",
        remediation: "Add a healthcheck so compose can restart a wedged service",
        violates: lacks_healthcheck,
    },
];

/// Runs the compose rule table against the file at `path`.
///
/// Services are visited in document order and rules in table order, so the
/// issue list is deterministic for a given file.
pub fn check(path: &Path) -> FileAnalysis {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            return FileAnalysis::failed(path, FileKind::Compose, format!("Failed to read compose file: {e}"))
        }
    };

    let doc: Value = match serde_yaml::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            return FileAnalysis::failed(path, FileKind::Compose, format!("Malformed YAML: {e}"))
        }
    };

    let Some(services) = doc.get("services").and_then(Value::as_mapping) else {
        return FileAnalysis::failed(path, FileKind::Compose, "No top-level `services` mapping");
    };

    let mut issues = Vec::new();
    for (name, service) in services {
        let service_name = name.as_str().unwrap_or("<unnamed>");
        for rule in RULES {
            if (rule.violates)(service) {
                issues.push(Issue {
                    rule_id: rule.id.to_string(),
                    category: rule.category,
                    message: rule.message.to_string(),
                    recommendation: rule.remediation.to_string(),
                    location: Some(format!("service: {service_name}")),
                });
            }
        }
    }

    FileAnalysis::clean(path, FileKind::Compose, issues)
}

/// Returns the [`RuleInfo`] catalogue for the compose check.
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
            check: "compose",
            message: r.message,
            remediation: r.remediation,
        })
        .collect()
}
