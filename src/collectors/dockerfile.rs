//! Dockerfile heuristics.
//!
//! A built-in check — no external tool required. The Dockerfile is parsed
//! into an instruction list and evaluated against a fixed rule table; every
//! rule is a pure predicate, so running the check twice on an unchanged file
//! yields identical output.
//!
//! # Rules
//!
//! | ID | Category | What it checks |
//! |----|----------|----------------|
//! | `dockerfile/DF-001` | critical | Final `USER` is root (or no `USER` at all) |
//! | `dockerfile/DF-002` | critical | `RUN` pipes a remote download into a shell |
//! | `dockerfile/DF-003` | warning | Mutable base-image tag (`:latest` or untagged) |
//! | `dockerfile/DF-004` | warning | Secret-looking assignment in the file |
//! | `dockerfile/DF-005` | warning | `ADD` fetching a remote URL |
//! | `dockerfile/DF-006` | warning | `sudo` inside `RUN` |
//! | `dockerfile/DF-007` | suggestion | No `HEALTHCHECK` instruction |
//! | `dockerfile/DF-008` | suggestion | No `COPY` instruction |
//! | `dockerfile/DF-009` | suggestion | apt cache not cleaned after install |
//!
//! The secret rule (`DF-004`) scans raw lines, so it also matches inside
//! comments. That is a known limitation of the fixed regex set and is kept
//! deliberately; see `list-rules` for the remediation text.

use crate::collectors::{image_tag_is_mutable, RuleInfo, RE_SECRET};
use crate::finding::{FileAnalysis, FileKind, Issue, IssueCategory};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// One Dockerfile instruction with its 1-indexed source line.
struct Instruction {
    keyword: String,
    args: String,
    line: usize,
}

/// Parsed view of a Dockerfile handed to every rule predicate.
struct DockerfileView {
    lines: Vec<String>,
    instructions: Vec<Instruction>,
}

/// Parses a Dockerfile into instructions, folding backslash continuations
/// into the instruction that opened them. Comments and blank lines are
/// skipped; parser directives (`# syntax=…`) are comments too.
fn parse(text: &str) -> DockerfileView {
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    let mut instructions: Vec<Instruction> = Vec::new();
    let mut continuing = false;

    for (idx, raw) in lines.iter().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            // A comment inside a continuation does not terminate it.
            continue;
        }

        if continuing {
            if let Some(last) = instructions.last_mut() {
                last.args.push(' ');
                last.args.push_str(trimmed.trim_end_matches('\\').trim());
            }
        } else {
            let (keyword, args) = match trimmed.split_once(char::is_whitespace) {
                Some((kw, rest)) => (kw.to_uppercase(), rest.trim_end_matches('\\').trim().to_string()),
                None => (trimmed.to_uppercase(), String::new()),
            };
            instructions.push(Instruction {
                keyword,
                args,
                line: idx + 1,
            });
        }
        continuing = trimmed.ends_with('\\');
    }

    DockerfileView {
        lines,
        instructions,
    }
}

static RE_PIPE_TO_SHELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(curl|wget|fetch)\b.*\|\s*(bash|sh|zsh)\b").unwrap());

static RE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bhttps?://").unwrap());

static RE_SUDO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bsudo\b").unwrap());

/// Violating source lines for each rule; `None` marks a whole-file violation
/// (an absent instruction has no line to point at).
type RuleHits = Vec<Option<usize>>;

struct DockerRule {
    id: &'static str,
    category: IssueCategory,
    message: &'static str,
    remediation: &'static str,
    check: fn(&DockerfileView) -> RuleHits,
}

fn check_root_user(view: &DockerfileView) -> RuleHits {
    let last_user = view
        .instructions
        .iter()
        .filter(|i| i.keyword == "USER")
        .next_back();
    match last_user {
        None => vec![None],
        Some(user) => {
            let name = user.args.split(':').next().unwrap_or("").trim();
            if name.eq_ignore_ascii_case("root") || name == "0" {
                vec![Some(user.line)]
            } else {
                vec![]
            }
        }
    }
}

fn check_pipe_to_shell(view: &DockerfileView) -> RuleHits {
    view.instructions
        .iter()
        .filter(|i| i.keyword == "RUN" && RE_PIPE_TO_SHELL.is_match(&i.args))
        .map(|i| Some(i.line))
        .collect()
}

fn check_mutable_tag(view: &DockerfileView) -> RuleHits {
    let mut stage_aliases: Vec<String> = Vec::new();
    let mut hits = Vec::new();
    for ins in view.instructions.iter().filter(|i| i.keyword == "FROM") {
        let mut parts = ins.args.split_whitespace();
        let Some(image) = parts.next() else { continue };
        // `FROM build AS test` style references to an earlier stage are not
        // registry pulls.
        let referencing_stage = stage_aliases.iter().any(|a| a.eq_ignore_ascii_case(image));
        if !referencing_stage && !image.eq_ignore_ascii_case("scratch") && image_tag_is_mutable(image)
        {
            hits.push(Some(ins.line));
        }
        if let Some(keyword) = parts.next() {
            if keyword.eq_ignore_ascii_case("as") {
                if let Some(alias) = parts.next() {
                    stage_aliases.push(alias.to_string());
                }
            }
        }
    }
    hits
}

fn check_secrets(view: &DockerfileView) -> RuleHits {
    view.lines
        .iter()
        .enumerate()
        .filter(|(_, line)| RE_SECRET.is_match(line))
        .map(|(idx, _)| Some(idx + 1))
        .collect()
}

fn check_add_url(view: &DockerfileView) -> RuleHits {
    view.instructions
        .iter()
        .filter(|i| i.keyword == "ADD" && RE_URL.is_match(&i.args))
        .map(|i| Some(i.line))
        .collect()
}

fn check_sudo(view: &DockerfileView) -> RuleHits {
    view.instructions
        .iter()
        .filter(|i| i.keyword == "RUN" && RE_SUDO.is_match(&i.args))
        .map(|i| Some(i.line))
        .collect()
}

fn check_healthcheck(view: &DockerfileView) -> RuleHits {
    if view.instructions.iter().any(|i| i.keyword == "HEALTHCHECK") {
        vec![]
    } else {
        vec![None]
    }
}

fn check_copy(view: &DockerfileView) -> RuleHits {
    if view.instructions.iter().any(|i| i.keyword == "COPY") {
        vec![]
    } else {
        vec![None]
    }
}

fn check_apt_cache(view: &DockerfileView) -> RuleHits {
    view.instructions
        .iter()
        .filter(|i| {
            i.keyword == "RUN"
                && i.args.to_lowercase().contains("apt-get install")
                && !i.args.to_lowercase().contains("rm -rf /var/lib/apt/lists")
        })
        .map(|i| Some(i.line))
        .collect()
}

static RULES: &[DockerRule] = &[
    DockerRule {
        id: "dockerfile/DF-001",
        category: IssueCategory::Critical,
        message: "Container runs as root",
        remediation: "Add a dedicated non-root user and switch to it with USER",
        check: check_root_user,
    },
    DockerRule {
        id: "dockerfile/DF-002",
        category: IssueCategory::Critical,
        message: "RUN pipes a remote download into a shell",
        remediation: "Download to a file, verify its checksum, then execute explicitly",
        check: check_pipe_to_shell,
    },
    DockerRule {
        id: "dockerfile/DF-003",
        category: IssueCategory::Warning,
        message: "Base image uses a mutable tag",
        remediation: "Pin the base image to a version tag or digest",
        check: check_mutable_tag,
    },
    DockerRule {
        id: "dockerfile/DF-004",
        category: IssueCategory::Warning,
        message: "Possible secret embedded in the Dockerfile",
        remediation: "Pass secrets at runtime (secret mounts, env files) instead of baking them in",
        check: check_secrets,
    },
    DockerRule {
        id: "dockerfile/DF-005",
        category: IssueCategory::Warning,
        message: "ADD fetches a remote URL",
        remediation: "Use curl/wget with checksum verification in a RUN step",
        check: check_add_url,
    },
    DockerRule {
        id: "dockerfile/DF-006",
        category: IssueCategory::Warning,
        message: "sudo used inside RUN",
        remediation: "Builds already run as root; drop sudo or restructure the stage",
        check: check_sudo,
    },
    DockerRule {
        id: "dockerfile/DF-007",
        category: IssueCategory::Suggestion,
        message: "No HEALTHCHECK instruction",
        remediation: "Add a HEALTHCHECK so orchestrators can detect a wedged container",
        check: check_healthcheck,
    },
    DockerRule {
        id: "dockerfile/DF-008",
        category: IssueCategory::Suggestion,
        message: "No COPY instruction detected",
        remediation: "Check the build context: images usually copy application files in",
        check: check_copy,
    },
    DockerRule {
        id: "dockerfile/DF-009",
        category: IssueCategory::Suggestion,
        message: "apt cache not cleaned after install",
        remediation: "Append `&& rm -rf /var/lib/apt/lists/*` to apt-get install steps",
        check: check_apt_cache,
    },
];

/// Runs the Dockerfile rule table against the file at `path`.
pub fn check(path: &Path) -> FileAnalysis {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            return FileAnalysis::failed(path, FileKind::Dockerfile, format!("Failed to read Dockerfile: {e}"))
        }
    };

    let view = parse(&text);
    let mut issues = Vec::new();
    for rule in RULES {
        for hit in (rule.check)(&view) {
            issues.push(Issue {
                rule_id: rule.id.to_string(),
                category: rule.category,
                message: rule.message.to_string(),
                recommendation: rule.remediation.to_string(),
                location: hit.map(|l| format!("line {l}")),
            });
        }
    }

    FileAnalysis::clean(path, FileKind::Dockerfile, issues)
}

/// Returns the [`RuleInfo`] catalogue for the Dockerfile check.
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
            check: "dockerfile",
            message: r.message,
            remediation: r.remediation,
        })
        .collect()
}
