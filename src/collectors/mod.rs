//! Collectors: external scanner wrappers and heuristic file checks.
//!
//! Two families share this module:
//!
//! - **External tool collectors** implementing [`ToolCollector`]: [`sast`]
//!   (bandit), [`container`] (trivy), [`dast`] (OWASP ZAP via docker). Each
//!   invokes one binary with a fixed argument template and passes its text
//!   output through unmodified.
//! - **Heuristic file checks** driven by per-module rule tables: [`dockerfile`],
//!   [`compose`], [`manifest`], [`policy`]. Pure, idempotent inspections of a
//!   file's text or parsed structure.
//!
//! Both families share one contract: **no failure escapes the collector
//! boundary.** Missing tools, timeouts, and malformed input become tagged
//! in-band messages or an `error` entry in the structured result.

pub mod compose;
pub mod container;
pub mod dast;
pub mod dockerfile;
pub mod manifest;
pub mod policy;
pub mod sast;

use crate::config::Config;
use crate::finding::{CaptureStatus, FileAnalysis, FileKind, ScanCapture};
use regex::Regex;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use std::time::{Duration, Instant};

// Fixed secret patterns shared by the Dockerfile, compose, and manifest
// checks. Matched case-insensitively against raw assignment text, so values
// inside comments are flagged too — a known limitation of the regex set.
pub(crate) static RE_SECRET: LazyLock<Regex> = LazyLock::new(|| {
    // The leading [a-z0-9_]* accepts prefixed names like DB_PASSWORD, which a
    // bare \b(password…) would miss since '_' is a word character.
    Regex::new(
        r#"(?i)\b[a-z0-9_]*(password|passwd|secret|token|api[_-]?key|access[_-]?key|private[_-]?key)[a-z0-9_]*\s*[:=]\s*["']?[^\s"']{4,}"#,
    )
    .unwrap()
});

/// Returns `true` when an image reference can drift under the same name: no
/// tag, or the `latest` tag. Digest-pinned references are stable.
pub(crate) fn image_tag_is_mutable(image: &str) -> bool {
    if image.contains("@sha256:") {
        return false;
    }
    // A colon after the last slash separates the tag; a colon before it is a
    // registry port (e.g. registry:5000/app).
    let after_registry = image.rsplit('/').next().unwrap_or(image);
    match after_registry.split_once(':') {
        Some((_, tag)) => tag.eq_ignore_ascii_case("latest"),
        None => true,
    }
}

/// An external scanner invoked as an opaque subprocess.
pub trait ToolCollector {
    /// Returns the collector's unique identifier (e.g., `"sast"`).
    fn name(&self) -> &'static str;

    /// Returns a short, human-readable description of the collector.
    fn description(&self) -> &'static str;

    /// Returns `true` if the collector's external binary is installed.
    fn is_available(&self) -> bool;

    /// Executes the scan against `target` (a path, image name, or URL).
    ///
    /// Never fails: every error mode is folded into the returned
    /// [`ScanCapture`].
    fn scan(&self, target: &str, config: &Config) -> ScanCapture;
}

/// Returns every registered [`ToolCollector`] implementation.
///
/// The returned order is the execution order used by report generation;
/// collectors run sequentially.
pub fn all_collectors() -> Vec<Box<dyn ToolCollector>> {
    vec![
        Box::new(sast::SastCollector),
        Box::new(container::ContainerCollector),
        Box::new(dast::DastCollector),
    ]
}

/// Returns `true` if an executable named `cmd` exists on `PATH`.
///
/// On Unix the file must also have an executable permission bit set.
/// Used by tool collectors and PDF renderers to implement availability checks.
pub fn which_exists(cmd: &str) -> bool {
    std::env::var_os("PATH")
        .map(|path| {
            std::env::split_paths(&path).any(|dir| {
                let candidate = dir.join(cmd);
                if !candidate.is_file() {
                    return false;
                }
                // Also verify the file is executable; a non-executable binary on
                // PATH would appear available but fail at runtime.
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    std::fs::metadata(&candidate)
                        .map(|m| m.permissions().mode() & 0o111 != 0)
                        .unwrap_or(false)
                }
                #[cfg(not(unix))]
                {
                    true
                }
            })
        })
        .unwrap_or(false)
}

/// Runs `bin` with `args`, bounded by `timeout`.
///
/// The child is spawned with piped output and polled in 100 ms increments;
/// when the ceiling is reached it is killed and a tagged timeout capture is
/// returned. The capture's payload is the child's stdout, or stderr when
/// stdout is empty — the text is passed through unmodified.
pub fn run_tool(tool: &str, target: &str, bin: &str, args: &[&str], timeout: Duration) -> ScanCapture {
    let start = Instant::now();

    let mut child = match Command::new(bin)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(c) => c,
        Err(e) => {
            return ScanCapture {
                tool: tool.to_string(),
                target: target.to_string(),
                status: CaptureStatus::Failed,
                output: format!("[Failed to run {bin}: {e}]"),
                duration_ms: start.elapsed().as_millis() as u64,
            };
        }
    };

    let poll_interval = Duration::from_millis(100);
    loop {
        match child.try_wait() {
            Ok(Some(_)) => break,
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return ScanCapture {
                        tool: tool.to_string(),
                        target: target.to_string(),
                        status: CaptureStatus::TimedOut,
                        output: format!(
                            "[{tool} timed out after {}s scanning {target}]",
                            timeout.as_secs()
                        ),
                        duration_ms: start.elapsed().as_millis() as u64,
                    };
                }
                std::thread::sleep(poll_interval);
            }
            Err(e) => {
                return ScanCapture {
                    tool: tool.to_string(),
                    target: target.to_string(),
                    status: CaptureStatus::Failed,
                    output: format!("[Failed to wait for {bin}: {e}]"),
                    duration_ms: start.elapsed().as_millis() as u64,
                };
            }
        }
    }

    let output = match child.wait_with_output() {
        Ok(o) => o,
        Err(e) => {
            return ScanCapture {
                tool: tool.to_string(),
                target: target.to_string(),
                status: CaptureStatus::Failed,
                output: format!("[Failed to read {bin} output: {e}]"),
                duration_ms: start.elapsed().as_millis() as u64,
            };
        }
    };

    // Scanners exit non-zero when they find issues; that is expected and the
    // payload is still the report text.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload = if stdout.trim().is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        stdout.into_owned()
    };

    ScanCapture {
        tool: tool.to_string(),
        target: target.to_string(),
        status: CaptureStatus::Completed,
        output: payload,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Guesses the heuristic check responsible for a file.
///
/// `Dockerfile` (any `Dockerfile*` basename) → Dockerfile check; `*.rego` →
/// policy check; YAML with a top-level `services:` mapping → compose check;
/// other YAML/JSON → manifest check. Returns `None` for anything else.
pub fn detect_kind(path: &Path) -> Option<FileKind> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();
    if name.starts_with("dockerfile") || name.ends_with(".dockerfile") {
        return Some(FileKind::Dockerfile);
    }
    if name.ends_with(".rego") {
        return Some(FileKind::Policy);
    }
    if name.ends_with(".yml") || name.ends_with(".yaml") {
        // Compose files are YAML documents with a top-level `services` map;
        // resolving that needs a peek at the content.
        if let Ok(text) = std::fs::read_to_string(path) {
            if compose::looks_like_compose(&text) {
                return Some(FileKind::Compose);
            }
        }
        return Some(FileKind::Manifest);
    }
    if name.ends_with(".json") {
        return Some(FileKind::Manifest);
    }
    None
}

/// Runs the heuristic check matching the file's kind.
///
/// Returns `None` when no check understands the file. All check-level
/// failures (unreadable file, malformed YAML/JSON) surface as the analysis'
/// `error` field.
pub fn analyze_path(path: &Path) -> Option<FileAnalysis> {
    match detect_kind(path)? {
        FileKind::Dockerfile => Some(dockerfile::check(path)),
        FileKind::Compose => Some(compose::check(path)),
        FileKind::Manifest => Some(manifest::check(path)),
        FileKind::Policy => Some(policy::check(path)),
    }
}

/// Metadata for a single heuristic rule.
///
/// Returned by [`all_rules`] and used by the `list-rules` and `explain`
/// CLI commands. Each heuristic module exposes a `rules()` function that
/// returns a `Vec<RuleInfo>`.
pub struct RuleInfo {
    /// Unique rule identifier (e.g., `"dockerfile/DF-001"`).
    pub id: &'static str,
    /// Issue category as a string (`"critical"`, `"warning"`, `"suggestion"`).
    pub category: &'static str,
    /// Check that raises this rule.
    pub check: &'static str,
    /// Short description of what the rule detects.
    pub message: &'static str,
    /// Guidance on how to fix a violation.
    pub remediation: &'static str,
}

/// Aggregates [`RuleInfo`] from every heuristic module.
pub fn all_rules() -> Vec<RuleInfo> {
    let mut rules = Vec::new();
    rules.extend(dockerfile::rules());
    rules.extend(compose::rules());
    rules.extend(manifest::rules());
    rules.extend(policy::rules());
    rules
}
