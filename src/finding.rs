use std::fmt;
use std::path::PathBuf;

/// Report finding severity, ordered from most to least severe.
///
/// Rendering always groups findings in this fixed order; within a group the
/// original insertion order is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// All severities in rendering order.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One security observation destined for a report.
///
/// Immutable once added; the report owns it exclusively.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    pub tool: String,
    pub location: String,
    pub confidence: String,
    pub references: Vec<String>,
}

impl Finding {
    /// Creates a finding with the default `"MEDIUM"` confidence and no
    /// references.
    pub fn new(
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
        tool: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Finding {
            severity,
            title: title.into(),
            description: description.into(),
            recommendation: recommendation.into(),
            tool: tool.into(),
            location: location.into(),
            confidence: "MEDIUM".to_string(),
            references: Vec::new(),
        }
    }
}

/// Issue category emitted by the heuristic file checks.
///
/// Distinct from [`Severity`]: heuristics speak in critical/warning/suggestion
/// and are only mapped onto report severities when folded into a report via
/// [`Issue::to_finding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Critical,
    Warning,
    Suggestion,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueCategory::Critical => write!(f, "critical"),
            IssueCategory::Warning => write!(f, "warning"),
            IssueCategory::Suggestion => write!(f, "suggestion"),
        }
    }
}

impl IssueCategory {
    /// Folds a heuristic category into a report severity.
    ///
    /// `High` is reserved for findings promoted from external scanner output;
    /// no heuristic rule maps to it.
    pub fn severity(&self) -> Severity {
        match self {
            IssueCategory::Critical => Severity::Critical,
            IssueCategory::Warning => Severity::Medium,
            IssueCategory::Suggestion => Severity::Low,
        }
    }
}

/// One issue raised by a heuristic rule.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    /// Rule identifier (e.g., `"dockerfile/DF-001"`).
    pub rule_id: String,
    pub category: IssueCategory,
    pub message: String,
    pub recommendation: String,
    /// Where the issue was observed (`"line 4"`, `"service: web"`, …).
    pub location: Option<String>,
}

impl Issue {
    /// Converts the issue into a report [`Finding`], attributing it to the
    /// named check.
    pub fn to_finding(&self, tool: &str, file: &std::path::Path) -> Finding {
        let location = match &self.location {
            Some(loc) => format!("{} ({loc})", file.display()),
            None => file.display().to_string(),
        };
        Finding {
            severity: self.category.severity(),
            title: self.message.clone(),
            description: format!("{} flagged rule {}", tool, self.rule_id),
            recommendation: self.recommendation.clone(),
            tool: tool.to_string(),
            location,
            confidence: "MEDIUM".to_string(),
            references: Vec::new(),
        }
    }
}

/// Kind of configuration file a heuristic check understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Dockerfile,
    Compose,
    Manifest,
    Policy,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Dockerfile => write!(f, "Dockerfile"),
            FileKind::Compose => write!(f, "compose file"),
            FileKind::Manifest => write!(f, "manifest"),
            FileKind::Policy => write!(f, "policy"),
        }
    }
}

/// Result of one heuristic file check.
///
/// Never constructed through a failing path: malformed or unreadable input is
/// recorded in [`error`](FileAnalysis::error) and the issue list stays empty.
/// Issue order follows rule-table order, so identical input always produces
/// identical output.
#[derive(Debug, serde::Serialize)]
pub struct FileAnalysis {
    pub path: PathBuf,
    pub kind: FileKind,
    pub issues: Vec<Issue>,
    pub error: Option<String>,
}

impl FileAnalysis {
    pub fn clean(path: &std::path::Path, kind: FileKind, issues: Vec<Issue>) -> Self {
        FileAnalysis {
            path: path.to_path_buf(),
            kind,
            issues,
            error: None,
        }
    }

    pub fn failed(path: &std::path::Path, kind: FileKind, error: impl Into<String>) -> Self {
        FileAnalysis {
            path: path.to_path_buf(),
            kind,
            issues: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn issues_in(&self, category: IssueCategory) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    /// Count issues per category in a single pass.
    ///
    /// Returns `(critical, warnings, suggestions)`.
    pub fn count_by_category(&self) -> (usize, usize, usize) {
        self.issues
            .iter()
            .fold((0, 0, 0), |(c, w, s), i| match i.category {
                IssueCategory::Critical => (c + 1, w, s),
                IssueCategory::Warning => (c, w + 1, s),
                IssueCategory::Suggestion => (c, w, s + 1),
            })
    }
}

/// Outcome class of an external tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStatus {
    /// The tool ran to completion; `output` holds its stdout (or stderr when
    /// stdout was empty).
    Completed,
    /// The tool binary was not found on `PATH`.
    ToolMissing,
    /// The tool was killed after exceeding its timeout.
    TimedOut,
    /// The tool could not be spawned or its output could not be read.
    Failed,
}

/// Raw text captured from one external scanner run.
///
/// Collectors never raise past their boundary: every failure mode is encoded
/// in [`status`](ScanCapture::status) with a tagged message in `output`.
#[derive(Debug, serde::Serialize)]
pub struct ScanCapture {
    pub tool: String,
    pub target: String,
    pub status: CaptureStatus,
    pub output: String,
    pub duration_ms: u64,
}

impl ScanCapture {
    pub fn tool_missing(tool: &str, target: &str, hint: &str) -> Self {
        ScanCapture {
            tool: tool.to_string(),
            target: target.to_string(),
            status: CaptureStatus::ToolMissing,
            output: format!("[{tool} not found on PATH. {hint}]"),
            duration_ms: 0,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == CaptureStatus::Completed
    }
}
