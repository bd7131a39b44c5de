//! Report assembly and rendering.
//!
//! [`Report`] is the document model: findings, metrics, and free-text
//! summaries accumulated through `add_*` calls. Rendering never mutates the
//! model, and identical content renders to identical text (the embedded
//! severity chart's own encoding is the only accepted source of variation).
//!
//! Four formats are supported:
//!
//! | Format | Module | Notes |
//! |--------|--------|-------|
//! | Markdown | [`markdown`] | chart embedded as base64 image data |
//! | HTML | [`html`] | Bootstrap stylesheet reference + inline chart |
//! | PDF | [`pdf`] | capability-checked renderer chain over the HTML |
//! | JSON | [`json`] | structural dump, the only chart-exempt format |
//!
//! Output files are written only after the full document has been assembled
//! in memory; the PDF path additionally renders into a temp file and persists
//! it on success so a failing renderer never leaves a truncated artifact.

pub mod chart;
pub mod html;
pub mod json;
pub mod markdown;
pub mod pdf;

use crate::finding::{Finding, Severity};
use crate::i18n::Translations;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors surfaced by the report assembler and its renderers.
///
/// Collectors convert their failures in-band; the assembler is the one
/// boundary that reports errors upward, because the caller decides how to
/// fall back (e.g. keep the HTML export when no PDF renderer exists).
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to render severity chart: {0}")]
    Chart(String),

    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(
        "no PDF renderer available (install weasyprint, wkhtmltopdf, or a chromium-based browser); the HTML export can be converted manually"
    )]
    NoPdfRenderer,

    #[error("{renderer} failed: {detail}")]
    Renderer {
        renderer: &'static str,
        detail: String,
    },
}

/// A metric value: integer, float, or free text.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{v}"),
            MetricValue::Float(v) => write!(f, "{v}"),
            MetricValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Integer(v)
    }
}

impl From<usize> for MetricValue {
    fn from(v: usize) -> Self {
        MetricValue::Integer(v as i64)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        MetricValue::Text(v.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        MetricValue::Text(v)
    }
}

/// Section names with a fixed position in the rendered document.
///
/// Any other summary section is rendered after the findings, in name order.
pub(crate) const EXECUTIVE_SUMMARY: &str = "executive_summary";
pub(crate) const RECOMMENDATIONS: &str = "recommendations";
pub(crate) const NEXT_STEPS: &str = "next_steps";

/// The report document model.
///
/// Built incrementally via [`add_finding`](Report::add_finding),
/// [`add_metric`](Report::add_metric), and [`add_summary`](Report::add_summary),
/// then rendered. The finding sequence preserves insertion order; metrics and
/// summaries are keyed maps where the last write wins.
#[derive(Debug, serde::Serialize)]
pub struct Report {
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub locale: String,
    pub findings: Vec<Finding>,
    pub metrics: BTreeMap<String, MetricValue>,
    pub summaries: BTreeMap<String, String>,
}

impl Report {
    pub fn new(project_name: impl Into<String>, locale: impl Into<String>) -> Self {
        Report {
            project_name: project_name.into(),
            created_at: Utc::now(),
            locale: locale.into(),
            findings: Vec::new(),
            metrics: BTreeMap::new(),
            summaries: BTreeMap::new(),
        }
    }

    /// Appends a finding. Findings are never reordered or dropped.
    pub fn add_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Records a named metric; a repeated name overwrites the earlier value.
    pub fn add_metric(&mut self, name: impl Into<String>, value: impl Into<MetricValue>) {
        self.metrics.insert(name.into(), value.into());
    }

    /// Records a named free-text section; a repeated name overwrites it.
    pub fn add_summary(&mut self, section: impl Into<String>, content: impl Into<String>) {
        self.summaries.insert(section.into(), content.into());
    }

    /// Findings of one severity, in insertion order.
    pub fn findings_with(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    /// Finding counts per severity bucket, in [`Severity::ALL`] order.
    pub fn severity_counts(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for finding in &self.findings {
            match finding.severity {
                Severity::Critical => counts[0] += 1,
                Severity::High => counts[1] += 1,
                Severity::Medium => counts[2] += 1,
                Severity::Low => counts[3] += 1,
            }
        }
        counts
    }

    /// Writes the Markdown export to `path`.
    pub fn write_markdown(&self, path: &Path, t: &Translations) -> Result<(), ReportError> {
        let text = markdown::render(self, t)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Writes the HTML export to `path`.
    pub fn write_html(&self, path: &Path, t: &Translations) -> Result<(), ReportError> {
        let text = html::render(self, t)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Writes the JSON export to `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let text = json::render(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Writes the PDF export to `path` through the renderer chain.
    ///
    /// Returns the name of the renderer that produced the file. Fails with
    /// [`ReportError::NoPdfRenderer`] when the chain is empty of available
    /// renderers; in that case no file is created.
    pub fn write_pdf(&self, path: &Path, t: &Translations) -> Result<&'static str, ReportError> {
        let html = html::render(self, t)?;
        pdf::render_pdf(&html, path)
    }

    /// Writes every export format into `dir` (created if missing).
    ///
    /// Markdown, HTML, and JSON failures abort; the PDF result is carried in
    /// the outcome so the caller can fall back to the HTML file that was
    /// already written.
    pub fn write_all(&self, dir: &Path, t: &Translations) -> Result<ExportOutcome, ReportError> {
        std::fs::create_dir_all(dir)?;

        let markdown = dir.join("report.md");
        let html = dir.join("report.html");
        let json = dir.join("report.json");
        let pdf_path = dir.join("report.pdf");

        self.write_markdown(&markdown, t)?;
        self.write_html(&html, t)?;
        self.write_json(&json)?;
        let pdf = self.write_pdf(&pdf_path, t).map(|_| pdf_path);

        Ok(ExportOutcome {
            markdown,
            html,
            json,
            pdf,
        })
    }
}

/// Result of a full [`Report::write_all`] export.
#[derive(Debug)]
pub struct ExportOutcome {
    pub markdown: PathBuf,
    pub html: PathBuf,
    pub json: PathBuf,
    /// `Err` when no PDF renderer was available or the chosen one failed;
    /// the HTML export above stands in as the fallback.
    pub pdf: Result<PathBuf, ReportError>,
}
