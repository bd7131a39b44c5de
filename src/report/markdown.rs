//! Markdown report renderer.
//!
//! Deterministic: given identical report content the output is byte-identical
//! apart from the embedded chart encoding. Sections are assembled in a fixed
//! order — header, executive summary, metrics, severity chart, findings
//! grouped by severity (insertion order within each group), free-form
//! sections in name order, recommendations, next steps.

use crate::finding::Severity;
use crate::i18n::Translations;
use crate::report::{chart, Report, ReportError, EXECUTIVE_SUMMARY, NEXT_STEPS, RECOMMENDATIONS};

/// Renders the report as a Markdown document.
pub fn render(report: &Report, t: &Translations) -> Result<String, ReportError> {
    let locale = report.locale.as_str();
    let label = |key| t.label(locale, key);
    let mut sections: Vec<String> = Vec::new();

    sections.push(format!(
        "# {}: {}",
        label("report_title"),
        report.project_name
    ));
    sections.push(format!(
        "{}: {}",
        label("date"),
        report.created_at.format("%d/%m/%Y %H:%M:%S")
    ));

    sections.push(format!("## 📊 {}", label(EXECUTIVE_SUMMARY)));
    if let Some(summary) = report.summaries.get(EXECUTIVE_SUMMARY) {
        sections.push(summary.clone());
    }

    sections.push(format!("## 📈 {}", label("metrics")));
    for (name, value) in &report.metrics {
        sections.push(format!("- **{name}**: {value}"));
    }

    sections.push(format!("## 📊 {}", label("severity_analysis")));
    let chart_b64 = chart::severity_chart_base64(report)?;
    sections.push(format!(
        "![{}](data:image/png;base64,{chart_b64})",
        label("severity_analysis")
    ));

    for severity in Severity::ALL {
        let group: Vec<_> = report.findings_with(severity).collect();
        if group.is_empty() {
            continue;
        }
        sections.push(format!("## {} {}", severity.label(), label("findings")));
        for (i, finding) in group.iter().enumerate() {
            sections.push(format!("### {}. {}", i + 1, finding.title));
            sections.push(format!("- **{}**: {}", label("description"), finding.description));
            sections.push(format!("- **{}**: {}", label("tool"), finding.tool));
            sections.push(format!("- **{}**: {}", label("location"), finding.location));
            sections.push(format!(
                "- **{}**: {}",
                label("recommendation"),
                finding.recommendation
            ));
            if !finding.references.is_empty() {
                let mut refs = format!("- **{}**:", label("references"));
                for r in &finding.references {
                    refs.push_str(&format!("\n  - {r}"));
                }
                sections.push(refs);
            }
        }
    }

    // Free-form sections (scan captures, plan excerpts, …) in name order.
    for (name, content) in &report.summaries {
        if matches!(name.as_str(), EXECUTIVE_SUMMARY | RECOMMENDATIONS | NEXT_STEPS) {
            continue;
        }
        sections.push(format!("## {name}"));
        sections.push(content.clone());
    }

    if let Some(recommendations) = report.summaries.get(RECOMMENDATIONS) {
        sections.push(format!("## 💡 {}", label(RECOMMENDATIONS)));
        sections.push(recommendations.clone());
    }

    if let Some(next_steps) = report.summaries.get(NEXT_STEPS) {
        sections.push(format!("## 🎯 {}", label(NEXT_STEPS)));
        sections.push(next_steps.clone());
    }

    let mut out = sections.join("\n\n");
    out.push('\n');
    Ok(out)
}
