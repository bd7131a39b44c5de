//! HTML report renderer.
//!
//! Mirrors the Markdown section order inside a Bootstrap-styled page. The
//! severity chart is embedded inline as base64 image data, so the document
//! is self-contained apart from the stylesheet reference.

use crate::finding::Severity;
use crate::i18n::Translations;
use crate::report::{chart, Report, ReportError, EXECUTIVE_SUMMARY, NEXT_STEPS, RECOMMENDATIONS};

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css";

/// Minimal HTML escaping for text interpolated into the document body.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders the report as a standalone HTML document.
pub fn render(report: &Report, t: &Translations) -> Result<String, ReportError> {
    let locale = report.locale.as_str();
    let label = |key| t.label(locale, key);
    let chart_b64 = chart::severity_chart_base64(report)?;
    let mut body: Vec<String> = Vec::new();

    body.push(format!(
        "<h1>{}: {}</h1>",
        escape(label("report_title")),
        escape(&report.project_name)
    ));
    body.push(format!(
        "<p><strong>{}:</strong> {}</p>",
        escape(label("date")),
        report.created_at.format("%d/%m/%Y %H:%M:%S")
    ));

    body.push(format!("<h2>{}</h2>", escape(label(EXECUTIVE_SUMMARY))));
    if let Some(summary) = report.summaries.get(EXECUTIVE_SUMMARY) {
        body.push(format!("<p>{}</p>", escape(summary)));
    }

    body.push(format!("<h2>{}</h2>", escape(label("metrics"))));
    if !report.metrics.is_empty() {
        body.push("<ul>".to_string());
        for (name, value) in &report.metrics {
            body.push(format!(
                "<li><strong>{}:</strong> {}</li>",
                escape(name),
                escape(&value.to_string())
            ));
        }
        body.push("</ul>".to_string());
    }

    body.push(format!("<h2>{}</h2>", escape(label("severity_analysis"))));
    body.push(format!(
        "<img src=\"data:image/png;base64,{chart_b64}\" alt=\"{}\" style=\"max-width:100%\"/>",
        escape(label("severity_analysis"))
    ));

    for severity in Severity::ALL {
        let group: Vec<_> = report.findings_with(severity).collect();
        if group.is_empty() {
            continue;
        }
        body.push(format!(
            "<h3>{} {}</h3>",
            severity.label(),
            escape(label("findings"))
        ));
        for (i, finding) in group.iter().enumerate() {
            body.push(format!("<h4>{}. {}</h4>", i + 1, escape(&finding.title)));
            body.push(format!(
                "<p><strong>{}:</strong> {}</p>",
                escape(label("description")),
                escape(&finding.description)
            ));
            body.push(format!(
                "<p><strong>{}:</strong> {} — <strong>{}:</strong> {}</p>",
                escape(label("tool")),
                escape(&finding.tool),
                escape(label("location")),
                escape(&finding.location)
            ));
            body.push(format!(
                "<p><strong>{}:</strong> {}</p>",
                escape(label("recommendation")),
                escape(&finding.recommendation)
            ));
            if !finding.references.is_empty() {
                body.push(format!(
                    "<p><strong>{}:</strong></p><ul>",
                    escape(label("references"))
                ));
                for r in &finding.references {
                    let r = escape(r);
                    body.push(format!("<li><a href=\"{r}\">{r}</a></li>"));
                }
                body.push("</ul>".to_string());
            }
        }
    }

    for (name, content) in &report.summaries {
        if matches!(name.as_str(), EXECUTIVE_SUMMARY | RECOMMENDATIONS | NEXT_STEPS) {
            continue;
        }
        body.push(format!("<h2>{}</h2>", escape(name)));
        body.push(format!("<pre>{}</pre>", escape(content)));
    }

    if let Some(recommendations) = report.summaries.get(RECOMMENDATIONS) {
        body.push(format!("<h2>{}</h2>", escape(label(RECOMMENDATIONS))));
        body.push(format!("<p>{}</p>", escape(recommendations)));
    }

    if let Some(next_steps) = report.summaries.get(NEXT_STEPS) {
        body.push(format!("<h2>{}</h2>", escape(label(NEXT_STEPS))));
        body.push(format!("<p>{}</p>", escape(next_steps)));
    }

    let body = body.join("\n");
    Ok(format!(
        "<!doctype html>\n\
         <html lang=\"{}\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <link href=\"{BOOTSTRAP_CSS}\" rel=\"stylesheet\">\n\
         <title>{}</title>\n\
         </head>\n\
         <body class=\"container my-4\">\n\
         {body}\n\
         </body>\n\
         </html>\n",
        escape(locale),
        escape(label("report_title")),
    ))
}
