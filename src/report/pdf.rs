//! PDF export via an ordered chain of capability-checked renderers.
//!
//! There is no maintained in-process HTML→PDF library in the Rust ecosystem,
//! so every strategy shells out: the `weasyprint` CLI, then `wkhtmltopdf`,
//! then a headless Chromium-family browser with `--print-to-pdf`. The first
//! *available* renderer is the only one tried — it succeeds or the export
//! fails, atomically: rendering goes into a temp file that is persisted onto
//! the destination only on success.
//!
//! When nothing in the chain is installed the export fails with the
//! recoverable [`ReportError::NoPdfRenderer`]; callers keep the HTML export
//! as the fallback.

use crate::collectors::which_exists;
use crate::report::ReportError;
use std::path::Path;
use std::process::Command;

/// One HTML→PDF rendering strategy.
pub trait PdfRenderer {
    fn name(&self) -> &'static str;

    /// Returns `true` when the strategy's external binary is installed.
    fn is_available(&self) -> bool;

    /// Renders `html_path` (a file on disk) into `output`.
    fn render(&self, html_path: &Path, output: &Path) -> Result<(), ReportError>;
}

fn run_renderer(name: &'static str, cmd: &mut Command) -> Result<(), ReportError> {
    let output = cmd.output().map_err(|e| ReportError::Renderer {
        renderer: name,
        detail: e.to_string(),
    })?;
    if output.status.success() {
        Ok(())
    } else {
        Err(ReportError::Renderer {
            renderer: name,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// `weasyprint <input.html> <output.pdf>`.
pub struct WeasyPrintRenderer;

impl PdfRenderer for WeasyPrintRenderer {
    fn name(&self) -> &'static str {
        "weasyprint"
    }

    fn is_available(&self) -> bool {
        which_exists("weasyprint")
    }

    fn render(&self, html_path: &Path, output: &Path) -> Result<(), ReportError> {
        run_renderer(
            self.name(),
            Command::new("weasyprint").arg(html_path).arg(output),
        )
    }
}

/// `wkhtmltopdf <input.html> <output.pdf>`.
pub struct WkhtmltopdfRenderer;

impl PdfRenderer for WkhtmltopdfRenderer {
    fn name(&self) -> &'static str {
        "wkhtmltopdf"
    }

    fn is_available(&self) -> bool {
        which_exists("wkhtmltopdf")
    }

    fn render(&self, html_path: &Path, output: &Path) -> Result<(), ReportError> {
        run_renderer(
            self.name(),
            Command::new("wkhtmltopdf").arg(html_path).arg(output),
        )
    }
}

const BROWSER_BINARIES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "chrome",
    "msedge",
];

/// Headless Chromium-family browser with `--print-to-pdf`.
pub struct HeadlessBrowserRenderer;

impl HeadlessBrowserRenderer {
    fn binary() -> Option<&'static str> {
        BROWSER_BINARIES.iter().copied().find(|b| which_exists(b))
    }
}

impl PdfRenderer for HeadlessBrowserRenderer {
    fn name(&self) -> &'static str {
        "headless-browser"
    }

    fn is_available(&self) -> bool {
        Self::binary().is_some()
    }

    fn render(&self, html_path: &Path, output: &Path) -> Result<(), ReportError> {
        let Some(binary) = Self::binary() else {
            return Err(ReportError::Renderer {
                renderer: self.name(),
                detail: "no chromium-based browser found".to_string(),
            });
        };
        let url = format!("file://{}", html_path.display());
        run_renderer(
            self.name(),
            Command::new(binary)
                .arg("--headless")
                .arg("--disable-gpu")
                .arg("--no-sandbox")
                .arg(format!("--print-to-pdf={}", output.display()))
                .arg(url),
        )
    }
}

/// The renderer chain in priority order.
pub fn renderers() -> Vec<Box<dyn PdfRenderer>> {
    vec![
        Box::new(WeasyPrintRenderer),
        Box::new(WkhtmltopdfRenderer),
        Box::new(HeadlessBrowserRenderer),
    ]
}

/// Renders `html` to a PDF at `output` using the default chain.
///
/// Returns the name of the renderer that produced the file.
pub fn render_pdf(html: &str, output: &Path) -> Result<&'static str, ReportError> {
    render_with(&renderers(), html, output)
}

/// Renders `html` to `output` with an explicit chain.
///
/// The first renderer reporting itself available is selected; its failure is
/// final (no cascading past an installed-but-broken tool). The PDF is
/// produced in a temp file next to `output` and persisted only on success,
/// so a failed render leaves no partial artifact.
pub fn render_with(
    chain: &[Box<dyn PdfRenderer>],
    html: &str,
    output: &Path,
) -> Result<&'static str, ReportError> {
    let Some(renderer) = chain.iter().find(|r| r.is_available()) else {
        return Err(ReportError::NoPdfRenderer);
    };
    tracing::info!("rendering PDF via {}", renderer.name());

    let html_file = tempfile::Builder::new().suffix(".html").tempfile()?;
    std::fs::write(html_file.path(), html)?;

    let dir = output.parent().filter(|p| !p.as_os_str().is_empty());
    let pdf_tmp = match dir {
        Some(dir) => tempfile::Builder::new().suffix(".pdf").tempfile_in(dir)?,
        None => tempfile::Builder::new().suffix(".pdf").tempfile()?,
    };
    let pdf_path = pdf_tmp.into_temp_path();

    renderer.render(html_file.path(), &pdf_path)?;
    pdf_path
        .persist(output)
        .map_err(|e| ReportError::Io(e.error))?;
    Ok(renderer.name())
}
