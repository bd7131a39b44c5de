//! Work-plan reading.
//!
//! The DevSecOps work plan is a PDF whose text is extracted and either
//! printed (`read-plan`) or summarized into the unified report. Per the
//! collector contract, nothing here fails outward: a missing or unreadable
//! plan becomes a tagged in-band message.

use std::path::Path;

/// Extracts the work plan's text, or a tagged message when it cannot be read.
pub fn read_plan(path: &Path) -> String {
    if !path.exists() {
        return format!(
            "[Work plan not found at {}. Place the PDF there or point [paths].plan at it]",
            path.display()
        );
    }
    match pdf_extract::extract_text(path) {
        Ok(text) if text.trim().is_empty() => {
            format!("[Work plan {} contains no extractable text]", path.display())
        }
        Ok(text) => text,
        Err(e) => format!("[Error reading work plan {}: {e}]", path.display()),
    }
}

/// Truncates `text` to at most `limit` characters on a char boundary.
///
/// Used when folding the plan (or a scan capture) into a report section so a
/// large document cannot dominate the output.
pub fn excerpt(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
