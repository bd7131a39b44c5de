//! Severity distribution chart.
//!
//! Counts findings per severity bucket and renders a bar chart into an
//! in-memory PNG (plotters bitmap backend), returned base64-encoded for
//! inline embedding in the Markdown and HTML exports.
//!
//! The chart is deliberately text-free — one colored bar per severity on a
//! white canvas — so rendering never depends on system font libraries; the
//! surrounding section heading and the fixed bar order (most severe on the
//! left) carry the labeling. The drawing is fully deterministic for a given
//! report.

use crate::report::{Report, ReportError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use plotters::prelude::*;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 400;

// One bar color per severity, most severe first: darkred, red, orange, gold.
const BAR_COLORS: [RGBColor; 4] = [
    RGBColor(139, 0, 0),
    RGBColor(255, 0, 0),
    RGBColor(255, 165, 0),
    RGBColor(255, 215, 0),
];

/// Renders the severity bar chart as PNG bytes.
pub fn severity_chart_png(report: &Report) -> Result<Vec<u8>, ReportError> {
    let counts = report.severity_counts();
    let max = counts.iter().copied().max().unwrap_or(0).max(1) as f64;

    let mut raw = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut raw, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ReportError::Chart(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(16)
            .build_cartesian_2d(0.0..4.0, 0.0..max * 1.1)
            .map_err(|e| ReportError::Chart(e.to_string()))?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, &count)| {
                Rectangle::new(
                    [
                        (i as f64 + 0.15, 0.0),
                        (i as f64 + 0.85, count as f64),
                    ],
                    BAR_COLORS[i].filled(),
                )
            }))
            .map_err(|e| ReportError::Chart(e.to_string()))?;

        // Baseline under the bars so empty buckets remain visible.
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(0.0, 0.0), (4.0, max * 0.004)],
                RGBColor(64, 64, 64).filled(),
            )))
            .map_err(|e| ReportError::Chart(e.to_string()))?;

        root.present()
            .map_err(|e| ReportError::Chart(e.to_string()))?;
    }

    let img = image::RgbImage::from_raw(WIDTH, HEIGHT, raw)
        .ok_or_else(|| ReportError::Chart("bitmap buffer size mismatch".to_string()))?;
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| ReportError::Chart(e.to_string()))?;
    Ok(png)
}

/// Renders the severity chart and base64-encodes it for inline embedding.
pub fn severity_chart_base64(report: &Report) -> Result<String, ReportError> {
    let png = severity_chart_png(report)?;
    Ok(BASE64.encode(png))
}
