//! Image vulnerability scanning via [Trivy](https://trivy.dev/).
//!
//! This is an **external** collector — it requires the `trivy` binary on
//! `PATH`. When `trivy` is missing the scan returns a tagged unavailability
//! capture instead of failing.
//!
//! Invocation: `trivy image --quiet --format json <image>`. The JSON payload
//! is passed through unmodified.

use crate::config::Config;
use crate::finding::ScanCapture;
use crate::collectors::{run_tool, which_exists, ToolCollector};
use std::time::Duration;

/// External collector wrapper for Trivy.
pub struct ContainerCollector;

impl ToolCollector for ContainerCollector {
    fn name(&self) -> &'static str {
        "container"
    }

    fn description(&self) -> &'static str {
        "Image vulnerability scanning via trivy (external tool)"
    }

    fn is_available(&self) -> bool {
        which_exists("trivy")
    }

    fn scan(&self, target: &str, config: &Config) -> ScanCapture {
        if !self.is_available() {
            return ScanCapture::tool_missing(
                "trivy",
                target,
                "Install trivy locally or use the aquasec/trivy docker image",
            );
        }
        run_tool(
            self.name(),
            target,
            "trivy",
            &["image", "--quiet", "--format", "json", target],
            Duration::from_secs(config.timeouts.scan_secs),
        )
    }
}
