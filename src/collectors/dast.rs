//! Dynamic web scanning via the OWASP ZAP baseline container.
//!
//! This is an **external** collector — it shells out to `docker run` with the
//! `owasp/zap2docker-stable` image, so availability means `docker` on `PATH`.
//! ZAP spiders the target and probes it passively, which can take several
//! minutes; the timeout ceiling is therefore separate from (and higher than)
//! the one used for filesystem scans.

use crate::config::Config;
use crate::finding::ScanCapture;
use crate::collectors::{run_tool, which_exists, ToolCollector};
use std::time::Duration;

/// External collector wrapper for the ZAP baseline scan.
pub struct DastCollector;

impl ToolCollector for DastCollector {
    fn name(&self) -> &'static str {
        "dast"
    }

    fn description(&self) -> &'static str {
        "Dynamic web scanning via OWASP ZAP baseline (docker)"
    }

    fn is_available(&self) -> bool {
        which_exists("docker")
    }

    fn scan(&self, target: &str, config: &Config) -> ScanCapture {
        if !self.is_available() {
            return ScanCapture::tool_missing(
                "docker",
                target,
                "Install docker to run the OWASP ZAP baseline scan",
            );
        }
        run_tool(
            self.name(),
            target,
            "docker",
            &[
                "run",
                "--rm",
                "owasp/zap2docker-stable",
                "zap-baseline.py",
                "-t",
                target,
            ],
            Duration::from_secs(config.timeouts.dast_secs),
        )
    }
}
