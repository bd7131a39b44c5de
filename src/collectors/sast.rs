//! Static analysis via [Bandit](https://bandit.readthedocs.io/).
//!
//! This is an **external** collector — it requires the `bandit` binary to be
//! installed on `PATH`. When `bandit` is missing the scan returns a tagged
//! unavailability capture instead of failing.
//!
//! Invocation: `bandit -r <path> -f json`. The JSON payload is passed through
//! unmodified; parsing it is left to the consumer.

use crate::config::Config;
use crate::finding::ScanCapture;
use crate::collectors::{run_tool, which_exists, ToolCollector};
use std::time::Duration;

/// External collector wrapper for Bandit.
pub struct SastCollector;

impl ToolCollector for SastCollector {
    fn name(&self) -> &'static str {
        "sast"
    }

    fn description(&self) -> &'static str {
        "Static analysis via bandit (external tool)"
    }

    fn is_available(&self) -> bool {
        which_exists("bandit")
    }

    fn scan(&self, target: &str, config: &Config) -> ScanCapture {
        if !self.is_available() {
            return ScanCapture::tool_missing(
                "bandit",
                target,
                "Install bandit (pip install bandit) to enable SAST scans",
            );
        }
        run_tool(
            self.name(),
            target,
            "bandit",
            &["-r", target, "-f", "json"],
            Duration::from_secs(config.timeouts.scan_secs),
        )
    }
}
