//! # devsecops-audit
//!
//! DevSecOps assistant CLI.
//!
//! `devsecops-audit` wraps third-party security scanners (Bandit, Trivy,
//! OWASP ZAP), heuristically inspects configuration files (Dockerfiles,
//! compose files, YAML/JSON manifests, Rego policies), and assembles the
//! results into Markdown, HTML, PDF, and JSON reports. A knowledge-base
//! loader downloads reference documents and builds a vector index for
//! semantic queries.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use devsecops_audit::{collectors, config::Config};
//!
//! let config = Config::load(None).expect("failed to load config");
//! if let Some(analysis) = collectors::analyze_path(Path::new("Dockerfile")) {
//!     let (critical, warnings, suggestions) = analysis.count_by_category();
//!     println!("{critical} critical, {warnings} warnings, {suggestions} suggestions");
//! }
//! ```
//!
//! ## Architecture
//!
//! 1. **[`config`]** — TOML configuration (report directory, locale, paths,
//!    timeouts, collector toggles, Ollama endpoint).
//! 2. **[`collectors`]** — external tool wrappers ([`collectors::ToolCollector`])
//!    and rule-table file heuristics; failures never cross the collector
//!    boundary.
//! 3. **[`finding`]** — core data types ([`finding::Finding`],
//!    [`finding::FileAnalysis`], [`finding::ScanCapture`]).
//! 4. **[`report`]** — the [`report::Report`] document model and its four
//!    renderers, including the PDF strategy chain.
//! 5. **[`i18n`]** — report label translations, passed explicitly into
//!    rendering.
//! 6. **[`plan`]** — work-plan PDF text extraction.
//! 7. **[`knowledge`]** — reference-document downloads and the vector index
//!    behind `ask`.
//!
//! ## External tools
//!
//! | Collector | Binary | Description |
//! |-----------|--------|-------------|
//! | `sast` | [bandit] | Python static analysis |
//! | `container` | [trivy] | Image vulnerability scanning |
//! | `dast` | docker + [ZAP] | Baseline dynamic web scan |
//!
//! [bandit]: https://bandit.readthedocs.io/
//! [trivy]: https://trivy.dev/
//! [ZAP]: https://www.zaproxy.org/

pub mod collectors;
pub mod config;
pub mod finding;
pub mod i18n;
pub mod knowledge;
pub mod plan;
pub mod report;
