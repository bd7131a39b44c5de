use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "devsecops-audit",
    version,
    about = "DevSecOps assistant: security scans, config audits, and unified reports"
)]
pub struct Cli {
    /// Custom config file path (defaults to ./devsecops-audit.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the extracted text of the work-plan PDF
    ReadPlan,

    /// Assemble the unified report and write all export formats
    GenerateReport {
        /// Project name used in the report header (defaults to the current
        /// directory name)
        #[arg(long)]
        project: Option<String>,

        /// Output directory (overrides [report].dir)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Run the heuristic checks against one configuration file
    Analyze {
        /// Dockerfile, compose file, YAML/JSON manifest, or Rego policy
        file: PathBuf,
    },

    /// Run one external scanner and print its raw output
    Scan {
        /// Which scanner to invoke
        #[arg(value_enum)]
        kind: ScanKind,

        /// Scan target: a path (sast), image name (container), or URL (dast)
        target: String,
    },

    /// Query the knowledge base semantically
    Ask {
        /// The question to answer
        query: String,
    },

    /// Download the reference-document catalogue and build the vector index
    FetchDocs {
        /// Skip building the vector index after downloading
        #[arg(long)]
        no_index: bool,
    },

    /// Check which external tools and PDF renderers are available
    CheckTools,

    /// List all heuristic rules with descriptions
    ListRules,

    /// Show full explanation for a rule
    Explain {
        /// Rule ID (e.g., "dockerfile/DF-001")
        rule_id: String,
    },
}

/// External scanner selector for the `scan` subcommand.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScanKind {
    /// Static analysis via bandit
    Sast,
    /// Image vulnerability scan via trivy
    Container,
    /// OWASP ZAP baseline scan via docker
    Dast,
}

impl ScanKind {
    pub fn collector_name(&self) -> &'static str {
        match self {
            ScanKind::Sast => "sast",
            ScanKind::Container => "container",
            ScanKind::Dast => "dast",
        }
    }
}
