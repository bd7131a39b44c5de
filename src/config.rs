//! Configuration loading and management.
//!
//! The configuration file is `devsecops-audit.toml` in the current working
//! directory. All fields carry defaults so the file can be omitted entirely.
//!
//! ```rust,no_run
//! use devsecops_audit::config::Config;
//!
//! let config = Config::load(None).expect("failed to load config");
//! assert!(config.is_collector_enabled("sast"));
//! ```

use std::path::{Path, PathBuf};

/// Main configuration for the audit system.
///
/// Loaded from a TOML file (typically `devsecops-audit.toml`). All fields
/// carry sensible defaults so the config file can be omitted entirely.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Report output directory and locale.
    pub report: ReportConfig,
    /// Filesystem locations for the work plan, knowledge base, and locale files.
    pub paths: PathsConfig,
    /// Per-invocation ceilings for external processes and HTTP calls.
    pub timeouts: TimeoutsConfig,
    /// Per-collector on/off toggles.
    pub collectors: CollectorsConfig,
    /// Ollama endpoint used by the knowledge-base index.
    pub ollama: OllamaConfig,
}

/// Report output settings.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory that receives `report.md`, `report.html`, `report.pdf`,
    /// and `report.json`.
    pub dir: PathBuf,
    /// Locale tag used to pick report labels (`"en"`, `"pt"`, or any locale
    /// provided by an external locale file).
    pub locale: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            dir: PathBuf::from("reports"),
            locale: "en".to_string(),
        }
    }
}

/// Well-known input locations.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Work-plan PDF read by `read-plan` and summarized in reports.
    pub plan: PathBuf,
    /// Root of the downloaded knowledge base, partitioned by category.
    pub knowledge_base: PathBuf,
    /// Directory of external YAML locale files merged into the built-in
    /// translation tables at startup.
    pub i18n: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            plan: PathBuf::from("data/plan/devsecops-plan.pdf"),
            knowledge_base: PathBuf::from("data/knowledge_base"),
            i18n: PathBuf::from("data/i18n"),
        }
    }
}

/// Timeout ceilings, in seconds.
///
/// Every external process invocation is bounded; on expiry the child is
/// killed and the collector returns a tagged timeout capture.
#[derive(Debug, Clone, Copy, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    /// SAST and container scans.
    pub scan_secs: u64,
    /// DAST baseline scans (ZAP spiders the target, so the ceiling is higher).
    pub dast_secs: u64,
    /// Knowledge-base downloads and Ollama calls.
    pub http_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        TimeoutsConfig {
            scan_secs: 300,
            dast_secs: 600,
            http_secs: 30,
        }
    }
}

/// Per-collector on/off toggles.
///
/// Every collector defaults to **enabled**. Set a field to `false` in the
/// TOML config file to skip that collector during report generation.
///
/// ```toml
/// [collectors]
/// dast = false   # skip ZAP even when docker is installed
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CollectorsConfig {
    /// Static analysis via [bandit](https://bandit.readthedocs.io/).
    pub sast: bool,
    /// Image vulnerability scanning via [trivy](https://trivy.dev/).
    pub container: bool,
    /// Dynamic web scanning via the OWASP ZAP baseline container.
    pub dast: bool,
}

impl Default for CollectorsConfig {
    fn default() -> Self {
        CollectorsConfig {
            sast: true,
            container: true,
            dast: true,
        }
    }
}

/// Ollama HTTP endpoint settings for the knowledge-base index.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    pub embed_model: String,
    pub chat_model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        OllamaConfig {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            chat_model: "llama3.2".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `devsecops-audit.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` when the explicit path does not exist, the file
    /// cannot be read, or the TOML content fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Config, String> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(format!("Config file not found: {}", p.display()));
            }
        } else {
            let default_path = Path::new("devsecops-audit.toml");
            if default_path.exists() {
                Some(default_path.to_path_buf())
            } else {
                None
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
                let config: Config = toml::from_str(&content)
                    .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))?;
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    /// Returns `true` if the named collector is enabled.
    ///
    /// Unknown collector names are considered enabled.
    pub fn is_collector_enabled(&self, name: &str) -> bool {
        match name {
            "sast" => self.collectors.sast,
            "container" => self.collectors.container,
            "dast" => self.collectors.dast,
            _ => true,
        }
    }
}
