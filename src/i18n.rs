//! Report label translations.
//!
//! [`Translations`] maps a locale tag to a table of label keys used by the
//! report renderers. English and Portuguese tables are built in; additional
//! locales (or overrides of the built-in ones) are read from YAML files in
//! the configured i18n directory, one file per locale (`pt.yml`, `de.yml`, …).
//!
//! The table is loaded once at startup and passed by reference into the
//! renderers — there is no process-wide mutable state.

use std::collections::BTreeMap;
use std::path::Path;

/// Locale → (label key → localized text).
///
/// Read-only after construction. Lookups fall back to English, then to the
/// key itself, so a missing label never breaks rendering.
#[derive(Debug, Clone)]
pub struct Translations {
    tables: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for Translations {
    fn default() -> Self {
        Translations::builtin()
    }
}

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Translations {
    /// The built-in English and Portuguese tables.
    pub fn builtin() -> Self {
        let mut tables = BTreeMap::new();
        tables.insert(
            "en".to_string(),
            table(&[
                ("report_title", "DevSecOps Report"),
                ("date", "Date"),
                ("executive_summary", "Executive Summary"),
                ("metrics", "Key Metrics"),
                ("severity_analysis", "Severity Analysis"),
                ("findings", "Findings"),
                ("recommendations", "Recommendations"),
                ("next_steps", "Next Steps"),
                ("critical_findings", "Critical Findings"),
                ("warnings", "Warnings"),
                ("suggestions", "Suggestions"),
                ("description", "Description"),
                ("tool", "Tool"),
                ("location", "Location"),
                ("recommendation", "Recommendation"),
                ("references", "References"),
            ]),
        );
        tables.insert(
            "pt".to_string(),
            table(&[
                ("report_title", "Relatório DevSecOps"),
                ("date", "Data"),
                ("executive_summary", "Sumário Executivo"),
                ("metrics", "Métricas Principais"),
                ("severity_analysis", "Análise de Severidade"),
                ("findings", "Achados"),
                ("recommendations", "Recomendações"),
                ("next_steps", "Próximos Passos"),
                ("critical_findings", "Problemas Críticos"),
                ("warnings", "Avisos"),
                ("suggestions", "Sugestões"),
                ("description", "Descrição"),
                ("tool", "Ferramenta"),
                ("location", "Localização"),
                ("recommendation", "Recomendação"),
                ("references", "Referências"),
            ]),
        );
        Translations { tables }
    }

    /// Builds the translation table, merging external locale files from `dir`
    /// over the built-in tables.
    ///
    /// Each `*.yml`/`*.yaml` file is parsed as a flat string map; its stem is
    /// the locale tag. Unreadable or malformed files are skipped with a
    /// warning — locale data is never a reason to abort.
    pub fn load(dir: &Path) -> Self {
        let mut translations = Translations::builtin();
        let Ok(entries) = std::fs::read_dir(dir) else {
            return translations;
        };

        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            let is_yaml = path
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml");
            if !is_yaml {
                continue;
            }
            let Some(locale) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("skipping locale file {}: {e}", path.display());
                    continue;
                }
            };
            match serde_yaml::from_str::<BTreeMap<String, String>>(&content) {
                Ok(loaded) => {
                    tracing::info!("loaded locale file {}", path.display());
                    translations
                        .tables
                        .entry(locale)
                        .or_default()
                        .extend(loaded);
                }
                Err(e) => {
                    tracing::warn!("skipping malformed locale file {}: {e}", path.display());
                }
            }
        }

        translations
    }

    /// Returns `true` when a table exists for `locale`.
    pub fn has_locale(&self, locale: &str) -> bool {
        self.tables.contains_key(locale)
    }

    /// Looks up `key` in the `locale` table, falling back to English and
    /// finally to the key itself.
    pub fn label<'a>(&'a self, locale: &str, key: &'a str) -> &'a str {
        self.tables
            .get(locale)
            .and_then(|t| t.get(key))
            .or_else(|| self.tables.get("en").and_then(|t| t.get(key)))
            .map(String::as_str)
            .unwrap_or(key)
    }
}
