//! The fixed reference-document catalogue.
//!
//! Each entry names one document, the category directory it is stored under,
//! and the URL it is fetched from. The set is deliberately small and static;
//! extending it is a code change, keeping the knowledge base reproducible.

/// One named reference document.
pub struct DocSource {
    /// Stable name used as the file stem on disk.
    pub name: &'static str,
    /// Category directory under the knowledge-base root.
    pub category: &'static str,
    pub url: &'static str,
}

impl DocSource {
    /// File name on disk, deriving the extension from the URL.
    pub fn file_name(&self) -> String {
        let ext = if self.url.ends_with(".pdf") { "pdf" } else { "md" };
        format!("{}.{ext}", self.name)
    }
}

/// Returns the document catalogue in download order.
pub fn catalogue() -> Vec<DocSource> {
    vec![
        DocSource {
            name: "owasp_top10",
            category: "owasp",
            url: "https://raw.githubusercontent.com/OWASP/www-project-top-ten/main/2021/OWASP_Top_10-2021.md",
        },
        DocSource {
            name: "owasp_api_top10",
            category: "owasp",
            url: "https://raw.githubusercontent.com/OWASP/API-Security/main/2023/en/dist/owasp-api-top10-en.md",
        },
        DocSource {
            name: "cncf_security_whitepaper",
            category: "cloud-native",
            url: "https://raw.githubusercontent.com/cncf/tag-security/main/security-whitepaper/v2/CNCF_security_whitepaper_v2.pdf",
        },
    ]
}
