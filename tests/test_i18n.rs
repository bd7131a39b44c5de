use devsecops_audit::i18n::Translations;

#[test]
fn builtin_locales_are_present() {
    let t = Translations::builtin();
    assert!(t.has_locale("en"));
    assert!(t.has_locale("pt"));
    assert!(!t.has_locale("de"));
}

#[test]
fn label_lookup_respects_locale() {
    let t = Translations::builtin();
    assert_eq!(t.label("en", "report_title"), "DevSecOps Report");
    assert_eq!(t.label("pt", "report_title"), "Relatório DevSecOps");
}

#[test]
fn unknown_locale_falls_back_to_english() {
    let t = Translations::builtin();
    assert_eq!(t.label("de", "report_title"), "DevSecOps Report");
}

#[test]
fn unknown_key_falls_back_to_itself() {
    let t = Translations::builtin();
    assert_eq!(t.label("en", "no_such_label"), "no_such_label");
}

#[test]
fn external_locale_file_extends_the_table() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("de.yml"),
        "report_title: DevSecOps-Bericht\ndate: Datum\n",
    )
    .unwrap();

    let t = Translations::load(dir.path());
    assert!(t.has_locale("de"));
    assert_eq!(t.label("de", "report_title"), "DevSecOps-Bericht");
    // Keys absent from the external file still fall back to English.
    assert_eq!(t.label("de", "metrics"), "Key Metrics");
}

#[test]
fn external_locale_file_overrides_builtin_entries() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("en.yml"), "report_title: Security Report\n").unwrap();

    let t = Translations::load(dir.path());
    assert_eq!(t.label("en", "report_title"), "Security Report");
    // Untouched entries keep their built-in values.
    assert_eq!(t.label("en", "date"), "Date");
}

#[test]
fn malformed_locale_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("fr.yml"), "not: [valid: yaml").unwrap();

    let t = Translations::load(dir.path());
    assert!(!t.has_locale("fr"));
    assert!(t.has_locale("en"));
}

#[test]
fn missing_locale_dir_yields_builtin_tables() {
    let t = Translations::load(std::path::Path::new("does/not/exist"));
    assert!(t.has_locale("en"));
    assert!(t.has_locale("pt"));
}
