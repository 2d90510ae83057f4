//! Integration tests for config

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;
    use tabulator_config::*;
    use tabulator_types::{OptionSource, ReportFormat};
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: &[&str] = &[
        "TABULATOR_DEDUPLICATE",
        "TABULATOR_REPORT_FORMAT",
        "TABULATOR_OUTPUT_DIR",
        "TABULATOR_VALIDATION",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
deduplicate = false
report_format = "text"

[validation]
uwt = true
pmd = false
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert!(!config.general.deduplicate);
        assert_eq!(config.general.report_format, ReportFormat::Text);
        assert!(config.validation.is_enabled("uwt"));
        assert!(!config.validation.is_enabled("pmd"));
        // untouched keys keep their defaults
        assert!(!config.validation.is_enabled("umf"));
        assert!(config.validation.is_enabled("trd"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[general]").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert!(config.general.deduplicate);
        assert_eq!(config.general.report_format, ReportFormat::Jsonl);
        assert_eq!(config.validation, ValidationOptions::default());
    }

    #[test]
    fn test_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[general\ndeduplicate = ").unwrap();
        assert!(Config::load_from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_or_default(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("TABULATOR_DEDUPLICATE", "no");
        std::env::set_var("TABULATOR_REPORT_FORMAT", "text");
        std::env::set_var("TABULATOR_VALIDATION", "+umf,-trd");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert!(!config.general.deduplicate);
        assert_eq!(config.general.report_format, ReportFormat::Text);
        assert!(config.validation.is_enabled("umf"));
        assert!(!config.validation.is_enabled("trd"));

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("TABULATOR_REPORT_FORMAT", "csv");
        let mut config = Config::default();
        assert!(config.merge_env().is_err());
        clear_env();

        std::env::set_var("TABULATOR_VALIDATION", "-all");
        let mut config = Config::default();
        assert!(config.merge_env().is_err());
        clear_env();
    }
}
