// Configuration loader
// Layers defaults, ~/.harvest/config.toml, ./harvest.toml, an explicit
// --config file and HARVEST_* environment variables (later wins).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Environment, File};

use super::constants::{ENV_PREFIX, LOCAL_CONFIG_FILE};
use super::settings::Settings;
use crate::errors::{HarvestError, Result};

/// Load configuration from the standard locations plus an optional explicit file.
pub fn load_config(explicit: Option<&Path>) -> Result<Settings> {
    let mut optional = Vec::new();
    if let Some(home) = dirs::home_dir() {
        optional.push(home.join(".harvest").join("config.toml"));
    }
    optional.push(PathBuf::from(LOCAL_CONFIG_FILE));

    load_layered(&optional, explicit, None)
}

/// Build settings from the given layers.
///
/// `env` replaces the process environment when set (used by tests).
pub fn load_layered(
    optional_files: &[PathBuf],
    required_file: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<Settings> {
    let mut builder = config::Config::builder();

    for path in optional_files {
        builder = builder.add_source(File::from(path.as_path()).required(false));
    }

    if let Some(path) = required_file {
        if !path.exists() {
            return Err(HarvestError::NotFound(format!(
                "Configuration file {}",
                path.display()
            )));
        }
        builder = builder.add_source(File::from(path));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("scraper.junk_email_domains")
            .source(env),
    );

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;

    tracing::debug!(bind = %settings.server.bind_address, "Configuration loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_optional_files_give_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings =
            load_layered(&[dir.path().join("absent.toml")], None, Some(HashMap::new())).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_explicit_file_overrides_optional_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_config(&dir, "base.toml", "[scraper]\nconcurrency = 2\ntimeout_secs = 3\n");
        let explicit = write_config(&dir, "explicit.toml", "[scraper]\nconcurrency = 9\n");

        let settings = load_layered(&[base], Some(&explicit), Some(HashMap::new())).unwrap();
        assert_eq!(settings.scraper.concurrency, 9);
        assert_eq!(settings.scraper.timeout_secs, 3);
    }

    #[test]
    fn test_env_overrides_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_config(
            &dir,
            "harvest.toml",
            "[server]\nbind_address = \"127.0.0.1:9000\"\n[logging]\nformat = \"compact\"\n",
        );

        let env = HashMap::from([
            (
                "HARVEST_SERVER__BIND_ADDRESS".to_string(),
                "127.0.0.1:9100".to_string(),
            ),
            ("HARVEST_OUTPUT__RESULTS_DIR".to_string(), "/tmp/out".to_string()),
        ]);

        let settings = load_layered(&[file], None, Some(env)).unwrap();
        assert_eq!(settings.server.bind_address, "127.0.0.1:9100");
        assert_eq!(settings.output.results_dir, PathBuf::from("/tmp/out"));
        assert_eq!(settings.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_env_list_for_junk_domains() {
        let env = HashMap::from([
            (
                "HARVEST_SCRAPER__JUNK_EMAIL_DOMAINS".to_string(),
                "a.com,b.com".to_string(),
            ),
            (
                "HARVEST_LOGGING__FILTER".to_string(),
                "harvest=debug,tower_http=warn".to_string(),
            ),
        ]);

        let settings = load_layered(&[], None, Some(env)).unwrap();
        assert_eq!(settings.scraper.junk_email_domains, vec!["a.com", "b.com"]);
        // Only the list key is split; the filter keeps its commas.
        assert_eq!(settings.logging.filter, "harvest=debug,tower_http=warn");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_layered(&[], Some(&missing), Some(HashMap::new())).unwrap_err();
        assert!(matches!(err, HarvestError::NotFound(_)));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_config(&dir, "bad.toml", "[scraper]\nconcurrency = 0\n");
        let err = load_layered(&[file], None, Some(HashMap::new())).unwrap_err();
        assert!(matches!(err, HarvestError::Validation(_)));
    }
}
