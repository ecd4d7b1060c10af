//! `catalog.toml` settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use catalog_ingest::{ImportMode, ImportOptions};
use catalog_model::{Locale, Messages};
use catalog_report::DEFAULT_FALLBACK;

pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Selects validation messages and base CSV headers.
    pub locale: Locale,
    /// Template used when a series names an unknown template id.
    pub fallback_template: String,
    pub import: ImportConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            fallback_template: DEFAULT_FALLBACK.to_string(),
            import: ImportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    pub mode: ImportMode,
    /// Truthy literals for boolean cells besides `true` and `1`.
    pub yes_literals: Vec<String>,
    /// Errors printed before `... and N more`.
    pub error_display_limit: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let options = ImportOptions::default();
        Self {
            mode: options.mode,
            yes_literals: options.yes_literals,
            error_display_limit: 10,
        }
    }
}

impl CatalogConfig {
    /// Load `path`, or `./catalog.toml` when no path is given. A missing file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), locale = %config.locale, "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn messages(&self) -> Messages {
        Messages::new(self.locale)
    }

    /// Import options with `mode` overriding the configured one.
    pub fn import_options(&self, mode: Option<ImportMode>) -> ImportOptions {
        ImportOptions {
            mode: mode.unwrap_or(self.import.mode),
            locale: self.locale,
            yes_literals: self.import.yes_literals.clone(),
            default_template: self.fallback_template.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = CatalogConfig::from_toml_str("").unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.locale, Locale::ZhCn);
        assert_eq!(config.fallback_template, "layout-m8-standard");
        assert_eq!(config.import.mode, ImportMode::Skip);
        assert_eq!(config.import.yes_literals, vec!["是", "yes"]);
        assert_eq!(config.import.error_display_limit, 10);
    }

    #[test]
    fn every_key_is_read() {
        let config = CatalogConfig::from_toml_str(
            r#"
locale = "en"
fallback_template = "layout-m8-distributor"

[import]
mode = "update"
yes_literals = ["Y"]
error_display_limit = 3
"#,
        )
        .unwrap();
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.fallback_template, "layout-m8-distributor");
        assert_eq!(config.import.mode, ImportMode::Update);
        assert_eq!(config.import.yes_literals, vec!["Y"]);
        assert_eq!(config.import.error_display_limit, 3);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(CatalogConfig::from_toml_str("colour = true").is_err());
        assert!(CatalogConfig::from_toml_str("[import]\nmodes = \"skip\"").is_err());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(CatalogConfig::from_toml_str("locale = \"fr\"").is_err());
        assert!(CatalogConfig::from_toml_str("[import]\nmode = \"replace\"").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn malformed_file_names_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, "locale = ").unwrap();
        let err = CatalogConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: ref p, .. } if p == &path));
        assert!(err.to_string().starts_with("failed to parse config"));
    }

    #[test]
    fn cli_mode_overrides_configured_mode() {
        let config = CatalogConfig::default();
        let options = config.import_options(Some(ImportMode::Update));
        assert_eq!(options.mode, ImportMode::Update);
        assert_eq!(options.default_template, "layout-m8-standard");
        assert_eq!(config.import_options(None).mode, ImportMode::Skip);
    }
}
