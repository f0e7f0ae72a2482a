//! Layered configuration for the `quizmaster` binary.
//!
//! Sources, highest priority first:
//! 1. Command-line flags
//! 2. Environment variables (`QUIZMASTER_*`)
//! 3. `quizmaster.toml` in the working directory, or the `--config` file
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "quizmaster.toml";
pub const ENV_PREFIX: &str = "QUIZMASTER_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("config file {} does not exist", path.display())]
    MissingFile { path: PathBuf },

    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    pub quizzes_dir: PathBuf,
    pub database_url: String,
    pub shuffle_options: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quizzes_dir: PathBuf::from("data/quizzes"),
            database_url: "sqlite:quizmaster.sqlite3".to_string(),
            shuffle_options: true,
        }
    }
}

/// Values given on the command line; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quizzes_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_options: Option<bool>,
}

impl AppConfig {
    /// Load configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicit config file is missing, a source
    /// cannot be parsed, or a value is invalid.
    pub fn load(
        config_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
        }

        let config: Self = Self::figment(config_file)
            .merge(Serialized::defaults(overrides))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the provider chain without command-line overrides.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let file = config_file.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).only(&["quizzes_dir", "database_url", "shuffle_options"]))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.quizzes_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "quizzes_dir".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::load(None, &ConfigOverrides::default()).expect("config");
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_read_from_working_directory() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                quizzes_dir = "quizzes"
                shuffle_options = false
                "#,
            )?;

            let config = AppConfig::load(None, &ConfigOverrides::default()).expect("config");
            assert_eq!(config.quizzes_dir, PathBuf::from("quizzes"));
            assert!(!config.shuffle_options);
            assert_eq!(config.database_url, AppConfig::default().database_url);
            Ok(())
        });
    }

    #[test]
    fn env_beats_file_and_flags_beat_env() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, r#"database_url = "sqlite:file.db""#)?;
            jail.set_env("QUIZMASTER_DATABASE_URL", "sqlite:env.db");
            jail.set_env("QUIZMASTER_SHUFFLE_OPTIONS", "false");

            let config = AppConfig::load(None, &ConfigOverrides::default()).expect("config");
            assert_eq!(config.database_url, "sqlite:env.db");
            assert!(!config.shuffle_options);

            let overrides = ConfigOverrides {
                database_url: Some("sqlite:flag.db".to_string()),
                ..ConfigOverrides::default()
            };
            let config = AppConfig::load(None, &overrides).expect("config");
            assert_eq!(config.database_url, "sqlite:flag.db");
            Ok(())
        });
    }

    #[test]
    fn explicit_config_file_must_exist() {
        Jail::expect_with(|_jail| {
            let err = AppConfig::load(Some(Path::new("nope.toml")), &ConfigOverrides::default())
                .unwrap_err();
            assert!(matches!(err, ConfigError::MissingFile { .. }));
            Ok(())
        });
    }

    #[test]
    fn empty_database_url_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, r#"database_url = "  ""#)?;
            let err = AppConfig::load(None, &ConfigOverrides::default()).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "database_url"));
            Ok(())
        });
    }
}
