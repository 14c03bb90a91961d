//! Configuration management for notesync.
//!
//! Parses `notesync.toml` with serde, auto-discovering the file in the
//! current directory and its parents. CLI settings can override loaded
//! values via [`CliSettings`].
//!
//! ## Environment variable expansion
//!
//! String values in the `[notion]` and `[source]` sections support
//! `${VAR}` expansion, so secrets stay out of the file:
//!
//! ```toml
//! [notion]
//! token = "${NOTION_TOKEN}"
//! posts_database_id = "d9824bdc-8445-4327-be8b-5b47500af6ce"
//! ```
//!
//! Conversion code never reads configuration or environment implicitly;
//! everything flows in from here through the CLI entry point.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "notesync.toml";

/// Default pause after each remote write, in milliseconds.
const DEFAULT_WRITE_DELAY_MS: u64 = 350;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded
/// config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the source export file path.
    pub export_path: Option<PathBuf>,
    /// Override the write delay.
    pub write_delay_ms: Option<u64>,
    /// Override the draft publishing flag.
    pub publish_drafts: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Notion connection settings.
    pub notion: NotionConfig,
    /// Source database export settings.
    pub source: SourceConfig,
    /// Sync behavior settings.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Notion connection settings.
#[derive(Debug, Deserialize)]
pub struct NotionConfig {
    /// Integration token.
    pub token: String,
    /// Database receiving posts.
    pub posts_database_id: String,
    /// Database receiving blogroll links (optional section of the sync).
    #[serde(default)]
    pub links_database_id: Option<String>,
    /// API version override.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Source database export settings.
#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    /// Path to the JSON export file.
    pub export_path: String,
}

/// Sync behavior settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Pause after each remote write, in milliseconds.
    pub write_delay_ms: u64,
    /// Whether non-publish posts are synced too.
    pub publish_drafts: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            write_delay_ms: DEFAULT_WRITE_DELAY_MS,
            publish_drafts: false,
        }
    }
}

impl SyncConfig {
    /// The write delay as a [`Duration`].
    #[must_use]
    pub fn write_delay(&self) -> Duration {
        Duration::from_millis(self.write_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// No config file discovered and none specified.
    #[error("No {CONFIG_FILENAME} found in the current directory or its parents")]
    NotDiscovered,
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. `notion.token`).
        field: String,
        /// Error message (e.g. `NOTION_TOKEN not set`).
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `notesync.toml` in the current directory and parents.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns an error if no config file is found, parsing fails,
    /// expansion references an unset variable, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            return Err(ConfigError::NotDiscovered);
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a config file and expand environment references.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&raw)?;

        config.notion.token = expand(&config.notion.token, "notion.token")?;
        config.notion.posts_database_id = expand(
            &config.notion.posts_database_id,
            "notion.posts_database_id",
        )?;
        if let Some(links) = &config.notion.links_database_id {
            config.notion.links_database_id = Some(expand(links, "notion.links_database_id")?);
        }
        config.source.export_path = expand(&config.source.export_path, "source.export_path")?;

        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Search for `notesync.toml` upward from the current directory.
    fn discover_config() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let candidate = dir.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(export_path) = &settings.export_path {
            self.source.export_path = export_path.display().to_string();
        }
        if let Some(write_delay_ms) = settings.write_delay_ms {
            self.sync.write_delay_ms = write_delay_ms;
        }
        if let Some(publish_drafts) = settings.publish_drafts {
            self.sync.publish_drafts = publish_drafts;
        }
    }

    /// Validate that required fields are properly set.
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.notion.token, "notion.token")?;
        require_non_empty(&self.notion.posts_database_id, "notion.posts_database_id")?;
        if let Some(links) = &self.notion.links_database_id {
            require_non_empty(links, "notion.links_database_id")?;
        }
        require_non_empty(&self.source.export_path, "source.export_path")?;
        Ok(())
    }
}

/// Expand `${VAR}` references in a string value.
fn expand(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(|expanded| expanded.into_owned())
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: err.to_string(),
        })
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(raw: &str) -> Config {
        toml::from_str(raw).unwrap()
    }

    const MINIMAL: &str = r#"
        [notion]
        token = "secret"
        posts_database_id = "db-posts"

        [source]
        export_path = "export.json"
    "#;

    #[test]
    fn test_minimal_config_defaults() {
        let config = parse(MINIMAL);
        assert_eq!(config.notion.token, "secret");
        assert!(config.notion.links_database_id.is_none());
        assert_eq!(config.sync.write_delay_ms, 350);
        assert!(!config.sync.publish_drafts);
        assert_eq!(config.sync.write_delay(), Duration::from_millis(350));
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            r#"
            [notion]
            token = "secret"
            posts_database_id = "db-posts"
            links_database_id = "db-links"
            api_version = "2022-06-28"

            [source]
            export_path = "/data/export.json"

            [sync]
            write_delay_ms = 500
            publish_drafts = true
        "#,
        );
        assert_eq!(config.notion.links_database_id.as_deref(), Some("db-links"));
        assert_eq!(config.sync.write_delay_ms, 500);
        assert!(config.sync.publish_drafts);
    }

    #[test]
    fn test_cli_settings_override() {
        let mut config = parse(MINIMAL);
        config.apply_cli_settings(&CliSettings {
            export_path: Some(PathBuf::from("/tmp/other.json")),
            write_delay_ms: Some(0),
            publish_drafts: Some(true),
        });
        assert_eq!(config.source.export_path, "/tmp/other.json");
        assert_eq!(config.sync.write_delay_ms, 0);
        assert!(config.sync.publish_drafts);
    }

    #[test]
    fn test_validation_rejects_empty_token() {
        let config = parse(
            r#"
            [notion]
            token = ""
            posts_database_id = "db"

            [source]
            export_path = "export.json"
        "#,
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_expand_plain_value_is_identity() {
        assert_eq!(expand("no-vars-here", "field").unwrap(), "no-vars-here");
    }

    #[test]
    fn test_expand_unset_variable_errors() {
        let err = expand("${NOTESYNC_UNSET_VAR_FOR_TEST}", "notion.token").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { field, .. } if field == "notion.token"));
    }
}
