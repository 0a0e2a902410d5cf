//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cheatsheets/cheatsheets.toml`
//! 3. Local config: `<project_dir>/.cheatsheets.toml`
//! 4. Environment variables: `CHEATSHEETS_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// JSON store options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Pretty-print the JSON document
    pub pretty: bool,
    /// Keep `<data_file>.bak` with the previous state on every save
    pub backup: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            backup: false,
        }
    }
}

/// Raw store config for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawStoreConfig {
    pub pretty: Option<bool>,
    pub backup: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub editor: Option<String>,
    #[serde(default)]
    pub store: RawStoreConfig,
}

impl StoreConfig {
    /// Overlay wins for every option it specifies.
    pub fn merge(&self, overlay: &RawStoreConfig) -> Self {
        Self {
            pretty: overlay.pretty.unwrap_or(self.pretty),
            backup: overlay.backup.unwrap_or(self.backup),
        }
    }
}

/// Unified configuration for cheatsheets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JSON file holding the tree (default: ~/.cheatsheets/cheatsheets.json)
    pub data_file: PathBuf,
    /// Editor command (default: $EDITOR or "vim")
    pub editor: String,
    /// Store settings
    pub store: StoreConfig,
}

impl Default for Settings {
    fn default() -> Self {
        // Try $EDITOR, fall back to vim
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".into());

        Self {
            data_file: default_data_file(),
            editor,
            store: StoreConfig::default(),
        }
    }
}

/// Get the default data file (~/.cheatsheets/cheatsheets.json).
fn default_data_file() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".cheatsheets"))
        .unwrap_or_else(|| PathBuf::from("~/.cheatsheets"))
        .join("cheatsheets.json")
}

/// Get the XDG config directory for cheatsheets.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cheatsheets").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cheatsheets.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".cheatsheets.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`, leaving the input unchanged on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_file.to_string_lossy().as_ref());
        self.data_file = PathBuf::from(expanded);

        // Editor may contain a path like ~/bin/myeditor
        self.editor = expand_env_vars(&self.editor);
    }

    /// Overlay config onto self (base): every specified option wins.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            editor: overlay
                .editor
                .clone()
                .unwrap_or_else(|| self.editor.clone()),
            store: self.store.merge(&overlay.store),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.cheatsheets.toml`
    ///
    /// A relative `data_file` from the local config is resolved against `project_dir`.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let mut raw = load_raw_settings(&local_path)?;
                if let Some(data_file) = raw.data_file.take() {
                    raw.data_file = Some(if data_file.is_relative() {
                        dir.join(data_file)
                    } else {
                        data_file
                    });
                }
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        // Expand ~ and $VAR in path-like fields
        current.expand_paths();

        Ok(current)
    }

    /// Apply CHEATSHEETS_* environment variables as explicit overrides.
    ///
    /// `CHEATSHEETS_DATA_FILE`, `CHEATSHEETS_EDITOR`, `CHEATSHEETS_STORE__PRETTY`,
    /// `CHEATSHEETS_STORE__BACKUP`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("CHEATSHEETS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("editor") {
            settings.editor = val;
        }
        if let Ok(val) = config.get_bool("store.pretty") {
            settings.store.pretty = val;
        }
        if let Ok(val) = config.get_bool("store.backup") {
            settings.store.backup = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# cheatsheets configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/cheatsheets/cheatsheets.toml
#   Local:  <project_dir>/.cheatsheets.toml
#   Env:    CHEATSHEETS_* environment variables (e.g. CHEATSHEETS_STORE__BACKUP=true)

# JSON file holding the course tree (relative paths in a local config
# are resolved against the project directory)
# data_file = "~/.cheatsheets/cheatsheets.json"

# Editor used by `cheatsheets add --edit`
# editor = "vim"

[store]
# Pretty-print the JSON document
# pretty = true

# Keep <data_file>.bak with the previous state on every save
# backup = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load(None).expect("load defaults");
        assert!(!settings.editor.is_empty());
        assert!(settings.store.pretty);
    }

    #[test]
    fn given_default_data_file_when_created_then_lives_in_dot_dir() {
        let data_file = default_data_file();
        assert!(data_file.ends_with(".cheatsheets/cheatsheets.json"));
    }

    #[test]
    fn given_tilde_in_data_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_file: PathBuf::from("~/.cheatsheets/data.json"),
            editor: "~/bin/myeditor".to_string(),
            store: StoreConfig::default(),
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let data_str = settings.data_file.to_string_lossy();
        assert!(
            data_str.starts_with(&home),
            "data_file should start with home dir: {}",
            data_str
        );
        assert!(
            settings.editor.starts_with(&home),
            "editor should start with home dir: {}",
            settings.editor
        );
    }

    #[test]
    fn given_partial_overlay_when_merging_store_then_unset_options_keep_base() {
        let base = StoreConfig {
            pretty: true,
            backup: false,
        };
        let overlay = RawStoreConfig {
            pretty: None,
            backup: Some(true),
        };

        let result = base.merge(&overlay);

        assert!(result.pretty);
        assert!(result.backup);
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("valid template");
        assert!(raw.data_file.is_none());
        assert!(raw.store.backup.is_none());
    }
}
