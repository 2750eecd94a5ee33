use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::view_config::ViewConfig;

pub const ENV_API_BASE_URL: &str = "CONTRACTORHUB_API_BASE_URL";
pub const ENV_API_TOKEN: &str = "CONTRACTORHUB_API_TOKEN";
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOverride {
    pub endpoint: Option<String>,
    pub items_per_page: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub default_items_per_page: Option<usize>,
    pub export_dir: Option<PathBuf>,
    pub views: BTreeMap<String, ViewOverride>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            api_token: None,
            connect_timeout_ms: 5_000,
            request_timeout_ms: 15_000,
            default_items_per_page: None,
            export_dir: None,
            views: BTreeMap::new(),
        }
    }
}

impl AppSettings {
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Missing file means defaults; anything else unreadable is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents, path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::debug!("loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|token| !token.trim().is_empty()) {
            self.api_token = Some(token.trim().to_string());
        }
        self
    }

    pub fn from_environment() -> Self {
        let settings = match default_settings_path() {
            Ok(path) => Self::load_or_default(&path),
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        };
        settings.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Report presets with file overrides applied.
    pub fn view_configs(&self) -> Vec<ViewConfig> {
        ViewConfig::presets()
            .into_iter()
            .map(|mut config| {
                if let Some(per_page) = self.default_items_per_page {
                    config.items_per_page = per_page.max(1);
                }
                if let Some(view) = self.views.get(&config.key) {
                    if let Some(endpoint) = view.endpoint.as_ref() {
                        config.endpoint = endpoint.clone();
                    }
                    if let Some(per_page) = view.items_per_page {
                        config.items_per_page = per_page.max(1);
                    }
                }
                config
            })
            .collect()
    }
}

fn project_dirs() -> anyhow::Result<ProjectDirs> {
    ProjectDirs::from("com", "contractorhub", "contractorhub")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn default_settings_path() -> anyhow::Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(SETTINGS_FILE_NAME))
}

pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let settings = AppSettings::load(&dir.path().join("settings.toml")).expect("should load");
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            r#"
api_base_url = "https://api.example.com"
default_items_per_page = 25

[views.transactions]
items_per_page = 8
endpoint = "/api/v2/transactions"
"#,
        )
        .expect("should write settings");

        let settings = AppSettings::load(&path).expect("should load");
        assert_eq!(settings.api_base_url, "https://api.example.com");
        assert_eq!(settings.request_timeout_ms, 15_000);

        let configs = settings.view_configs();
        let transfers = configs.iter().find(|c| c.key == "transfers").expect("preset");
        let transactions = configs.iter().find(|c| c.key == "transactions").expect("preset");
        assert_eq!(transfers.items_per_page, 25);
        assert_eq!(transactions.items_per_page, 8);
        assert_eq!(transactions.endpoint, "/api/v2/transactions");
    }

    #[test]
    fn invalid_file_is_reported_and_defaults_are_used() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "api_base_url = [").expect("should write settings");

        assert!(matches!(AppSettings::load(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(AppSettings::load_or_default(&path), AppSettings::default());
    }

    #[test]
    fn environment_overrides_file_values() {
        let settings = AppSettings::default().with_env_overrides(|key| match key {
            ENV_API_BASE_URL => Some(" http://10.0.0.5:8000 ".to_string()),
            ENV_API_TOKEN => Some("abc".to_string()),
            _ => None,
        });
        assert_eq!(settings.api_base_url, "http://10.0.0.5:8000");
        assert_eq!(settings.api_token.as_deref(), Some("abc"));

        let untouched = AppSettings::default().with_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(untouched, AppSettings::default());
    }
}
