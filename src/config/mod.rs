use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "linkfolio";
const APP_CONFIG_FILE: &str = "config.json";
const DEFAULT_SITE_URL: &str = "https://linkfol.io";
pub(crate) const DEFAULT_AVATAR_MAX_SIZE: u32 = 512;

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Public origin used for canonical and Open Graph URLs.
    pub site_url: String,
    /// Dark-mode hint used when the host does not pass one.
    pub prefer_dark: bool,
    pub avatar_max_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            prefer_dark: false,
            avatar_max_size: DEFAULT_AVATAR_MAX_SIZE,
        }
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let Ok(path) = app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) else {
        tracing::debug!("no config directory; using built-in settings");
        return AppConfig::default();
    };
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return AppConfig::default(),
        Err(err) => {
            tracing::warn!(
                %err,
                path = %path.display(),
                "cannot read linkfolio config; using built-in settings"
            );
            return AppConfig::default();
        }
    };
    match serde_json::from_str::<AppConfig>(&contents) {
        Ok(config) => config.validated(),
        Err(err) => {
            tracing::warn!(
                %err,
                path = %path.display(),
                "malformed linkfolio config; using built-in settings"
            );
            AppConfig::default()
        }
    }
}

impl AppConfig {
    /// Replace a `site_url` that is not an absolute http(s) origin.
    fn validated(mut self) -> Self {
        let site_url = self.site_url.trim().trim_end_matches('/');
        let lower = site_url.to_ascii_lowercase();
        let absolute = ["https://", "http://"]
            .iter()
            .any(|scheme| lower.len() > scheme.len() && lower.starts_with(scheme));
        if absolute {
            self.site_url = site_url.to_string();
        } else {
            tracing::warn!(
                site_url = %self.site_url,
                fallback = DEFAULT_SITE_URL,
                "site_url is not an http(s) origin; using the default"
            );
            self.site_url = DEFAULT_SITE_URL.to_string();
        }
        self
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn data_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = xdg_root(xdg_config_home, home, ".config")?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

pub(crate) fn app_data_path(
    subdir: &str,
    xdg_data_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = xdg_root(xdg_data_home, home, ".local/share")?;
    path.push(APP_DIR);
    path.push(subdir);
    Ok(path)
}

fn xdg_root(
    xdg_home: Option<&Path>,
    home: Option<&Path>,
    home_fallback: &str,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(home_fallback))
}
