use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "production_console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint_url: String,
    pub username: Option<String>,
    pub storage_path: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: "http://127.0.0.1:8080/api".into(),
            username: None,
            storage_path: PathBuf::from("./data/local_storage.json"),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint_url: Option<String>,
    username: Option<String>,
    storage_path: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.endpoint_url)
            .with_context(|| format!("endpoint url '{}' is not a valid url", self.endpoint_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "endpoint url '{}' must use http or https",
                self.endpoint_url
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }
        Ok(())
    }

    /// Signed-in user name, ignoring blank values.
    pub fn username(&self) -> Option<&str> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Defaults, then `production_console.toml` in the working directory, then
/// environment overrides.
pub fn load_settings() -> Settings {
    let mut settings = load_settings_from(Path::new(SETTINGS_FILE));
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

pub fn load_settings_from(path: &Path) -> Settings {
    let mut settings = Settings::default();

    let Ok(raw) = fs::read_to_string(path) else {
        return settings;
    };
    match toml::from_str::<FileSettings>(&raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.endpoint_url {
                settings.endpoint_url = v;
            }
            if let Some(v) = file_cfg.username {
                settings.username = Some(v);
            }
            if let Some(v) = file_cfg.storage_path {
                settings.storage_path = v;
            }
            if let Some(v) = file_cfg.request_timeout_secs {
                settings.request_timeout_secs = v;
            }
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {err}");
        }
    }

    settings
}

pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("ENDPOINT_URL") {
        settings.endpoint_url = v;
    }
    if let Some(v) = lookup("APP__ENDPOINT_URL") {
        settings.endpoint_url = v;
    }

    if let Some(v) = lookup("APP__USERNAME") {
        settings.username = Some(v);
    }

    if let Some(v) = lookup("APP__STORAGE_PATH") {
        settings.storage_path = PathBuf::from(v);
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
