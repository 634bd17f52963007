use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "gallery.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub columns: u32,
    pub container: String,
    pub upload_dir: PathBuf,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: 3,
            container: "photo-gallery".into(),
            upload_dir: PathBuf::from("./photos"),
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    columns: Option<u32>,
    container: Option<String>,
    upload_dir: Option<PathBuf>,
    log_filter: Option<String>,
}

pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_from(config_path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file, then environment overrides. An explicit
/// `config_path` must exist; the default `gallery.toml` is optional.
pub fn load_settings_from(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let raw = match config_path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };
    if let Some(raw) = raw {
        let file_cfg: FileSettings = toml::from_str(&raw).context("failed to parse gallery config")?;
        if let Some(v) = file_cfg.columns {
            settings.columns = v;
        }
        if let Some(v) = file_cfg.container {
            settings.container = v;
        }
        if let Some(v) = file_cfg.upload_dir {
            settings.upload_dir = v;
        }
        if let Some(v) = file_cfg.log_filter {
            settings.log_filter = v;
        }
    }

    for key in ["GALLERY_COLUMNS", "APP__COLUMNS"] {
        if let Some(parsed) = env(key).and_then(|v| v.trim().parse::<u32>().ok()) {
            settings.columns = parsed;
        }
    }
    for key in ["GALLERY_CONTAINER", "APP__CONTAINER"] {
        if let Some(v) = env(key) {
            settings.container = v;
        }
    }
    for key in ["GALLERY_UPLOAD_DIR", "APP__UPLOAD_DIR"] {
        if let Some(v) = env(key) {
            settings.upload_dir = PathBuf::from(v);
        }
    }
    for key in ["GALLERY_LOG_FILTER", "APP__LOG_FILTER"] {
        if let Some(v) = env(key) {
            settings.log_filter = v;
        }
    }

    Ok(settings)
}
