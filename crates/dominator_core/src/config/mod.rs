use crate::error::AppError;
use crate::model::{Document, Theme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "DOMINATOR_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        if self.accent.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.accent, text, self.reset)
        }
    }

    pub fn mutedize(&self, text: &str) -> String {
        if self.muted.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.muted, text, self.reset)
        }
    }
}

/// Light terminals keep their own colors; dark ones get an accent.
pub fn palette_for_theme(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        Theme::Light => Palette {
            accent: "",
            muted: "",
            reset: "",
        },
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub sample_data: Option<bool>,
}

impl Config {
    pub fn theme(&self) -> Option<Theme> {
        self.theme.as_deref().and_then(Theme::canonical)
    }

    pub fn sample_data(&self) -> bool {
        self.sample_data.unwrap_or(true)
    }

    /// The document used when nothing valid is stored yet.
    pub fn seed_document(&self, now: OffsetDateTime) -> Document {
        let theme = self.theme().unwrap_or_default();
        if self.sample_data() {
            Document::sample(theme, now)
        } else {
            Document::empty(theme)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub sample_data: Option<bool>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    let dirs = directories::ProjectDirs::from("", "", "digital-dominator")
        .ok_or_else(|| AppError::invalid_data("could not determine config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => {
            log::warn!(
                "event=config_load module=config status=defaulted reason={}",
                err.code()
            );
            ConfigLoad {
                config: Config::default(),
                error: Some(err),
            }
        }
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    Ok(normalize_config_theme(config))
}

fn normalize_config_theme(mut config: Config) -> Config {
    config.theme = config
        .theme
        .as_deref()
        .and_then(Theme::canonical)
        .map(|theme| theme.as_str().to_string());
    config
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_deref().and_then(Theme::canonical) {
        merged.theme = Some(theme.as_str().to_string());
    }
    if let Some(sample_data) = overrides.sample_data {
        merged.sample_data = Some(sample_data);
    }
    merged
}
