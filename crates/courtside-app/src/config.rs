// Configuration loading and parsing (league.toml, display.toml).

use courtside_core::Window;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub data: DataConfig,
    /// Prediction windows to run, in configured order.
    pub windows: Vec<Window>,
    pub display: DisplayConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    data: DataConfig,
    #[serde(default)]
    prediction: PredictionSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub season: u32,
    pub num_teams: usize,
    pub current_week: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory of raw week payloads (`week_<n>.json`).
    pub dir: String,
    /// Report destination; stdout when omitted.
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PredictionSection {
    #[serde(default = "default_windows")]
    windows: Vec<String>,
    #[serde(default = "default_last_n")]
    last_n: u32,
}

impl Default for PredictionSection {
    fn default() -> Self {
        PredictionSection {
            windows: default_windows(),
            last_n: default_last_n(),
        }
    }
}

fn default_windows() -> Vec<String> {
    vec!["last".into(), "last_n".into(), "total".into()]
}

fn default_last_n() -> u32 {
    3
}

// ---------------------------------------------------------------------------
// display.toml structs
// ---------------------------------------------------------------------------

/// Display-only settings. Abbreviations are keyed by team key, never by
/// team name.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub abbreviations: HashMap<String, String>,
}

impl DisplayConfig {
    pub fn abbreviation(&self, team_id: &str) -> Option<&str> {
        self.abbreviations.get(team_id).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// (optionally) `config/display.toml`, relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- display.toml (optional) ---
    let display_path = config_dir.join("display.toml");
    let display = if display_path.exists() {
        let text = read_file(&display_path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: display_path.clone(),
            source: e,
        })?
    } else {
        DisplayConfig::default()
    };

    let windows = parse_windows(&league_file.prediction)?;

    let config = Config {
        league: league_file.league,
        data: league_file.data,
        windows,
        display,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy every file in `defaults/` that is missing from `config/`. Existing
/// files are left alone and `.example` templates are skipped. Returns the
/// copied paths.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);
        if copy_if_absent(&path, &target)? {
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Create `target` from `source` unless it already exists. Returns whether a
/// copy happened. A failed copy leaves no partial `target` behind.
fn copy_if_absent(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    if target.exists() {
        return Ok(false);
    }
    let content = std::fs::read(source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read {}: {e}", source.display()),
    })?;
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            })
        }
    };
    write_or_remove(&mut dest, target, &content)?;
    Ok(true)
}

/// Write `content` into the freshly created `target`, deleting it on failure
/// so the next run copies it again.
fn write_or_remove(dest: &mut impl Write, target: &Path, content: &[u8]) -> Result<(), ConfigError> {
    if let Err(e) = dest.write_all(content).and_then(|()| dest.flush()) {
        if let Err(remove_err) = std::fs::remove_file(target) {
            warn!("Could not remove partial {}: {remove_err}", target.display());
        }
        return Err(ConfigError::DefaultsCopyError {
            message: format!("failed to write {}: {e}", target.display()),
        });
    }
    Ok(())
}

fn parse_windows(section: &PredictionSection) -> Result<Vec<Window>, ConfigError> {
    if section.last_n == 0 {
        return Err(ConfigError::ValidationError {
            field: "prediction.last_n".into(),
            message: "must be greater than 0".into(),
        });
    }
    if section.windows.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "prediction.windows".into(),
            message: "at least one window is required".into(),
        });
    }
    section
        .windows
        .iter()
        .map(|name| {
            Window::from_name(name, section.last_n).ok_or_else(|| ConfigError::ValidationError {
                field: "prediction.windows".into(),
                message: format!("unknown window {name:?}; expected last, last_n or total"),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.num_teams == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.num_teams".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.league.current_week == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.current_week".into(),
            message: "weeks are numbered from 1".into(),
        });
    }

    if config.data.dir.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.dir".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
