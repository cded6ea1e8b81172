//! Application configuration.
//!
//! # Responsibility
//! - Load `lifeboard.toml` and apply `LIFEBOARD_*` environment overrides.
//! - Provide defaults so a missing config file is never an error.
//!
//! # Invariants
//! - An explicitly requested config file must exist.
//! - Environment overrides win over file values.

use crate::filter::window::TimeWindow;
use crate::http::HttpConfig;
use crate::prompt::PromptLimits;
use crate::summarize::gemini::DEFAULT_MODEL;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "lifeboard.toml";
const APP_DIR_NAME: &str = "lifeboard";
const SQLITE_FILE_NAME: &str = "lifeboard.sqlite3";

pub const ENV_BACKEND: &str = "LIFEBOARD_BACKEND";
pub const ENV_DATA_DIR: &str = "LIFEBOARD_DATA_DIR";
pub const ENV_SHEET_URL: &str = "LIFEBOARD_SHEET_URL";
pub const ENV_LOG_LEVEL: &str = "LIFEBOARD_LOG_LEVEL";

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration load failure.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config `{}`: {message}", path.display())
            }
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for {key}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Csv,
    Sheets,
    Sqlite,
}

impl BackendKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" | "file" => Some(Self::Csv),
            "sheets" | "gsheets" | "spreadsheet" => Some(Self::Sheets),
            "sqlite" | "db" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `trace|debug|info|warn|error`; build-mode default when unset.
    pub level: Option<String>,
    /// Absolute log directory; `<data_dir>/logs` when unset.
    pub dir: Option<PathBuf>,
}

/// Full application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub data_dir: PathBuf,
    /// Spreadsheet edit URL or bare id, required by the sheets backend.
    pub sheet_url: Option<String>,
    /// Hosted-secrets TOML file, tried first for credentials.
    pub secrets_file: PathBuf,
    /// Service-account JSON key file, tried last.
    pub key_file: PathBuf,
    pub model: String,
    /// Default refresher window.
    pub window: TimeWindow,
    pub prompt: PromptLimits,
    pub log: LogConfig,
    pub http: HttpConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: default_data_dir(),
            sheet_url: None,
            secrets_file: PathBuf::from("secrets.toml"),
            key_file: PathBuf::from("secrets.json"),
            model: DEFAULT_MODEL.to_string(),
            window: TimeWindow::default(),
            prompt: PromptLimits::default(),
            log: LogConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// Environment overrides are applied after the file.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|path| path.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parses one TOML config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        info!(
            "event=config_load module=config status=ok path={}",
            path.display()
        );
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|err| err.to_string())
    }

    /// Applies `LIFEBOARD_*` overrides read through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<()> {
        if let Some(value) = lookup(ENV_BACKEND) {
            self.backend = BackendKind::parse(&value).ok_or(ConfigError::InvalidValue {
                key: ENV_BACKEND,
                value,
            })?;
        }
        if let Some(value) = lookup(ENV_DATA_DIR).filter(|value| !value.trim().is_empty()) {
            self.data_dir = PathBuf::from(value.trim());
        }
        if let Some(value) = lookup(ENV_SHEET_URL).filter(|value| !value.trim().is_empty()) {
            self.sheet_url = Some(value.trim().to_string());
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL).filter(|value| !value.trim().is_empty()) {
            self.log.level = Some(value.trim().to_string());
        }
        Ok(())
    }

    /// Database file used by the SQLite backend.
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join(SQLITE_FILE_NAME)
    }

    /// Log directory, made absolute against the working directory.
    pub fn log_dir(&self) -> PathBuf {
        let dir = self
            .log
            .dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"));
        if dir.is_absolute() {
            return dir;
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(&dir))
            .unwrap_or(dir)
    }
}

/// `<config_dir>/lifeboard/lifeboard.toml`, when a config dir exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Loads a `.env` file from the working directory or its parents.
///
/// Returns the loaded path; a missing file is not an error.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}
