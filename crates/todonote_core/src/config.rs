//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve service address, data directory, log level and backend choice.
//!
//! # Invariants
//! - `home_dir` is absolute so the logging bootstrap accepts `log_dir()`.
//! - Unknown backend names are rejected rather than defaulted.

use crate::db::db_path_in;
use crate::logging::default_log_level;
use crate::remote::DEFAULT_BASE_URL;
use crate::repo::session_repo::SessionScope;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_BASE_URL: &str = "TODONOTE_BASE_URL";
pub const ENV_HOME: &str = "TODONOTE_HOME";
pub const ENV_LOG_LEVEL: &str = "TODONOTE_LOG_LEVEL";
pub const ENV_BACKEND: &str = "TODONOTE_BACKEND";
pub const ENV_SESSION_LOGIN: &str = "TODONOTE_SESSION_LOGIN";

const HOME_DIR_NAME: &str = ".todonote";
const LOG_DIR_NAME: &str = "logs";

/// Which note store the application runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    Remote,
    Local,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "local" => Ok(Self::Local),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBackend(String),
    /// Neither `TODONOTE_HOME` nor `HOME` resolves to an absolute path.
    MissingHome,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBackend(value) => {
                write!(f, "unsupported backend `{value}`; expected remote|local")
            }
            Self::MissingHome => write!(
                f,
                "cannot resolve data directory; set {ENV_HOME} to an absolute path"
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub base_url: String,
    pub home_dir: PathBuf,
    pub log_level: String,
    pub backend: Backend,
    pub session_scope: SessionScope,
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let home_dir = non_blank(ENV_HOME)
            .map(PathBuf::from)
            .or_else(|| non_blank("HOME").map(|home| Path::new(&home).join(HOME_DIR_NAME)))
            .filter(|path| path.is_absolute())
            .ok_or(ConfigError::MissingHome)?;

        let backend = match non_blank(ENV_BACKEND) {
            Some(value) => value.parse()?,
            None => Backend::default(),
        };

        let session_scope = non_blank(ENV_SESSION_LOGIN)
            .map(SessionScope::PerLogin)
            .unwrap_or_default();

        Ok(Self {
            base_url: non_blank(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            home_dir,
            log_level: non_blank(ENV_LOG_LEVEL)
                .unwrap_or_else(|| default_log_level().to_string()),
            backend,
            session_scope,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        db_path_in(&self.home_dir)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.home_dir.join(LOG_DIR_NAME)
    }
}
