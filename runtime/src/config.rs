//! Runtime configuration
//!
//! Defaults can be overridden through the environment:
//! - `IRIS_ARG_LIMIT`: maximum argument count of a function call
//! - `IRIS_HISTORY`: path of the REPL history file

use std::path::PathBuf;

use iris::{DEFAULT_ARG_LIMIT, Limits};
use tracing::warn;

pub const ARG_LIMIT_VAR: &str = "IRIS_ARG_LIMIT";
pub const HISTORY_VAR: &str = "IRIS_HISTORY";
const HISTORY_FILE_NAME: &str = ".iris_history";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub arg_limit: usize,
    /// `None` disables persistent history.
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            arg_limit: DEFAULT_ARG_LIMIT,
            history_file: dirs::home_dir().map(|home| home.join(HISTORY_FILE_NAME)),
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by `lookup`. Unusable values are logged and
    /// ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(raw) = lookup(ARG_LIMIT_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => config.arg_limit = limit,
                _ => warn!(value = %raw, "ignoring invalid {ARG_LIMIT_VAR}"),
            }
        }

        if let Some(raw) = lookup(HISTORY_VAR) {
            config.history_file = if raw.is_empty() {
                None
            } else {
                Some(PathBuf::from(raw))
            };
        }

        config
    }

    pub fn limits(&self) -> Limits {
        Limits {
            arg_limit: self.arg_limit,
            ..Limits::default()
        }
    }
}
