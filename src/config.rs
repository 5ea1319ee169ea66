use crate::error::{QtraceError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG: &str = "QTRACE_CONFIG";
pub const ENV_OUTPUT: &str = "QTRACE_OUTPUT";
pub const ENV_COLOR: &str = "QTRACE_COLOR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where entries are appended.
    pub output_path: PathBuf,
    /// Emit ANSI colors.
    pub color: bool,
    /// Values longer than this switch to the pretty multi-line form.
    pub wrap_width: usize,
    /// Empty the sink when the logger is created.
    pub truncate_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            color: true,
            wrap_width: 100,
            truncate_on_start: false,
        }
    }
}

pub fn default_output_path() -> PathBuf {
    env::temp_dir().join("q")
}

impl Config {
    /// Read a JSON config file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| QtraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| QtraceError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then the `QTRACE_CONFIG` file, then single-value overrides.
    ///
    /// A broken config file is reported and skipped.
    pub fn from_env() -> Self {
        let mut config = match env::var_os(ENV_CONFIG) {
            Some(path) => Self::load(Path::new(&path)).unwrap_or_else(|e| {
                log::warn!("ignoring {}: {}", ENV_CONFIG, e);
                Self::default()
            }),
            None => Self::default(),
        };
        config.apply_overrides(env::var_os(ENV_OUTPUT).map(PathBuf::from), env::var(ENV_COLOR).ok());
        config
    }

    fn apply_overrides(&mut self, output: Option<PathBuf>, color: Option<String>) {
        if let Some(path) = output.filter(|p| !p.as_os_str().is_empty()) {
            self.output_path = path;
        }
        if let Some(value) = color {
            match parse_switch(&value) {
                Some(on) => self.color = on,
                None => log::warn!("ignoring {}={:?}", ENV_COLOR, value),
            }
        }
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
