use std::fs;
use std::path::{Path, PathBuf};

use cross_xdg::BaseDirs;
use serde::Deserialize;

use crate::evaluator::{DEFAULT_CELL_BITS, EvalConfig};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "BFI_CONFIG";
pub const CELL_SIZE_ENV: &str = "BFI_CELL_SIZE";
pub const MEMORY_DUMP_ENV: &str = "BFI_MEMORY_DUMP";

/// Interpreter settings after merging every source.
///
/// Each key is taken from the first source that sets it: command line flag,
/// environment, config file, then the built-in default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub cell_size: i64,
    pub memory_dump: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_BITS,
            memory_dump: false,
        }
    }
}

impl From<Settings> for EvalConfig {
    fn from(s: Settings) -> Self {
        EvalConfig {
            cell_size: s.cell_size,
            memory_dump: s.memory_dump,
        }
    }
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub cell_size: Option<i64>,
    pub memory_dump: Option<bool>,
}

/// Contents of `bfi.toml`.
///
/// ```toml
/// [interpreter]
/// cell_size = 16
/// memory_dump = true
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub interpreter: InterpreterSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterpreterSection {
    pub cell_size: Option<i64>,
    pub memory_dump: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Settings {
    /// Merge `overrides`, the environment seen through `env`, and `file`.
    pub fn resolve<F>(overrides: Overrides, env: F, file: Option<&FileConfig>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let section = file.map(|f| &f.interpreter);

        let cell_size = overrides
            .cell_size
            .or_else(|| env(CELL_SIZE_ENV).and_then(|s| s.trim().parse::<i64>().ok()))
            .or_else(|| section.and_then(|s| s.cell_size))
            .unwrap_or(defaults.cell_size);

        let memory_dump = overrides
            .memory_dump
            .or_else(|| env(MEMORY_DUMP_ENV).and_then(|s| parse_flag(&s)))
            .or_else(|| section.and_then(|s| s.memory_dump))
            .unwrap_or(defaults.memory_dump);

        Settings { cell_size, memory_dump }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Where the config file lives: `$BFI_CONFIG`, else `<config home>/bfi.toml`.
pub fn config_path<F>(env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = env(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().into_iter().next()?;
    Some(PathBuf::from(base_dirs.config_home()).join("bfi.toml"))
}

/// Load the config file at `path`. A missing file is not an error.
pub fn load_file(path: &Path) -> Result<Option<FileConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    parse_file(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

pub fn parse_file(content: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(content)
}
