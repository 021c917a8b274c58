use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::export::OutputFormat;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Directories scanned for interface files
    #[serde(default)]
    pub abi_paths: Vec<String>,

    /// Root of saved node responses for the `tx` commands
    #[serde(default)]
    pub fixtures_dir: Option<String>,

    /// Default log filter when RUST_LOG is unset (e.g. "warn", "debug")
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Configured scan roots with `~` expanded
    pub fn abi_roots(&self) -> Vec<PathBuf> {
        self.abi_paths.iter().map(|p| expand_home(p)).collect()
    }

    pub fn fixtures_root(&self) -> Option<PathBuf> {
        self.fixtures_dir.as_deref().map(expand_home)
    }
}

/// Load the config from `explicit`, or from the default location.
///
/// A missing or unparsable file yields the defaults. A path given
/// explicitly that cannot be read is reported with a warning.
pub fn load(explicit: Option<&Path>) -> Config {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(config_path) else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            if explicit.is_some() {
                warn!(path = %path.display(), %err, "cannot read config, using defaults");
            }
            return Config::default();
        }
    };
    parse(&content).unwrap_or_else(|err| {
        warn!(path = %path.display(), %err, "ignoring invalid config");
        Config::default()
    })
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("TXDECODE_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("txdecode").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("txdecode").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "txdecode", "txdecode")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn expand_home(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(trimmed)
}
