use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use log::LevelFilter;
use serde::Deserialize;

use crate::{consts, utils::get_project_dirs};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    /// Route serving format lists with 404/403 classification of provider failures.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Route serving format lists where every provider failure is a 500.
    #[serde(default = "default_generic_endpoint")]
    pub generic_endpoint: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            endpoint: default_endpoint(),
            generic_endpoint: default_generic_endpoint(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(consts::DEFAULT_BIND)
}

fn default_endpoint() -> String {
    consts::DEFAULT_ENDPOINT.to_string()
}

fn default_generic_endpoint() -> String {
    consts::DEFAULT_GENERIC_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: LevelFilter,
    /// Lines are appended to this file as well as written to stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

fn default_level() -> LevelFilter {
    LevelFilter::Info
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Loads `path` if given, else `config.toml` from the project config directory.
    /// Only the implicit file may be missing, in which case defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match get_project_dirs() {
            Some(dirs) => {
                let path = dirs.config_dir().join("config.toml");
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
            None => Ok(Self::default()),
        }
    }
}
