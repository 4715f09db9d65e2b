use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::files::DEFAULT_MAX_UPLOAD_SIZE;

/// Default ceiling on connections handled at the same time.
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;

/// Command line interface.
#[derive(Debug, Clone, Parser)]
#[command(name = "flatserve")]
#[command(about = "Serve and accept files over plain HTTP/1.x", long_about = None)]
pub struct Cli {
    /// Port to listen on
    pub port: u16,

    /// Interface address to bind (default: all interfaces)
    pub interface: Option<String>,

    /// YAML file with server settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of connections handled at once
    #[arg(long)]
    pub max_connections: Option<usize>,

    /// Directory files are served from and written to
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Maximum size in bytes of a multipart upload
    #[arg(long)]
    pub max_upload_size: Option<u64>,
}

/// Settings readable from a YAML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub interface: String,
    pub max_connections: usize,
    pub root: PathBuf,
    pub max_upload_size: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            interface: "0.0.0.0".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            root: PathBuf::from("."),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("{0}")]
    Invalid(String),
}

/// Effective server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub interface: String,
    pub port: u16,
    pub max_connections: usize,
    pub root: PathBuf,
    pub max_upload_size: u64,
}

impl FileConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }
}

impl Config {
    /// Parses the process arguments and merges them over the config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_cli(Cli::parse())
    }

    /// Merges CLI values over the YAML file (if any) over the defaults.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let cfg = Self {
            interface: cli.interface.unwrap_or(file.interface),
            port: cli.port,
            max_connections: cli.max_connections.unwrap_or(file.max_connections),
            root: cli.root.unwrap_or(file.root),
            max_upload_size: cli.max_upload_size.unwrap_or(file.max_upload_size),
        };

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be at least 1".to_string(),
            ));
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::Invalid(
                "max_upload_size must be at least 1".to_string(),
            ));
        }

        if !self.root.is_dir() {
            return Err(ConfigError::Invalid(format!(
                "root {} is not a directory",
                self.root.display()
            )));
        }

        Ok(())
    }

    /// Address string handed to the listener, e.g. `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> String {
        if self.interface.contains(':') && !self.interface.starts_with('[') {
            format!("[{}]:{}", self.interface, self.port)
        } else {
            format!("{}:{}", self.interface, self.port)
        }
    }
}
