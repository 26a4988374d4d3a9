//! Daemon configuration.
//!
//! Values come from an optional TOML file and from command-line flags;
//! flags win. Validation runs before any subsystem starts.
//!
//! ```toml
//! port = 8080
//! data_dir = "/var/lib/warpgrid"
//! gateway = "istio-ingress.istio-system:80"
//! domain_suffix = "example.com"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use warpgrid_actions::{Gateway, GatewayError};
use warpgrid_serving::store::DEFAULT_DOMAIN_SUFFIX;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "/var/lib/warpgrid";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Settings as written in the config file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    pub gateway: Option<String>,
    pub domain_suffix: Option<String>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Overlay `other` on top of `self`; set fields in `other` win.
    pub fn merge(self, other: FileConfig) -> FileConfig {
        FileConfig {
            port: other.port.or(self.port),
            data_dir: other.data_dir.or(self.data_dir),
            gateway: other.gateway.or(self.gateway),
            domain_suffix: other.domain_suffix.or(self.domain_suffix),
        }
    }

    /// Apply defaults and validate.
    pub fn validate(self) -> Result<DaemonConfig, ConfigError> {
        let gateway = Gateway::parse(self.gateway.as_deref().unwrap_or_default())?;
        Ok(DaemonConfig {
            port: self.port.unwrap_or(DEFAULT_PORT),
            data_dir: self
                .data_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            gateway,
            domain_suffix: self
                .domain_suffix
                .unwrap_or_else(|| DEFAULT_DOMAIN_SUFFIX.to_string()),
        })
    }
}

/// Validated daemon configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DaemonConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub gateway: Gateway,
    pub domain_suffix: String,
}
