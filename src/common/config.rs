//! Configuration for the miniweed client

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "MINIWEED_CONFIG";

/// Config file used when `MINIWEED_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "miniweed.toml";

/// Prefix of the environment overrides (`SEAWEEDFS_MASTER`, `SEAWEEDFS_VOLUME`, ...)
pub const ENV_PREFIX: &str = "SEAWEEDFS";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// host:port of the master used to negotiate upload locations
    pub master: String,

    /// host:port of the volume used to fetch and delete objects
    pub volume: String,

    /// Upper bound on fetched bodies (unbounded when unset)
    #[serde(default)]
    pub max_body_bytes: Option<u64>,
}

/// Values applied on top of file and environment, e.g. from command-line flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub master: Option<String>,
    pub volume: Option<String>,
    pub max_body_bytes: Option<u64>,
}

/// Partially merged configuration, before required fields are checked
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    master: Option<String>,
    volume: Option<String>,
    max_body_bytes: Option<u64>,
}

impl ClientConfig {
    pub fn new(master: impl Into<String>, volume: impl Into<String>) -> Self {
        Self {
            master: master.into(),
            volume: volume.into(),
            max_body_bytes: None,
        }
    }

    pub fn with_max_body_bytes(mut self, limit: u64) -> Self {
        self.max_body_bytes = Some(limit);
        self
    }

    /// Load from the file named by `MINIWEED_CONFIG` (or `miniweed.toml`),
    /// then apply `SEAWEEDFS_*` environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_with(&ConfigOverrides::default())
    }

    /// Like `load`, with `overrides` taking precedence over file and environment
    pub fn load_with(overrides: &ConfigOverrides) -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::merge(&path, true, overrides)
    }

    /// Load from a specific TOML file (missing file tolerated) plus environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::merge(path, true, &ConfigOverrides::default())
    }

    /// Load from a TOML file only, ignoring the environment
    pub fn load_file(path: &Path) -> Result<Self> {
        Self::merge(path, false, &ConfigOverrides::default())
    }

    /// file < environment < overrides; required fields are checked last
    fn merge(path: &Path, with_env: bool, overrides: &ConfigOverrides) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(false),
        );
        if with_env {
            builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
        }
        let raw = builder
            .set_override_option("master", overrides.master.clone())?
            .set_override_option("volume", overrides.volume.clone())?
            .set_override_option("max_body_bytes", overrides.max_body_bytes)?
            .build()?
            .try_deserialize::<RawConfig>()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let master = raw
            .master
            .ok_or_else(|| Error::InvalidConfig("master address is not set".into()))?;
        let volume = raw
            .volume
            .ok_or_else(|| Error::InvalidConfig("volume address is not set".into()))?;
        Ok(Self {
            master,
            volume,
            max_body_bytes: raw.max_body_bytes,
        })
    }
}
