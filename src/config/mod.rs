//! Harness configuration.
//!
//! Settings come from an optional TOML file and can be overridden with
//! `HARNESS_*` environment variables. Anything left unset falls back to the
//! defaults used by the integration test clusters.

use std::{fmt, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prelude::*;

pub const DEFAULT_JOBMGR_URL: &str = "http://localhost:5292";
pub const DEFAULT_RESMGR_URL: &str = "http://localhost:5290";
pub const DEFAULT_CALLER: &str = "peloton-client";
pub const DEFAULT_JOBMGR_SERVICE: &str = "peloton-jobmgr";
pub const DEFAULT_RESMGR_SERVICE: &str = "peloton-resmgr";
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 60;
pub const DEFAULT_SLEEP_TIME: Duration = Duration::from_secs(1);
pub const DEFAULT_POOL_NAME: &str = "IntegrationTestPool";

pub const ENV_JOBMGR_URL: &str = "HARNESS_JOBMGR_URL";
pub const ENV_RESMGR_URL: &str = "HARNESS_RESMGR_URL";
pub const ENV_RPC_TIMEOUT_SEC: &str = "HARNESS_RPC_TIMEOUT_SEC";
pub const ENV_MAX_RETRY_ATTEMPTS: &str = "HARNESS_MAX_RETRY_ATTEMPTS";
pub const ENV_SLEEP_TIME_SEC: &str = "HARNESS_SLEEP_TIME_SEC";
pub const ENV_POOL_NAME: &str = "HARNESS_POOL_NAME";

/// User-provided configuration, as written in the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessUserConfig {
    /// Job manager endpoint.
    pub jobmgr_url: Option<String>,
    /// Resource manager endpoint.
    pub resmgr_url: Option<String>,
    /// Caller name sent with every RPC.
    pub caller: Option<String>,
    pub jobmgr_service: Option<String>,
    pub resmgr_service: Option<String>,
    /// Per RPC timeout in seconds.
    pub rpc_timeout_sec: Option<f64>,
    /// Number of polls before a wait gives up.
    pub max_retry_attempts: Option<u32>,
    /// Pause between polls in seconds.
    pub sleep_time_sec: Option<f64>,
    /// Resource pool the test jobs are placed in.
    pub pool_name: Option<String>,
}

impl HarnessUserConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }

    /// Overrides fields with the values `lookup` returns for the `HARNESS_*`
    /// variables.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_JOBMGR_URL) {
            self.jobmgr_url = Some(url);
        }
        if let Some(url) = lookup(ENV_RESMGR_URL) {
            self.resmgr_url = Some(url);
        }
        if let Some(value) = lookup(ENV_RPC_TIMEOUT_SEC) {
            self.rpc_timeout_sec = Some(parse_value(ENV_RPC_TIMEOUT_SEC, &value)?);
        }
        if let Some(value) = lookup(ENV_MAX_RETRY_ATTEMPTS) {
            self.max_retry_attempts = Some(parse_value(ENV_MAX_RETRY_ATTEMPTS, &value)?);
        }
        if let Some(value) = lookup(ENV_SLEEP_TIME_SEC) {
            self.sleep_time_sec = Some(parse_value(ENV_SLEEP_TIME_SEC, &value)?);
        }
        if let Some(name) = lookup(ENV_POOL_NAME) {
            self.pool_name = Some(name);
        }
        Ok(self)
    }

    /// Overrides fields from the process environment.
    pub fn with_env(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn seconds(key: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value).map_err(|_| Error::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Resolved configuration used by the clients and the wait loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub jobmgr_url: String,
    pub resmgr_url: String,
    pub caller: String,
    pub jobmgr_service: String,
    pub resmgr_service: String,
    pub rpc_timeout: Duration,
    pub max_retry_attempts: u32,
    pub sleep_time: Duration,
    pub pool_name: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            jobmgr_url: DEFAULT_JOBMGR_URL.to_string(),
            resmgr_url: DEFAULT_RESMGR_URL.to_string(),
            caller: DEFAULT_CALLER.to_string(),
            jobmgr_service: DEFAULT_JOBMGR_SERVICE.to_string(),
            resmgr_service: DEFAULT_RESMGR_SERVICE.to_string(),
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            max_retry_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            sleep_time: DEFAULT_SLEEP_TIME,
            pool_name: DEFAULT_POOL_NAME.to_string(),
        }
    }
}

impl HarnessConfig {
    /// Resolve a user configuration, filling the gaps with defaults.
    pub fn from_user_config(config: HarnessUserConfig) -> Result<Self> {
        let defaults = Self::default();
        let rpc_timeout = match config.rpc_timeout_sec {
            Some(value) => seconds("rpc_timeout_sec", value)?,
            None => defaults.rpc_timeout,
        };
        let sleep_time = match config.sleep_time_sec {
            Some(value) => seconds("sleep_time_sec", value)?,
            None => defaults.sleep_time,
        };
        Ok(Self {
            jobmgr_url: config.jobmgr_url.unwrap_or(defaults.jobmgr_url),
            resmgr_url: config.resmgr_url.unwrap_or(defaults.resmgr_url),
            caller: config.caller.unwrap_or(defaults.caller),
            jobmgr_service: config.jobmgr_service.unwrap_or(defaults.jobmgr_service),
            resmgr_service: config.resmgr_service.unwrap_or(defaults.resmgr_service),
            rpc_timeout,
            max_retry_attempts: config
                .max_retry_attempts
                .unwrap_or(defaults.max_retry_attempts),
            sleep_time,
            pool_name: config.pool_name.unwrap_or(defaults.pool_name),
        })
    }

    /// Load the configuration from an optional TOML file, then apply the
    /// environment overrides.
    pub fn load(file_path: Option<&Path>) -> Result<Self> {
        let user_config = match file_path {
            Some(path) => HarnessUserConfig::from_file(path)?,
            None => HarnessUserConfig::default(),
        };
        let config = Self::from_user_config(user_config.with_env()?)?;
        debug!("Loaded harness config {}", config);
        Ok(config)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Path of the test resource pool, rooted at `/`.
    pub fn pool_path(&self) -> String {
        format!("/{}", self.pool_name)
    }
}

impl fmt::Display for HarnessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "jobmgr={} resmgr={} rpc_timeout={:?} max_retry_attempts={} sleep_time={:?} pool={}",
            self.jobmgr_url,
            self.resmgr_url,
            self.rpc_timeout,
            self.max_retry_attempts,
            self.sleep_time,
            self.pool_name
        )
    }
}
