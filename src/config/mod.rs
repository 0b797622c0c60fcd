//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `LEADERBOARD_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_INPUT_CAPACITY, DEFAULT_OUTPUT_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
    DEFAULT_SNAPSHOT_INTERVAL_SECS, DEFAULT_WORKER_COUNT,
};
use crate::scoring::PipelineConfig;

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `LEADERBOARD_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Service name used in log lines. Default: `leaderboard`.
    pub name: String,

    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Pipeline input queue capacity. Default: `1000`.
    pub input_capacity: usize,

    /// Pipeline output queue capacity. Default: `1000`.
    pub output_capacity: usize,

    /// Scoring worker count. Default: `1000`.
    pub workers: usize,

    /// Per-event scoring timeout. Default: none.
    pub score_timeout: Option<Duration>,

    /// Dedup snapshot file. `None` disables snapshot and restore.
    pub snapshot_path: Option<PathBuf>,

    /// Time between dedup snapshots. Default: 10 minutes.
    pub snapshot_interval: Duration,

    /// Deadline for the whole shutdown sequence. Default: 5 seconds.
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "leaderboard".to_string(),
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            input_capacity: DEFAULT_INPUT_CAPACITY,
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
            workers: DEFAULT_WORKER_COUNT,
            score_timeout: None,
            snapshot_path: None,
            snapshot_interval: Duration::from_secs(DEFAULT_SNAPSHOT_INTERVAL_SECS),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }
}

impl Config {
    const ENV_NAME: &'static str = "LEADERBOARD_NAME";
    const ENV_PORT: &'static str = "LEADERBOARD_PORT";
    const ENV_BIND_ADDR: &'static str = "LEADERBOARD_BIND_ADDR";
    const ENV_INPUT_CAPACITY: &'static str = "LEADERBOARD_INPUT_CAPACITY";
    const ENV_OUTPUT_CAPACITY: &'static str = "LEADERBOARD_OUTPUT_CAPACITY";
    const ENV_WORKERS: &'static str = "LEADERBOARD_WORKERS";
    const ENV_SCORE_TIMEOUT_MS: &'static str = "LEADERBOARD_SCORE_TIMEOUT_MS";
    const ENV_SNAPSHOT_PATH: &'static str = "LEADERBOARD_SNAPSHOT_PATH";
    const ENV_SNAPSHOT_INTERVAL_SECS: &'static str = "LEADERBOARD_SNAPSHOT_INTERVAL_SECS";
    const ENV_SHUTDOWN_TIMEOUT_SECS: &'static str = "LEADERBOARD_SHUTDOWN_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let name = Self::parse_string_from_env(Self::ENV_NAME, defaults.name);
        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let input_capacity =
            Self::parse_number_from_env(Self::ENV_INPUT_CAPACITY, defaults.input_capacity as u64)?
                as usize;
        let output_capacity = Self::parse_number_from_env(
            Self::ENV_OUTPUT_CAPACITY,
            defaults.output_capacity as u64,
        )? as usize;
        let workers =
            Self::parse_number_from_env(Self::ENV_WORKERS, defaults.workers as u64)? as usize;
        let score_timeout = match Self::parse_number_from_env(Self::ENV_SCORE_TIMEOUT_MS, 0)? {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        let snapshot_path = Self::parse_optional_path_from_env(Self::ENV_SNAPSHOT_PATH);
        let snapshot_interval = Duration::from_secs(Self::parse_number_from_env(
            Self::ENV_SNAPSHOT_INTERVAL_SECS,
            defaults.snapshot_interval.as_secs(),
        )?);
        let shutdown_timeout = Duration::from_secs(Self::parse_number_from_env(
            Self::ENV_SHUTDOWN_TIMEOUT_SECS,
            defaults.shutdown_timeout.as_secs(),
        )?);

        Ok(Self {
            name,
            port,
            bind_addr,
            input_capacity,
            output_capacity,
            workers,
            score_timeout,
            snapshot_path,
            snapshot_interval,
            shutdown_timeout,
        })
    }

    /// Validates sizes and paths (does not create anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_positive("input_capacity", self.input_capacity as u64)?;
        Self::require_positive("output_capacity", self.output_capacity as u64)?;
        Self::require_positive("workers", self.workers as u64)?;
        Self::require_positive("snapshot_interval", self.snapshot_interval.as_secs())?;

        if let Some(ref path) = self.snapshot_path {
            if path.exists() && !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Returns the scoring pipeline parameters.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            input_capacity: self.input_capacity,
            output_capacity: self.output_capacity,
            workers: self.workers,
            score_timeout: self.score_timeout,
        }
    }

    fn require_positive(name: &'static str, value: u64) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::OutOfRange {
                name,
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_number_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::NumberParseError {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}
