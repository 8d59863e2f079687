// src/config.rs

//! Manages server configuration: loading from TOML, defaults, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The file read at startup when no `--config` flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Upper bound on the board side length. The grid is `size * size` squares and
/// every render is sent whole to the client.
pub const MAX_BOARD_SIZE: usize = 1024;

/// Settings for generating the shared board at startup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Side length of the square board.
    #[serde(default = "default_board_size")]
    pub size: usize,
    /// Probability that any given square holds a bomb.
    #[serde(default = "default_bomb_probability")]
    pub bomb_probability: f64,
    /// Fixed RNG seed for a reproducible board. Random if unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_board_size() -> usize {
    8
}
fn default_bomb_probability() -> f64 {
    0.25
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: default_board_size(),
            bomb_probability: default_bomb_probability(),
            seed: None,
        }
    }
}

/// Configuration for the Prometheus metrics exporter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// If true, an HTTP server will be started to expose Prometheus metrics.
    #[serde(default)]
    pub enabled: bool,
    /// The port for the Prometheus metrics server.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

fn default_metrics_port() -> u16 {
    9450
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

/// The validated server configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_max_clients")]
    pub max_clients: usize,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    4450
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_clients() -> usize {
    1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            max_clients: default_max_clients(),
            board: BoardConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid configuration in '{path}'"))
    }

    /// Parses and validates a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the explicit `path` if given. Otherwise loads `config.toml` when it
    /// exists and falls back to the built-in defaults when it does not.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)
            }
            None => Ok(Self::default()),
        }
    }

    /// Validates the configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if self.max_clients == 0 {
            return Err(anyhow!("max_clients cannot be 0"));
        }
        if self.board.size == 0 {
            return Err(anyhow!("board.size cannot be 0"));
        }
        if self.board.size > MAX_BOARD_SIZE {
            return Err(anyhow!(
                "board.size cannot exceed {MAX_BOARD_SIZE}, got {}",
                self.board.size
            ));
        }
        if !(0.0..=1.0).contains(&self.board.bomb_probability) {
            return Err(anyhow!(
                "board.bomb_probability must be between 0.0 and 1.0, got {}",
                self.board.bomb_probability
            ));
        }
        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(anyhow!("metrics.port cannot be 0"));
            }
            if self.metrics.port == self.port {
                return Err(anyhow!(
                    "metrics.port ({}) must differ from the game port",
                    self.metrics.port
                ));
            }
        }
        Ok(())
    }
}
