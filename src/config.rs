// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the evolution core.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. config file (lindcore.yaml)
//! 3. Environment variables (LINDCORE_*)
//!
//! Numerical thresholds (sparsity drop tolerance, trace cap epsilon,
//! screening threshold, the linear-entropy purity gate) are part of the
//! numeric contract and live as module constants next to the code that uses
//! them, not here.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Resource limits enforced at registration and batch entry
    #[serde(default)]
    pub limits: ResourceLimits,

    /// Inter-step pacing (deprecated compatibility knob)
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        // Load from file if specified
        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yml::from_str(&content)?;
            }
        } else {
            // Try default locations
            for path in &["lindcore.yaml", "lindcore.yml", "/etc/lindcore/config.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yml::from_str(&content)?;
                    break;
                }
            }
        }

        // Override with environment variables
        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("LINDCORE_MAX_HILBERT_DIM") {
            if let Ok(dim) = val.parse() {
                self.limits.max_hilbert_dim = dim;
            }
        }
        if let Ok(val) = env::var("LINDCORE_MAX_QUBITS") {
            if let Ok(n) = val.parse() {
                self.limits.max_qubits = n;
            }
        }
        if let Ok(val) = env::var("LINDCORE_MAX_STEPS") {
            if let Ok(n) = val.parse() {
                self.limits.max_steps = n;
            }
        }
        if let Ok(val) = env::var("LINDCORE_MAX_INSTANCES") {
            if let Ok(n) = val.parse() {
                self.limits.max_instances = n;
            }
        }
        if let Ok(val) = env::var("LINDCORE_PACING_DELAY_MS") {
            if let Ok(ms) = val.parse() {
                self.pacing.inter_step_delay_ms = ms;
            }
        }
        if let Ok(val) = env::var("LINDCORE_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_hilbert_dim < 2 {
            return Err(Error::Config("max_hilbert_dim must be at least 2".into()));
        }
        if self.limits.max_qubits == 0 {
            return Err(Error::Config("max_qubits cannot be 0".into()));
        }
        if self.limits.max_steps == 0 {
            return Err(Error::Config("max_steps cannot be 0".into()));
        }
        if self.limits.max_instances == 0 {
            return Err(Error::Config("max_instances cannot be 0".into()));
        }
        if self.pacing.inter_step_delay_ms > 100 {
            tracing::warn!(
                delay_ms = self.pacing.inter_step_delay_ms,
                "Inter-step pacing above 100 ms will starve a frame loop. \
                 Prefer the time-sliced API over pacing."
            );
        }
        Ok(())
    }
}

/// Resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum Hilbert space dimension
    #[serde(default = "default_max_hilbert_dim")]
    pub max_hilbert_dim: usize,

    /// Maximum qubits per instance
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,

    /// Maximum evolution steps per batch call
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Maximum registered instances
    #[serde(default = "default_max_instances")]
    pub max_instances: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_hilbert_dim: default_max_hilbert_dim(),
            max_qubits: default_max_qubits(),
            max_steps: default_max_steps(),
            max_instances: default_max_instances(),
        }
    }
}

fn default_max_hilbert_dim() -> usize {
    64
}

fn default_max_qubits() -> usize {
    6
}

fn default_max_steps() -> usize {
    10_000
}

fn default_max_instances() -> usize {
    100
}

/// Inter-step pacing configuration.
///
/// A plain sleep inserted between per-step units in the eager batch paths to
/// spread CPU load across real time. Deprecated: the time-sliced API yields
/// at unit boundaries under an explicit budget and should be used instead.
/// Never applied in the sliced path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Delay between evolution units in milliseconds (0 = disabled)
    #[serde(default)]
    pub inter_step_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            inter_step_delay_ms: 0,
        }
    }
}

/// Logging configuration.
///
/// The library only emits `tracing` events; installing a subscriber and
/// honoring the level string is the embedding host's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}
