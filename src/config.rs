/*!
 * Emulator Configuration
 *
 * Defaults, JSON config files and environment overrides for one emulator
 * instance.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::core::id::HANDLE_STRIDE;
use crate::handles::DEFAULT_FIRST_HANDLE;

/// Enables JSON log output when `1` or `true`
pub const ENV_TRACE_JSON: &str = "NTEMU_TRACE_JSON";
/// Default tracing filter when `RUST_LOG` is unset
pub const ENV_LOG: &str = "NTEMU_LOG";
/// Path of a JSON registry seed
pub const ENV_REGISTRY_SEED: &str = "NTEMU_REGISTRY_SEED";
/// First handle value, decimal or `0x` hex
pub const ENV_FIRST_HANDLE: &str = "NTEMU_FIRST_HANDLE";

/// Configuration loading failures
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file: {0}")]
    #[diagnostic(code(config::json))]
    Json(#[from] serde_json::Error),

    #[error("Invalid value {value:?} for {variable}")]
    #[diagnostic(
        code(config::env),
        help("Numbers may be decimal or 0x-prefixed hex; booleans are 1/0/true/false.")
    )]
    InvalidEnv { variable: &'static str, value: String },

    #[error("First handle 0x{0:x} is not a non-zero multiple of the handle stride")]
    #[diagnostic(code(config::first_handle))]
    InvalidFirstHandle(u64),
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// JSON lines instead of compact human output
    pub json: bool,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            json: false,
            default_filter: "info".to_string(),
        }
    }
}

/// Configuration for one emulator instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    pub tracing: TracingConfig,

    /// Registry seed loaded at startup (empty hives when absent)
    pub registry_seed: Option<PathBuf>,

    /// First handle value issued to a process (default: 0x4)
    pub first_handle: u64,

    /// Syscalls slower than this are logged at warn (default: 10ms)
    pub slow_syscall_threshold_ms: u64,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            tracing: TracingConfig::default(),
            registry_seed: None,
            first_handle: DEFAULT_FIRST_HANDLE,
            slow_syscall_threshold_ms: 10,
        }
    }
}

impl EmulatorConfig {
    /// Defaults overridden by `NTEMU_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        if !is_valid_first_handle(config.first_handle) {
            return Err(ConfigError::InvalidFirstHandle(config.first_handle));
        }
        Ok(config)
    }

    /// Apply `NTEMU_*` environment variables on top of `self`
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = std::env::var(ENV_TRACE_JSON) {
            self.tracing.json = parse_bool(ENV_TRACE_JSON, &value)?;
        }
        if let Ok(value) = std::env::var(ENV_LOG) {
            self.tracing.default_filter = value;
        }
        if let Ok(value) = std::env::var(ENV_REGISTRY_SEED) {
            self.registry_seed = Some(PathBuf::from(value));
        }
        if let Ok(value) = std::env::var(ENV_FIRST_HANDLE) {
            let first_handle = parse_u64(ENV_FIRST_HANDLE, &value)?;
            if !is_valid_first_handle(first_handle) {
                return Err(ConfigError::InvalidEnv {
                    variable: ENV_FIRST_HANDLE,
                    value,
                });
            }
            self.first_handle = first_handle;
        }
        Ok(self)
    }

    pub fn slow_syscall_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_syscall_threshold_ms)
    }
}

/// Live handles are non-zero multiples of the handle stride
fn is_valid_first_handle(value: u64) -> bool {
    value != 0 && value % HANDLE_STRIDE == 0
}

fn parse_bool(variable: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            variable,
            value: value.to_string(),
        }),
    }
}

fn parse_u64(variable: &'static str, value: &str) -> Result<u64, ConfigError> {
    let trimmed = value.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed.map_err(|_| ConfigError::InvalidEnv {
        variable,
        value: value.to_string(),
    })
}
