//! Agent configuration parameters
//!
//! Everything the agent needs at process start: where the order API lives,
//! the static credential, the device identity, loop timing, and the GPIO
//! line mapping.  Loaded once from an optional JSON file, then overridden
//! from the environment, then validated.  Never written back.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

/// Logical role → physical GPIO line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineMapping {
    pub indicator: u32,
    pub pump: u32,
    pub valve: u32,
    pub sensor: u32,
}

impl Default for LineMapping {
    fn default() -> Self {
        Self {
            indicator: pins::INDICATOR_LINE,
            pump: pins::PUMP_LINE,
            valve: pins::VALVE_LINE,
            sensor: pins::SENSOR_LINE,
        }
    }
}

impl LineMapping {
    /// All four line numbers, outputs first.
    pub fn all(&self) -> [u32; 4] {
        [self.indicator, self.pump, self.valve, self.sensor]
    }

    fn has_duplicates(&self) -> bool {
        let lines = self.all();
        lines
            .iter()
            .enumerate()
            .any(|(i, a)| lines[i + 1..].contains(a))
    }
}

/// Core agent configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    // --- Order API ---
    /// Base URL of the order API, without trailing slash (e.g. `https://host/api`)
    pub base_url: String,
    /// Static credential sent as `X-API-Key`
    pub api_key: String,
    /// Identity of this dispenser as known to the server
    pub hardware_id: String,

    // --- Timing ---
    /// Minimum gap between order polls (milliseconds)
    pub poll_interval_ms: u64,
    /// Minimum gap between heartbeats (milliseconds)
    pub heartbeat_interval_ms: u64,

    // --- Hardware ---
    pub lines: LineMapping,

    // --- Logging ---
    /// Append-only log file in addition to the console; `None` disables it
    pub log_file: Option<PathBuf>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://porametix.online/api".into(),
            api_key: "dev-hardware-key".into(),
            hardware_id: "odroid-001".into(),

            poll_interval_ms: 5_000,       // 5 s
            heartbeat_interval_ms: 30_000, // 30 s

            lines: LineMapping::default(),

            log_file: Some(PathBuf::from("/var/log/totobin-hardware.log")),
        }
    }
}

/// Environment variables consulted by [`AgentConfig::apply_env`].
pub const ENV_BASE_URL: &str = "TOTOBIN_BASE_URL";
pub const ENV_API_KEY: &str = "HARDWARE_API_KEY";
pub const ENV_HARDWARE_ID: &str = "TOTOBIN_HARDWARE_ID";
pub const ENV_POLL_INTERVAL_MS: &str = "TOTOBIN_POLL_INTERVAL_MS";
pub const ENV_HEARTBEAT_INTERVAL_MS: &str = "TOTOBIN_HEARTBEAT_INTERVAL_MS";
pub const ENV_LOG_FILE: &str = "TOTOBIN_LOG_FILE";

impl AgentConfig {
    /// Read a JSON config file.  Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Corrupted(e.to_string()))
    }

    /// Overlay values from the environment.
    ///
    /// `lookup` is `|key| std::env::var(key).ok()` in production; tests pass
    /// a map instead of mutating the process environment.  An empty
    /// `TOTOBIN_LOG_FILE` disables the file log.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(id) = lookup(ENV_HARDWARE_ID) {
            self.hardware_id = id;
        }
        if let Some(ms) = lookup(ENV_POLL_INTERVAL_MS) {
            self.poll_interval_ms = ms
                .trim()
                .parse()
                .map_err(|_| ConfigError::ValidationFailed("TOTOBIN_POLL_INTERVAL_MS is not an integer"))?;
        }
        if let Some(ms) = lookup(ENV_HEARTBEAT_INTERVAL_MS) {
            self.heartbeat_interval_ms = ms.trim().parse().map_err(|_| {
                ConfigError::ValidationFailed("TOTOBIN_HEARTBEAT_INTERVAL_MS is not an integer")
            })?;
        }
        if let Some(path) = lookup(ENV_LOG_FILE) {
            self.log_file = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
        Ok(())
    }

    /// Reject values the agent cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::ValidationFailed("base_url is empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed("base_url must be http(s)"));
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::ValidationFailed("api_key is empty"));
        }
        if self.hardware_id.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("hardware_id is empty"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
        }
        if self.heartbeat_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("heartbeat_interval_ms must be > 0"));
        }
        if self.lines.has_duplicates() {
            return Err(ConfigError::ValidationFailed("lines must map to distinct GPIO numbers"));
        }
        Ok(())
    }
}
