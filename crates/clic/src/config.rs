//! Configuration system for the CLIC model.
//!
//! This module defines the configuration structures used to parameterize the
//! model. It provides:
//! 1. **Defaults:** Baseline hardware constants (controller base, line count,
//!    reset values, poll window).
//! 2. **Structures:** Hierarchical config for the controller and the simulation
//!    harness.
//! 3. **Loading:** JSON deserialization from a string or a file path.
//!
//! Use `Config::default()` for the stock platform layout, or deserialize an
//! override from JSON; absent fields keep their defaults.

use std::path::Path;

use serde::Deserialize;

use crate::common::DispatchError;

/// Default configuration constants for the model.
///
/// These mirror the platform the register map was taken from: a 64 KiB CLIC
/// region in the peripheral window with 32 lines wired.
mod defaults {
    /// Base address of the CLIC register bank.
    pub const CLIC_BASE: u32 = 0x1A20_0000;

    /// Number of interrupt lines wired to the controller.
    ///
    /// The architecture allows up to 4096; this platform routes 32.
    pub const CLIC_LINES: usize = 32;

    /// Reset value of the `nlbits` level/priority split (all bits priority).
    pub const NLBITS_RESET: u8 = 0;

    /// Whether the mnxti extension is present.
    pub const MNXTI_SUPPORTED: bool = true;

    /// Bounded poll window for `run`-style helpers, in steps.
    ///
    /// Large enough that any eligible interrupt fires well within it; small
    /// enough that a gated interrupt failing to fire is detected quickly.
    pub const POLL_WINDOW: u64 = 10_000;
}

/// Controller-side configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClicConfig {
    /// Base physical address of the register bank (also reported by the
    /// `mclicbase` CSR).
    pub base_addr: u32,
    /// Number of interrupt lines (1..=4096).
    pub lines: usize,
    /// Reset value of the `nlbits` split.
    pub nlbits_reset: u8,
    /// Whether the mnxti extension exists on this build.
    pub mnxti_supported: bool,
}

impl Default for ClicConfig {
    fn default() -> Self {
        Self {
            base_addr: defaults::CLIC_BASE,
            lines: defaults::CLIC_LINES,
            nlbits_reset: defaults::NLBITS_RESET,
            mnxti_supported: defaults::MNXTI_SUPPORTED,
        }
    }
}

/// Simulation harness configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Bounded poll window used by `Simulator::run`.
    pub poll_window: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            poll_window: defaults::POLL_WINDOW,
        }
    }
}

/// Root configuration type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Controller configuration.
    pub clic: ClicConfig,
    /// Simulation harness configuration.
    pub sim: SimConfig,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidConfig`] if the JSON is malformed or a
    /// field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, DispatchError> {
        serde_json::from_str(json).map_err(|e| DispatchError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidConfig`] if the file cannot be read or
    /// parsed.
    pub fn from_path(path: &Path) -> Result<Self, DispatchError> {
        let text = std::fs::read_to_string(path).map_err(|e| DispatchError::InvalidConfig {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_json(&text)
    }
}
