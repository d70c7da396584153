// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::consts::{
    DEFAULT_IDLE_POLL_INTERVAL_MS, DEFAULT_MAX_DEPTH, DEFAULT_REFERENCE_HEIGHT,
    DEFAULT_REFERENCE_WIDTH,
};
use crate::errors::SettingsError;
use crate::vision::Resolution;

/// Engine-wide settings shared by every task graph a runner executes.
///
/// All fields are optional in the settings file; missing ones take the
/// built-in defaults.
///
/// # Example
/// ```toml
/// reference_width = 1280
/// reference_height = 720
/// max_depth = 50
/// idle_poll_interval_ms = 500
/// # Absent: idle-wait tasks poll until their target appears.
/// max_idle_polls = 120
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub reference_width: u32,
    pub reference_height: u32,
    pub max_depth: u32,
    pub idle_poll_interval_ms: u64,
    /// Upper bound on consecutive misses an idle-wait task tolerates before
    /// taking its error path. `None` polls until the target appears.
    pub max_idle_polls: Option<u32>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            reference_width: DEFAULT_REFERENCE_WIDTH,
            reference_height: DEFAULT_REFERENCE_HEIGHT,
            max_depth: DEFAULT_MAX_DEPTH,
            idle_poll_interval_ms: DEFAULT_IDLE_POLL_INTERVAL_MS,
            max_idle_polls: None,
        }
    }
}

impl EngineSettings {
    pub fn reference_resolution(&self) -> Resolution {
        Resolution::new(self.reference_width, self.reference_height)
    }

    pub fn idle_poll_interval(&self) -> Duration {
        Duration::from_millis(self.idle_poll_interval_ms)
    }

    /// Whether an idle-wait task that has already polled `polls` times may poll again.
    pub fn allows_idle_poll(&self, polls: u32) -> bool {
        self.max_idle_polls.map_or(true, |limit| polls < limit)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.reference_width == 0 || self.reference_height == 0 {
            return Err(SettingsError::Invalid {
                field: "reference_width/reference_height",
                reason: "reference resolution must be non-zero",
            });
        }
        if self.max_depth == 0 {
            return Err(SettingsError::Invalid {
                field: "max_depth",
                reason: "at least one task must be reachable",
            });
        }
        Ok(())
    }
}

/// Load and validate engine settings from a TOML file.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<EngineSettings, SettingsError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: EngineSettings = toml::from_str(&content)?;
    settings.validate()?;
    Ok(settings)
}
