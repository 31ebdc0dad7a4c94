// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Engine configuration.
//!
//! Every field has a default; a JSON config file only needs the keys it overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Capacity and lifetime of one result cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub max_age_ms: u64,
}

impl CacheConfig {
    pub const fn new(max_entries: usize, max_age_ms: u64) -> Self {
        Self { max_entries, max_age_ms }
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }
}

const ROUTE_CACHE: CacheConfig = CacheConfig::new(50, 5 * 60 * 1000);
const PATH_CACHE: CacheConfig = CacheConfig::new(100, 10 * 60 * 1000);
const ICON_CACHE: CacheConfig = CacheConfig::new(200, 30 * 60 * 1000);

/// A cache section of a config file; missing keys fall back to that cache's defaults.
#[derive(Debug, Deserialize)]
struct CacheOverrides {
    max_entries: Option<usize>,
    max_age_ms: Option<u64>,
}

impl CacheOverrides {
    fn over(self, base: CacheConfig) -> CacheConfig {
        CacheConfig {
            max_entries: self.max_entries.unwrap_or(base.max_entries),
            max_age_ms: self.max_age_ms.unwrap_or(base.max_age_ms),
        }
    }
}

fn route_cache<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CacheConfig, D::Error> {
    CacheOverrides::deserialize(deserializer).map(|overrides| overrides.over(ROUTE_CACHE))
}

fn path_cache<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CacheConfig, D::Error> {
    CacheOverrides::deserialize(deserializer).map(|overrides| overrides.over(PATH_CACHE))
}

fn icon_cache<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CacheConfig, D::Error> {
    CacheOverrides::deserialize(deserializer).map(|overrides| overrides.over(ICON_CACHE))
}

/// Retry loop of a non-selected lane negotiating with the other lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanePolling {
    /// Sleep between attempts.
    pub interval_ms: u64,
    /// Attempts before the lane gives up with no path.
    pub max_attempts: u32,
}

impl LanePolling {
    pub const fn new(interval_ms: u64, max_attempts: u32) -> Self {
        Self { interval_ms, max_attempts }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for LanePolling {
    fn default() -> Self {
        Self::new(10, 20)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Planned single routes.
    #[serde(deserialize_with = "route_cache")]
    pub route_cache: CacheConfig,
    /// Multi-lane path sets.
    #[serde(deserialize_with = "path_cache")]
    pub path_cache: CacheConfig,
    /// Icon matrices.
    #[serde(deserialize_with = "icon_cache")]
    pub icon_cache: CacheConfig,
    /// Period of the background expiry sweep.
    pub sweep_interval_ms: u64,
    pub lane_polling: LanePolling,
    /// Fixed seed for pothole placement; `None` seeds from the OS.
    pub pothole_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            route_cache: ROUTE_CACHE,
            path_cache: PATH_CACHE,
            icon_cache: ICON_CACHE,
            sweep_interval_ms: 60 * 1000,
            lane_polling: LanePolling::default(),
            pothole_seed: None,
        }
    }
}

impl EngineConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, cache) in [
            ("route_cache", &self.route_cache),
            ("path_cache", &self.path_cache),
            ("icon_cache", &self.icon_cache),
        ] {
            if cache.max_entries == 0 {
                return Err(ConfigError::Invalid(format!("{name}.max_entries must be > 0")));
            }
        }
        if self.sweep_interval_ms == 0 {
            return Err(ConfigError::Invalid("sweep_interval_ms must be > 0".to_owned()));
        }
        if self.lane_polling.max_attempts == 0 {
            return Err(ConfigError::Invalid("lane_polling.max_attempts must be > 0".to_owned()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_route_cache(mut self, cache: CacheConfig) -> Self {
        self.route_cache = cache;
        self
    }

    #[must_use]
    pub fn with_path_cache(mut self, cache: CacheConfig) -> Self {
        self.path_cache = cache;
        self
    }

    #[must_use]
    pub fn with_icon_cache(mut self, cache: CacheConfig) -> Self {
        self.icon_cache = cache;
        self
    }

    #[must_use]
    pub fn with_lane_polling(mut self, polling: LanePolling) -> Self {
        self.lane_polling = polling;
        self
    }

    #[must_use]
    pub fn with_pothole_seed(mut self, seed: u64) -> Self {
        self.pothole_seed = Some(seed);
        self
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}
