//! Conquest tuning configuration
//!
//! All gameplay constants for the conquest check are collected here. The
//! defaults reproduce the classic balance: bosses are worth a full
//! threshold on their own, elites count double, and a live spawner counts
//! like one normal defender.

use crate::core::types::Tick;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Resistance contributed by each kind of threat found in a region
///
/// The weights are independent; there is no requirement that they stay
/// ordered, though the defaults do (normal < elite < boss).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResistanceWeights {
    /// Weight of a rank-and-file hostile
    pub normal: u32,
    /// Weight of an elite hostile (type tag contains "elite")
    pub elite: u32,
    /// Weight of a leader/boss hostile (type tag contains "leader")
    pub boss: u32,
    /// Weight of a cell that can still spawn hostiles
    pub spawner: u32,
}

impl Default for ResistanceWeights {
    fn default() -> Self {
        Self {
            normal: 1,
            elite: 2,
            boss: 5,
            spawner: 1,
        }
    }
}

/// Configuration for the conquest evaluator
///
/// Read-only at evaluation time; construct once and hand it to the
/// evaluator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConquestConfig {
    /// Per-threat resistance weights
    pub weights: ResistanceWeights,

    /// Total resistance at or above which a region stays contested
    ///
    /// At the default (5), a lone boss is enough to hold a structure,
    /// while four normal defenders are not.
    pub conquer_threshold: u32,

    /// How long found threats stay marked for the scanning player, in
    /// world ticks
    ///
    /// Applied as a glow duration on hostiles and an absolute expiry tick
    /// on spawner highlights. 6000 ticks is five minutes at 20 TPS.
    pub marker_duration_ticks: Tick,

    /// How long a computed verdict stays cached per region, in
    /// milliseconds
    ///
    /// Keeps repeated claim checks from rescanning large regions every
    /// call. Ten seconds is short enough that clearing out defenders is
    /// noticed promptly.
    pub verdict_ttl_ms: u64,
}

impl Default for ConquestConfig {
    fn default() -> Self {
        Self {
            weights: ResistanceWeights::default(),
            conquer_threshold: 5,
            marker_duration_ticks: 6000,
            verdict_ttl_ms: 10_000,
        }
    }
}

impl ConquestConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Verdict cache lifetime as a `Duration`
    pub fn verdict_ttl(&self) -> Duration {
        Duration::from_millis(self.verdict_ttl_ms)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.conquer_threshold == 0 {
            return Err("conquer_threshold must be at least 1 (a zero threshold can never be beaten)".into());
        }

        if self.marker_duration_ticks == 0 {
            return Err("marker_duration_ticks must be positive".into());
        }

        let w = &self.weights;
        if w.normal == 0 && w.elite == 0 && w.boss == 0 && w.spawner == 0 {
            return Err("at least one resistance weight must be positive".into());
        }

        Ok(())
    }

    /// Load a config from a TOML file, falling back to defaults for any
    /// missing field
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&content)
    }

    /// Parse a config from TOML text
    pub fn from_toml(content: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(content).map_err(|e| format!("Invalid config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}
