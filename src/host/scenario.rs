//! Load garrison scenarios from JSON files
//!
//! A scenario describes one claimable structure: the region to scan, the
//! defenders inside it, spawner placements and any deliberately unloaded
//! cells. `Scenario::build_world` turns it into a populated `GridWorld`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{BlockPos, RegionBox, Tick};
use crate::host::grid::GridWorld;
use crate::host::{SpawnEntry, SpawnerSettings};

/// Errors that can occur when loading a scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// File I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// One actor to place in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorPlacement {
    pub type_tag: String,
    pub pos: BlockPos,
    #[serde(default)]
    pub passive: bool,
}

/// One spawner cell and its roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerPlacement {
    pub pos: BlockPos,
    pub entries: Vec<SpawnEntry>,
}

/// A complete garrison setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub region: RegionBox,
    #[serde(default)]
    pub actors: Vec<ActorPlacement>,
    #[serde(default)]
    pub spawners: Vec<SpawnerPlacement>,
    #[serde(default)]
    pub solids: Vec<BlockPos>,
    #[serde(default)]
    pub unloaded: Vec<BlockPos>,
    /// World tick at which the scenario starts
    #[serde(default)]
    pub start_tick: Tick,
}

impl Scenario {
    /// Parse a scenario from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scenario from a JSON file on disk
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize the scenario back to pretty JSON
    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Populate a fresh world with everything the scenario describes
    pub fn build_world(&self) -> GridWorld {
        let mut world = GridWorld::new();
        world.advance(self.start_tick);
        for placement in &self.actors {
            if placement.passive {
                world.spawn_passive(&placement.type_tag, placement.pos);
            } else {
                world.spawn_actor(&placement.type_tag, placement.pos);
            }
        }
        for spawner in &self.spawners {
            world.place_spawner(
                spawner.pos,
                SpawnerSettings {
                    entries: spawner.entries.clone(),
                },
            );
        }
        for &pos in &self.solids {
            world.place_solid(pos);
        }
        for &pos in &self.unloaded {
            world.mark_unloaded(pos);
        }
        world
    }
}
