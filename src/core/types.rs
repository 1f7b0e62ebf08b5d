//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for actors surveyed in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

/// World tick counter (game time unit)
pub type Tick = u64;

/// Integer cell coordinate in the world grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl std::fmt::Display for BlockPos {
    /// Renders the plain position string embedded in status messages
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

/// Axis-aligned box of cells with inclusive min/max corners
///
/// Equality and hashing are structural, so a `RegionBox` can key the verdict
/// cache directly. Deserialization routes through [`RegionBox::new`], so a
/// file with swapped corners still loads as a valid box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RegionCorners")]
pub struct RegionBox {
    pub min: BlockPos,
    pub max: BlockPos,
}

/// Wire shape of a region; the corners may arrive in any order
#[derive(Deserialize)]
struct RegionCorners {
    min: BlockPos,
    max: BlockPos,
}

impl From<RegionCorners> for RegionBox {
    fn from(corners: RegionCorners) -> Self {
        RegionBox::new(corners.min, corners.max)
    }
}

impl RegionBox {
    /// Build a region from two arbitrary corners, sorting min/max per axis
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Check if a cell position is inside this region (inclusive bounds)
    pub fn contains(&self, pos: BlockPos) -> bool {
        pos.x >= self.min.x
            && pos.x <= self.max.x
            && pos.y >= self.min.y
            && pos.y <= self.max.y
            && pos.z >= self.min.z
            && pos.z <= self.max.z
    }

    /// Iterate every cell in the region, inclusive on all three axes
    pub fn cells(&self) -> impl Iterator<Item = BlockPos> {
        let min = self.min;
        let max = self.max;
        (min.x..=max.x).flat_map(move |x| {
            (min.y..=max.y)
                .flat_map(move |y| (min.z..=max.z).map(move |z| BlockPos::new(x, y, z)))
        })
    }

    /// Number of cells in the region
    pub fn volume(&self) -> u64 {
        let dx = (self.max.x - self.min.x) as u64 + 1;
        let dy = (self.max.y - self.min.y) as u64 + 1;
        let dz = (self.max.z - self.min.z) as u64 + 1;
        dx * dy * dz
    }
}
