//! Host-environment abstraction
//!
//! The conquest rules never talk to a live game engine directly. Entity
//! queries, cell probes and player feedback all go through the three traits
//! here, so the rules stay testable against in-memory worlds and portable
//! across hosts.

pub mod grid;
pub mod scenario;

use crate::core::error::Result;
use crate::core::types::{ActorId, BlockPos, RegionBox, Tick};
use serde::{Deserialize, Serialize};

/// Snapshot of an entity returned by a region query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    /// Dotted species/rank tag, e.g. "draugr.elite.spearman"
    pub type_tag: String,
    pub pos: BlockPos,
    /// Passive actors never count toward resistance
    pub passive: bool,
}

impl Actor {
    pub fn is_hostile(&self) -> bool {
        !self.passive
    }
}

/// Spawn roster configured on a spawner cell
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnerSettings {
    pub entries: Vec<SpawnEntry>,
}

/// One line of a spawner's roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub type_tag: String,
    #[serde(default)]
    pub passive: bool,
}

impl SpawnerSettings {
    /// Roster with a single hostile entry
    pub fn hostile(type_tag: &str) -> Self {
        Self {
            entries: vec![SpawnEntry {
                type_tag: type_tag.to_string(),
                passive: false,
            }],
        }
    }

    /// Roster with a single passive entry
    pub fn passive(type_tag: &str) -> Self {
        Self {
            entries: vec![SpawnEntry {
                type_tag: type_tag.to_string(),
                passive: true,
            }],
        }
    }

    /// True when any configured entry is a hostile
    pub fn spawns_hostiles(&self) -> bool {
        self.entries.iter().any(|entry| !entry.passive)
    }
}

/// What occupies a loaded cell
#[derive(Debug, Clone)]
pub enum CellContent {
    Empty,
    Solid,
    Spawner(SpawnerSettings),
}

/// Result of probing a single cell
#[derive(Debug, Clone)]
pub enum CellProbe {
    /// The cell's chunk is not currently loaded; its content is unknown
    Unloaded,
    Loaded(CellContent),
}

/// Entity-side world access
///
/// Queries are fallible because host adapters can fail internally; the
/// mutation calls are fire-and-forget, and despawning an already-removed
/// actor must be a no-op.
pub trait RegionQuery {
    /// All actors whose bounds overlap the region, passive ones included
    fn actors_overlapping(&self, region: RegionBox) -> Result<Vec<Actor>>;

    /// Stop the actor from dropping loot or firing death effects when it
    /// is next despawned
    fn suppress_death_drops(&mut self, actor: ActorId);

    /// Remove the actor from the world
    fn despawn(&mut self, actor: ActorId);

    /// Current world tick, used to stamp timed highlight messages
    fn current_tick(&self) -> Tick;
}

/// Cell-side world access
pub trait CellStore {
    /// Load state and content of the cell at `pos`
    fn probe(&self, pos: BlockPos) -> Result<CellProbe>;

    /// Replace the cell's content with empty space
    fn clear_cell(&mut self, pos: BlockPos);
}

/// Localized status lines shown to the scanning player
///
/// Rendering (translation, formatting, delivery) is owned by the host; the
/// rules only pick which line to send and with what payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusNote {
    /// A hostile defender remains at the given position
    HostileAlive { pos: BlockPos },
    /// A live hostile spawner remains somewhere in the structure
    SpawnerPresent,
}

/// Player-bound feedback channel
///
/// Everything here is fire-and-forget: delivery failures never influence
/// the conquest verdict.
pub trait Notifier {
    /// Apply a timed glow marker to an actor so the player can find it
    fn mark_actor(&mut self, actor: ActorId, duration_ticks: Tick);

    /// Ask the client to highlight a cell until the given world tick
    fn highlight_cell(&mut self, pos: BlockPos, until_tick: Tick);

    /// Send a short localized status line
    fn status(&mut self, note: StatusNote);
}

/// Notifier that records everything it is asked to deliver
///
/// Used by tests and the scenario runner to assert on the exact feedback a
/// scan produced.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub marks: Vec<(ActorId, Tick)>,
    pub highlights: Vec<(BlockPos, Tick)>,
    pub notes: Vec<StatusNote>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for RecordingNotifier {
    fn mark_actor(&mut self, actor: ActorId, duration_ticks: Tick) {
        self.marks.push((actor, duration_ticks));
    }

    fn highlight_cell(&mut self, pos: BlockPos, until_tick: Tick) {
        self.highlights.push((pos, until_tick));
    }

    fn status(&mut self, note: StatusNote) {
        self.notes.push(note);
    }
}
