//! In-memory host world backed by a sparse cell grid
//!
//! `GridWorld` is the reference implementation of the host traits. It backs
//! the integration tests, the scenario runner and the interactive console,
//! and records every mutation so callers can assert on exactly what a scan
//! did to the world.

use std::cell::Cell;

use ahash::{AHashMap, AHashSet};

use crate::core::error::{ConquestError, Result};
use crate::core::types::{ActorId, BlockPos, RegionBox, Tick};
use crate::host::{Actor, CellContent, CellProbe, CellStore, RegionQuery, SpawnerSettings};

/// One removed actor and how it was removed
#[derive(Debug, Clone)]
pub struct DespawnRecord {
    pub actor: Actor,
    /// True when drops were suppressed before the despawn
    pub drops_suppressed: bool,
}

/// Sparse voxel world; absent cells are empty
#[derive(Debug, Default)]
pub struct GridWorld {
    cells: AHashMap<BlockPos, CellContent>,
    unloaded: AHashSet<BlockPos>,
    actors: Vec<Actor>,
    suppressed: AHashSet<ActorId>,
    despawned: Vec<DespawnRecord>,
    tick: Tick,
    probe_count: Cell<u64>,
    actor_query_count: Cell<u64>,
    /// Fault injection for adapter-failure tests
    pub fail_actor_queries: bool,
    pub fail_probes: bool,
}

impl GridWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hostile actor and return its id
    pub fn spawn_actor(&mut self, type_tag: &str, pos: BlockPos) -> ActorId {
        self.spawn(type_tag, pos, false)
    }

    /// Add a passive actor and return its id
    pub fn spawn_passive(&mut self, type_tag: &str, pos: BlockPos) -> ActorId {
        self.spawn(type_tag, pos, true)
    }

    fn spawn(&mut self, type_tag: &str, pos: BlockPos, passive: bool) -> ActorId {
        let id = ActorId::new();
        self.actors.push(Actor {
            id,
            type_tag: type_tag.to_string(),
            pos,
            passive,
        });
        id
    }

    pub fn place_spawner(&mut self, pos: BlockPos, settings: SpawnerSettings) {
        self.cells.insert(pos, CellContent::Spawner(settings));
    }

    pub fn place_solid(&mut self, pos: BlockPos) {
        self.cells.insert(pos, CellContent::Solid);
    }

    /// Mark a cell's chunk as not loaded; probes there report `Unloaded`
    pub fn mark_unloaded(&mut self, pos: BlockPos) {
        self.unloaded.insert(pos);
    }

    pub fn load_all(&mut self) {
        self.unloaded.clear();
    }

    pub fn advance(&mut self, ticks: Tick) {
        self.tick += ticks;
    }

    pub fn live_actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn despawn_records(&self) -> &[DespawnRecord] {
        &self.despawned
    }

    /// Cell content without touching the probe counter
    pub fn content_at(&self, pos: BlockPos) -> CellContent {
        self.cells
            .get(&pos)
            .cloned()
            .unwrap_or(CellContent::Empty)
    }

    pub fn has_spawner(&self, pos: BlockPos) -> bool {
        matches!(self.cells.get(&pos), Some(CellContent::Spawner(_)))
    }

    /// Number of cell probes served so far
    pub fn probe_count(&self) -> u64 {
        self.probe_count.get()
    }

    /// Number of region queries served so far
    pub fn actor_query_count(&self) -> u64 {
        self.actor_query_count.get()
    }
}

impl RegionQuery for GridWorld {
    fn actors_overlapping(&self, region: RegionBox) -> Result<Vec<Actor>> {
        self.actor_query_count.set(self.actor_query_count.get() + 1);
        if self.fail_actor_queries {
            return Err(ConquestError::ActorQuery(
                region,
                "simulated adapter fault".to_string(),
            ));
        }
        Ok(self
            .actors
            .iter()
            .filter(|actor| region.contains(actor.pos))
            .cloned()
            .collect())
    }

    fn suppress_death_drops(&mut self, actor: ActorId) {
        if self.actors.iter().any(|a| a.id == actor) {
            self.suppressed.insert(actor);
        }
    }

    fn despawn(&mut self, actor: ActorId) {
        // no-op for ids that are unknown or already removed
        let Some(index) = self.actors.iter().position(|a| a.id == actor) else {
            return;
        };
        let removed = self.actors.remove(index);
        self.despawned.push(DespawnRecord {
            actor: removed,
            drops_suppressed: self.suppressed.remove(&actor),
        });
    }

    fn current_tick(&self) -> Tick {
        self.tick
    }
}

impl CellStore for GridWorld {
    fn probe(&self, pos: BlockPos) -> Result<CellProbe> {
        self.probe_count.set(self.probe_count.get() + 1);
        if self.fail_probes {
            return Err(ConquestError::CellProbe(
                pos,
                "simulated adapter fault".to_string(),
            ));
        }
        if self.unloaded.contains(&pos) {
            return Ok(CellProbe::Unloaded);
        }
        Ok(CellProbe::Loaded(self.content_at(pos)))
    }

    fn clear_cell(&mut self, pos: BlockPos) {
        self.cells.remove(&pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_query_filters_by_region() {
        let mut world = GridWorld::new();
        let inside = world.spawn_actor("draugr.soldier", BlockPos::new(2, 1, 2));
        world.spawn_actor("draugr.soldier", BlockPos::new(50, 1, 50));

        let region = RegionBox::new(BlockPos::new(0, 0, 0), BlockPos::new(10, 10, 10));
        let hits = world.actors_overlapping(region).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, inside);
    }

    #[test]
    fn test_despawn_records_suppression() {
        let mut world = GridWorld::new();
        let quiet = world.spawn_actor("draugr.soldier", BlockPos::new(0, 0, 0));
        let loud = world.spawn_actor("draugr.soldier", BlockPos::new(1, 0, 0));

        world.suppress_death_drops(quiet);
        world.despawn(quiet);
        world.despawn(loud);

        assert!(world.live_actors().is_empty());
        let records = world.despawn_records();
        assert_eq!(records.len(), 2);
        assert!(records[0].drops_suppressed);
        assert!(!records[1].drops_suppressed);
    }

    #[test]
    fn test_despawn_of_unknown_id_is_noop() {
        let mut world = GridWorld::new();
        world.spawn_actor("draugr.soldier", BlockPos::new(0, 0, 0));
        world.despawn(ActorId::new());
        assert_eq!(world.live_actors().len(), 1);
        assert!(world.despawn_records().is_empty());
    }

    #[test]
    fn test_probe_reports_unloaded_cells() {
        let mut world = GridWorld::new();
        let pos = BlockPos::new(3, 4, 5);
        world.place_spawner(pos, SpawnerSettings::hostile("draugr.soldier"));
        world.mark_unloaded(pos);

        assert!(matches!(world.probe(pos).unwrap(), CellProbe::Unloaded));
        world.load_all();
        assert!(matches!(
            world.probe(pos).unwrap(),
            CellProbe::Loaded(CellContent::Spawner(_))
        ));
    }

    #[test]
    fn test_clear_cell_empties_spawner() {
        let mut world = GridWorld::new();
        let pos = BlockPos::new(0, 1, 0);
        world.place_spawner(pos, SpawnerSettings::hostile("draugr.soldier"));
        assert!(world.has_spawner(pos));

        world.clear_cell(pos);
        assert!(!world.has_spawner(pos));
        assert!(matches!(world.content_at(pos), CellContent::Empty));
    }

    #[test]
    fn test_probe_counter_tracks_calls() {
        let mut world = GridWorld::new();
        world.place_solid(BlockPos::new(0, 0, 0));
        assert_eq!(world.probe_count(), 0);
        let _ = world.probe(BlockPos::new(0, 0, 0));
        let _ = world.probe(BlockPos::new(0, 1, 0));
        assert_eq!(world.probe_count(), 2);
    }

    #[test]
    fn test_fault_injection_surfaces_errors() {
        let mut world = GridWorld::new();
        world.fail_actor_queries = true;
        world.fail_probes = true;

        let region = RegionBox::new(BlockPos::new(0, 0, 0), BlockPos::new(1, 1, 1));
        assert!(world.actors_overlapping(region).is_err());
        assert!(world.probe(BlockPos::new(0, 0, 0)).is_err());
    }
}
