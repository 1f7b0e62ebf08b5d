//! Conquest scans over claimable structures
//!
//! A scan walks one region of the world twice: a region query collects every
//! hostile defender and weighs it by threat tier, then a cell sweep adds the
//! hostile spawners. If the summed resistance reaches the configured
//! threshold the structure is still contested and nothing is touched. Below
//! the threshold the garrison is considered broken: remaining defenders are
//! despawned with their drops suppressed and spawner cells are cleared.
//!
//! Hitting an unloaded cell aborts the whole attempt without mutating
//! anything, since an invisible spawner must not be conquered past.

use serde::{Deserialize, Serialize};

use crate::conquest::cache::VerdictCache;
use crate::conquest::threat::ThreatTier;
use crate::core::config::ConquestConfig;
use crate::core::error::Result;
use crate::core::types::{BlockPos, RegionBox, Tick};
use crate::host::{
    Actor, CellContent, CellProbe, CellStore, Notifier, RegionQuery, SpawnerSettings, StatusNote,
};

/// Outcome of one conquest scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Resistance fell short; defenders and spawners have been removed
    Conquered { resistance: u32 },
    /// The garrison still holds; the world is untouched
    Contested { resistance: u32 },
    /// Part of the region was unloaded; the scan aborted without mutating
    Unobservable,
}

impl Verdict {
    pub fn is_conquered(&self) -> bool {
        matches!(self, Verdict::Conquered { .. })
    }

    /// The verdict as a cacheable bool, `None` for an aborted scan
    pub fn settled(&self) -> Option<bool> {
        match self {
            Verdict::Conquered { .. } => Some(true),
            Verdict::Contested { .. } => Some(false),
            Verdict::Unobservable => None,
        }
    }
}

/// Scan-time hooks
///
/// Callbacks fire while evidence is being gathered, before the verdict is
/// known; an attempt that ends contested still reports every defender and
/// spawner it saw. Default bodies ignore everything.
pub trait ConquestObserver {
    fn hostile_found(&mut self, actor: &Actor, tier: ThreatTier) {
        let _ = (actor, tier);
    }

    fn spawner_found(&mut self, pos: BlockPos, settings: &SpawnerSettings) {
        let _ = (pos, settings);
    }
}

/// Observer that ignores all events
impl ConquestObserver for () {}

/// Bridges scan events to player feedback: glow markers on defenders,
/// timed highlights on spawner cells, one status line per find.
struct AnnouncingObserver<'a, N: Notifier> {
    notifier: &'a mut N,
    now: Tick,
    marker_ticks: Tick,
}

impl<N: Notifier> ConquestObserver for AnnouncingObserver<'_, N> {
    fn hostile_found(&mut self, actor: &Actor, _tier: ThreatTier) {
        self.notifier.mark_actor(actor.id, self.marker_ticks);
        self.notifier.status(StatusNote::HostileAlive { pos: actor.pos });
    }

    fn spawner_found(&mut self, pos: BlockPos, _settings: &SpawnerSettings) {
        self.notifier.highlight_cell(pos, self.now + self.marker_ticks);
        self.notifier.status(StatusNote::SpawnerPresent);
    }
}

/// Runs conquest scans and remembers settled verdicts for a short while
pub struct ConquestEvaluator {
    config: ConquestConfig,
    cache: VerdictCache,
}

impl Default for ConquestEvaluator {
    fn default() -> Self {
        Self::new(ConquestConfig::new())
    }
}

impl ConquestEvaluator {
    pub fn new(config: ConquestConfig) -> Self {
        let cache = VerdictCache::new(config.verdict_ttl());
        Self { config, cache }
    }

    pub fn config(&self) -> &ConquestConfig {
        &self.config
    }

    pub fn cache(&self) -> &VerdictCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Scan the region and, if the garrison is broken, take it
    ///
    /// The observer sees every hostile and spawner as the scan finds them.
    /// Mutations only happen on the conquered path: drops are suppressed
    /// before each despawn, then spawner cells are cleared.
    pub fn assess<W, O>(&self, world: &mut W, region: RegionBox, observer: &mut O) -> Result<Verdict>
    where
        W: RegionQuery + CellStore,
        O: ConquestObserver,
    {
        let weights = &self.config.weights;
        let mut resistance: u32 = 0;
        let mut defenders: Vec<Actor> = Vec::new();
        let mut spawner_cells: Vec<BlockPos> = Vec::new();

        for actor in world.actors_overlapping(region)? {
            if !actor.is_hostile() {
                continue;
            }
            let tier = ThreatTier::of(&actor);
            resistance = resistance.saturating_add(tier.weight(weights));
            tracing::debug!("Hostile {:?} ({} at {})", tier, actor.type_tag, actor.pos);
            observer.hostile_found(&actor, tier);
            defenders.push(actor);
        }

        for pos in region.cells() {
            match world.probe(pos)? {
                CellProbe::Unloaded => {
                    tracing::warn!("Cell {} not loaded, aborting conquest scan", pos);
                    return Ok(Verdict::Unobservable);
                }
                CellProbe::Loaded(CellContent::Spawner(settings)) => {
                    if settings.spawns_hostiles() {
                        resistance = resistance.saturating_add(weights.spawner);
                        tracing::debug!("Hostile spawner at {}", pos);
                        observer.spawner_found(pos, &settings);
                        spawner_cells.push(pos);
                    }
                }
                CellProbe::Loaded(_) => {}
            }
        }

        if resistance >= self.config.conquer_threshold {
            tracing::debug!(
                "Structure contested: resistance {} >= threshold {}",
                resistance,
                self.config.conquer_threshold
            );
            return Ok(Verdict::Contested { resistance });
        }

        for actor in &defenders {
            world.suppress_death_drops(actor.id);
            world.despawn(actor.id);
        }
        for &pos in &spawner_cells {
            world.clear_cell(pos);
        }
        tracing::info!(
            "Structure conquered: removed {} defenders and {} spawners (resistance {})",
            defenders.len(),
            spawner_cells.len(),
            resistance
        );
        Ok(Verdict::Conquered { resistance })
    }

    /// Scan with a custom observer, collapsed to the conquered flag
    pub fn evaluate_with<W, O>(
        &self,
        world: &mut W,
        region: RegionBox,
        observer: &mut O,
    ) -> Result<bool>
    where
        W: RegionQuery + CellStore,
        O: ConquestObserver,
    {
        Ok(self.assess(world, region, observer)?.is_conquered())
    }

    /// Scan without any feedback
    pub fn evaluate<W>(&self, world: &mut W, region: RegionBox) -> Result<bool>
    where
        W: RegionQuery + CellStore,
    {
        self.evaluate_with(world, region, &mut ())
    }

    /// Scan and announce every find through the notifier
    pub fn evaluate_announcing<W, N>(
        &self,
        world: &mut W,
        region: RegionBox,
        notifier: &mut N,
    ) -> Result<bool>
    where
        W: RegionQuery + CellStore,
        N: Notifier,
    {
        let mut observer = AnnouncingObserver {
            now: world.current_tick(),
            marker_ticks: self.config.marker_duration_ticks,
            notifier,
        };
        self.evaluate_with(world, region, &mut observer)
    }

    /// Cached ownership check: true while the structure resists conquest
    ///
    /// Scans triggered here run silent, so repeated checks never spam the
    /// player with markers. A fresh cached verdict short-circuits the scan
    /// entirely. Aborted scans are never cached; a failed scan is logged
    /// and reported as conquered, also uncached, so the next call retries.
    pub fn is_not_conquered<W>(&mut self, world: &mut W, region: RegionBox) -> bool
    where
        W: RegionQuery + CellStore,
    {
        if let Some(conquered) = self.cache.get(region) {
            return !conquered;
        }
        match self.assess(world, region, &mut ()) {
            Ok(verdict) => {
                if let Some(conquered) = verdict.settled() {
                    self.cache.insert(region, conquered);
                }
                !verdict.is_conquered()
            }
            Err(e) => {
                tracing::error!("Conquest scan failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::grid::GridWorld;
    use crate::host::RecordingNotifier;

    fn region() -> RegionBox {
        RegionBox::new(BlockPos::new(0, 0, 0), BlockPos::new(4, 2, 4))
    }

    #[test]
    fn test_empty_region_is_conquered() {
        let mut world = GridWorld::new();
        let evaluator = ConquestEvaluator::default();

        let verdict = evaluator.assess(&mut world, region(), &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Conquered { resistance: 0 });
        assert!(world.despawn_records().is_empty());
    }

    #[test]
    fn test_small_garrison_falls() {
        let mut world = GridWorld::new();
        world.spawn_actor("draugr.soldier", BlockPos::new(1, 0, 1));
        world.spawn_actor("draugr.elite.spearman", BlockPos::new(2, 0, 2));
        let evaluator = ConquestEvaluator::default();

        let verdict = evaluator.assess(&mut world, region(), &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Conquered { resistance: 3 });
        assert!(world.live_actors().is_empty());
    }

    #[test]
    fn test_boss_alone_holds_the_keep() {
        let mut world = GridWorld::new();
        let boss = world.spawn_actor("draugr.leader.warlord", BlockPos::new(2, 0, 2));
        let evaluator = ConquestEvaluator::default();

        let verdict = evaluator.assess(&mut world, region(), &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Contested { resistance: 5 });
        assert_eq!(world.live_actors().len(), 1);
        assert_eq!(world.live_actors()[0].id, boss);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut world = GridWorld::new();
        for i in 0..5 {
            world.spawn_actor("draugr.soldier", BlockPos::new(i, 0, 0));
        }
        let evaluator = ConquestEvaluator::default();

        let verdict = evaluator.assess(&mut world, region(), &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Contested { resistance: 5 });
    }

    #[test]
    fn test_passive_actors_do_not_resist() {
        let mut world = GridWorld::new();
        for i in 0..5 {
            world.spawn_passive("villager.farmer", BlockPos::new(i, 0, 0));
        }
        let evaluator = ConquestEvaluator::default();

        assert!(evaluator.evaluate(&mut world, region()).unwrap());
        // bystanders survive the takeover
        assert_eq!(world.live_actors().len(), 5);
    }

    #[test]
    fn test_hostile_spawner_adds_weight_and_is_cleared() {
        let mut world = GridWorld::new();
        let pos = BlockPos::new(3, 1, 3);
        world.place_spawner(pos, SpawnerSettings::hostile("draugr.soldier"));
        let evaluator = ConquestEvaluator::default();

        let verdict = evaluator.assess(&mut world, region(), &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Conquered { resistance: 1 });
        assert!(!world.has_spawner(pos));
    }

    #[test]
    fn test_passive_spawner_is_ignored_and_kept() {
        let mut world = GridWorld::new();
        let pos = BlockPos::new(3, 1, 3);
        world.place_spawner(pos, SpawnerSettings::passive("villager.farmer"));
        let evaluator = ConquestEvaluator::default();

        let verdict = evaluator.assess(&mut world, region(), &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Conquered { resistance: 0 });
        assert!(world.has_spawner(pos));
    }

    #[test]
    fn test_conquest_suppresses_drops_on_every_despawn() {
        let mut world = GridWorld::new();
        world.spawn_actor("draugr.soldier", BlockPos::new(1, 0, 1));
        world.spawn_actor("draugr.elite.spearman", BlockPos::new(2, 0, 2));
        let evaluator = ConquestEvaluator::default();

        assert!(evaluator.evaluate(&mut world, region()).unwrap());
        let records = world.despawn_records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.drops_suppressed));
    }

    #[test]
    fn test_contested_region_is_untouched() {
        let mut world = GridWorld::new();
        world.spawn_actor("draugr.leader.warlord", BlockPos::new(1, 0, 1));
        let spawner = BlockPos::new(3, 1, 3);
        world.place_spawner(spawner, SpawnerSettings::hostile("draugr.soldier"));
        let evaluator = ConquestEvaluator::default();

        let verdict = evaluator.assess(&mut world, region(), &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Contested { resistance: 6 });
        assert_eq!(world.live_actors().len(), 1);
        assert!(world.has_spawner(spawner));
        assert!(world.despawn_records().is_empty());
    }

    #[test]
    fn test_unloaded_cell_aborts_without_mutation() {
        let mut world = GridWorld::new();
        world.spawn_actor("draugr.soldier", BlockPos::new(1, 0, 1));
        world.mark_unloaded(BlockPos::new(4, 2, 4));
        let evaluator = ConquestEvaluator::default();

        let verdict = evaluator.assess(&mut world, region(), &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Unobservable);
        assert!(!evaluator.evaluate(&mut world, region()).unwrap());
        assert_eq!(world.live_actors().len(), 1);
        assert!(world.despawn_records().is_empty());
    }

    #[test]
    fn test_announcing_scan_marks_and_highlights() {
        let mut world = GridWorld::new();
        world.advance(100);
        let defender = world.spawn_actor("draugr.soldier", BlockPos::new(1, 0, 1));
        let spawner = BlockPos::new(3, 1, 3);
        world.place_spawner(spawner, SpawnerSettings::hostile("draugr.soldier"));
        let evaluator = ConquestEvaluator::default();
        let mut notifier = RecordingNotifier::new();

        evaluator
            .evaluate_announcing(&mut world, region(), &mut notifier)
            .unwrap();

        assert_eq!(notifier.marks, vec![(defender, 6000)]);
        assert_eq!(notifier.highlights, vec![(spawner, 6100)]);
        assert_eq!(
            notifier.notes,
            vec![
                StatusNote::HostileAlive {
                    pos: BlockPos::new(1, 0, 1)
                },
                StatusNote::SpawnerPresent,
            ]
        );
    }

    #[test]
    fn test_contested_scan_still_announces() {
        let mut world = GridWorld::new();
        world.spawn_actor("draugr.leader.warlord", BlockPos::new(2, 0, 2));
        let evaluator = ConquestEvaluator::default();
        let mut notifier = RecordingNotifier::new();

        let conquered = evaluator
            .evaluate_announcing(&mut world, region(), &mut notifier)
            .unwrap();
        assert!(!conquered);
        assert_eq!(notifier.marks.len(), 1);
        assert_eq!(notifier.notes.len(), 1);
    }

    #[test]
    fn test_extreme_weights_saturate_instead_of_wrapping() {
        // validate() accepts arbitrarily large weights, so the score must
        // clamp at u32::MAX rather than wrap past the threshold
        let mut config = ConquestConfig::new();
        config.weights.boss = 3_000_000_000;
        config.weights.spawner = 3_000_000_000;
        assert!(config.validate().is_ok());

        let mut world = GridWorld::new();
        world.spawn_actor("draugr.leader.warlord", BlockPos::new(1, 0, 1));
        world.spawn_actor("draugr.leader.crone", BlockPos::new(2, 0, 2));
        let spawner = BlockPos::new(3, 1, 3);
        world.place_spawner(spawner, SpawnerSettings::hostile("draugr.soldier"));
        let evaluator = ConquestEvaluator::new(config);

        let verdict = evaluator.assess(&mut world, region(), &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Contested { resistance: u32::MAX });
        assert_eq!(world.live_actors().len(), 2);
        assert!(world.has_spawner(spawner));
    }

    #[test]
    fn test_cached_verdict_skips_rescan() {
        let mut world = GridWorld::new();
        world.spawn_actor("draugr.leader.warlord", BlockPos::new(2, 0, 2));
        let mut evaluator = ConquestEvaluator::default();

        assert!(evaluator.is_not_conquered(&mut world, region()));
        let probes_after_first = world.probe_count();
        assert_eq!(world.actor_query_count(), 1);

        assert!(evaluator.is_not_conquered(&mut world, region()));
        assert_eq!(world.probe_count(), probes_after_first);
        assert_eq!(world.actor_query_count(), 1);
    }

    #[test]
    fn test_conquered_verdict_is_cached_as_well() {
        let mut world = GridWorld::new();
        let mut evaluator = ConquestEvaluator::default();

        assert!(!evaluator.is_not_conquered(&mut world, region()));
        let queries = world.actor_query_count();
        assert!(!evaluator.is_not_conquered(&mut world, region()));
        assert_eq!(world.actor_query_count(), queries);
        assert_eq!(evaluator.cache().len(), 1);
    }

    #[test]
    fn test_aborted_scan_is_not_cached() {
        let mut world = GridWorld::new();
        world.mark_unloaded(BlockPos::new(0, 0, 0));
        let mut evaluator = ConquestEvaluator::default();

        assert!(evaluator.is_not_conquered(&mut world, region()));
        assert!(evaluator.cache().is_empty());

        // once the chunk loads, the very next check may settle
        world.load_all();
        assert!(!evaluator.is_not_conquered(&mut world, region()));
        assert_eq!(evaluator.cache().len(), 1);
    }

    #[test]
    fn test_failed_scan_reports_conquered_but_caches_nothing() {
        let mut world = GridWorld::new();
        world.spawn_actor("draugr.leader.warlord", BlockPos::new(2, 0, 2));
        world.fail_actor_queries = true;
        let mut evaluator = ConquestEvaluator::default();

        assert!(!evaluator.is_not_conquered(&mut world, region()));
        assert!(evaluator.cache().is_empty());

        // recovery: the next call rescans and sees the garrison again
        world.fail_actor_queries = false;
        assert!(evaluator.is_not_conquered(&mut world, region()));
    }
}
