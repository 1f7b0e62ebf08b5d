//! Redoubt - Garrison Console
//!
//! Interactive sandbox for the conquest rules: builds one demo keep with a
//! garrison, then lets you scan it, whittle the defenders down, and watch
//! the verdict flip once resistance drops below the threshold.

use std::io::{self, Write};
use std::path::Path;

use redoubt::conquest::{ConquestEvaluator, ThreatTier};
use redoubt::core::config::ConquestConfig;
use redoubt::core::error::Result;
use redoubt::core::types::{ActorId, BlockPos, RegionBox, Tick};
use redoubt::host::grid::GridWorld;
use redoubt::host::{Actor, CellContent, Notifier, RegionQuery, SpawnerSettings, StatusNote};

const CONFIG_PATH: &str = "redoubt.toml";

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("redoubt=debug")
        .init();

    tracing::info!("Redoubt garrison console starting...");

    let config = load_config();
    let mut evaluator = ConquestEvaluator::new(config);
    let mut world = GridWorld::new();
    let region = build_demo_keep(&mut world);

    // Display welcome message
    println!("\n=== REDOUBT ===");
    println!("Conquest rules sandbox: one keep, one garrison, one verdict");
    println!();
    println!("Commands:");
    println!("  scan            - Conquest attempt with full announcements");
    println!("  check / c       - Cached ownership check (silent scan)");
    println!("  slay <n>        - Strike down n defenders");
    println!("  spawn <tag>     - Reinforce the garrison (e.g. draugr.elite.axe)");
    println!("  tick <n>        - Advance the world clock");
    println!("  status / s      - Show the garrison ledger");
    println!("  forget          - Drop cached verdicts");
    println!("  quit / q        - Exit");
    println!();

    // Main console loop
    loop {
        display_status(&world, &evaluator, region);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "scan" {
            let mut notifier = ConsoleNotifier;
            match evaluator.evaluate_announcing(&mut world, region, &mut notifier) {
                Ok(true) => println!("The keep has fallen. Structure conquered."),
                Ok(false) => println!("The garrison still holds."),
                Err(e) => println!("Scan failed: {}", e),
            }
            continue;
        }

        if input == "check" || input == "c" {
            if evaluator.is_not_conquered(&mut world, region) {
                println!("Check: the keep resists conquest.");
            } else {
                println!("Check: conquered.");
            }
            continue;
        }

        if input == "forget" {
            evaluator.clear_cache();
            println!("Cached verdicts dropped.");
            continue;
        }

        if let Some(rest) = input.strip_prefix("slay ") {
            match rest.parse::<usize>() {
                Ok(n) => {
                    let slain = slay_defenders(&mut world, region, n);
                    println!("Struck down {} defender(s).", slain);
                }
                Err(_) => println!("Usage: slay <number>"),
            }
            continue;
        }

        if let Some(tag) = input.strip_prefix("spawn ") {
            if tag.is_empty() {
                println!("Usage: spawn <type-tag>");
            } else {
                let id = world.spawn_actor(tag, BlockPos::new(8, 1, 8));
                println!("Reinforcement {} arrived (ID: {:?})", tag, id);
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("tick ") {
            match rest.parse::<Tick>() {
                Ok(n) => {
                    world.advance(n);
                    println!("World clock now at tick {}.", world.current_tick());
                }
                Err(_) => println!("Usage: tick <number>"),
            }
            continue;
        }

        if input == "status" || input == "s" {
            display_garrison(&world, &evaluator, region);
            continue;
        }

        println!(
            "Unknown command. Available: scan, check, slay <n>, spawn <tag>, tick <n>, status, forget, quit"
        );
    }

    println!(
        "\nGoodbye! {} defender(s) remain at tick {}.",
        hostiles_in(&world, region).len(),
        world.current_tick()
    );
    Ok(())
}

/// Read `redoubt.toml` when present, otherwise use defaults
fn load_config() -> ConquestConfig {
    let path = Path::new(CONFIG_PATH);
    if !path.exists() {
        return ConquestConfig::new();
    }
    match ConquestConfig::load(path) {
        Ok(config) => {
            tracing::info!("Loaded conquest config from {}", CONFIG_PATH);
            config
        }
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", CONFIG_PATH, e);
            ConquestConfig::new()
        }
    }
}

/// Garrison the demo keep and return its bounding region
fn build_demo_keep(world: &mut GridWorld) -> RegionBox {
    let region = RegionBox::new(BlockPos::new(0, 0, 0), BlockPos::new(15, 7, 15));

    world.spawn_actor("draugr.soldier", BlockPos::new(3, 1, 4));
    world.spawn_actor("draugr.soldier", BlockPos::new(11, 1, 5));
    world.spawn_actor("draugr.elite.spearman", BlockPos::new(7, 1, 9));
    world.spawn_actor("draugr.leader.warlord", BlockPos::new(8, 2, 8));
    world.spawn_passive("villager.captive", BlockPos::new(2, 1, 13));
    world.place_spawner(
        BlockPos::new(7, 1, 7),
        SpawnerSettings::hostile("draugr.soldier"),
    );

    tracing::info!("Demo keep garrisoned: 4 hostiles, 1 spawner, 1 captive");
    region
}

/// Hostile defenders currently inside the region
fn hostiles_in(world: &GridWorld, region: RegionBox) -> Vec<Actor> {
    // the local world never fails queries
    world
        .actors_overlapping(region)
        .unwrap_or_default()
        .into_iter()
        .filter(|a| a.is_hostile())
        .collect()
}

/// Remove up to `n` defenders, oldest first, as if struck down in combat
fn slay_defenders(world: &mut GridWorld, region: RegionBox, n: usize) -> usize {
    let victims: Vec<ActorId> = hostiles_in(world, region)
        .iter()
        .take(n)
        .map(|a| a.id)
        .collect();
    for id in &victims {
        world.despawn(*id);
    }
    victims.len()
}

/// Resistance a scan would count right now
fn paper_resistance(world: &GridWorld, evaluator: &ConquestEvaluator, region: RegionBox) -> u32 {
    let weights = &evaluator.config().weights;
    let mut total: u32 = hostiles_in(world, region)
        .iter()
        .map(|a| ThreatTier::of(a).weight(weights))
        .sum();
    for pos in region.cells() {
        if let CellContent::Spawner(settings) = world.content_at(pos) {
            if settings.spawns_hostiles() {
                total += weights.spawner;
            }
        }
    }
    total
}

/// Display a brief status line
fn display_status(world: &GridWorld, evaluator: &ConquestEvaluator, region: RegionBox) {
    println!();
    println!(
        "--- Tick {} | Garrison: {} | Resistance: {}/{} ---",
        world.current_tick(),
        hostiles_in(world, region).len(),
        paper_resistance(world, evaluator, region),
        evaluator.config().conquer_threshold
    );
}

/// Display the full garrison ledger
fn display_garrison(world: &GridWorld, evaluator: &ConquestEvaluator, region: RegionBox) {
    let weights = &evaluator.config().weights;
    println!();
    println!("Garrison from {} to {}:", region.min, region.max);
    for actor in hostiles_in(world, region) {
        let tier = ThreatTier::of(&actor);
        println!(
            "  {:<24} {:?} (weight {}) at {}",
            actor.type_tag,
            tier,
            tier.weight(weights),
            actor.pos
        );
    }
    for pos in region.cells() {
        if let CellContent::Spawner(settings) = world.content_at(pos) {
            if settings.spawns_hostiles() {
                println!("  hostile spawner (weight {}) at {}", weights.spawner, pos);
            }
        }
    }
    let passives = world
        .actors_overlapping(region)
        .unwrap_or_default()
        .iter()
        .filter(|a| a.passive)
        .count();
    if passives > 0 {
        println!("  plus {} passive bystander(s), safe from any conquest", passives);
    }
    println!(
        "Cache holds {} verdict(s); TTL {:?}.",
        evaluator.cache().len(),
        evaluator.cache().ttl()
    );
}

/// Notifier that narrates player feedback to stdout
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn mark_actor(&mut self, actor: ActorId, duration_ticks: Tick) {
        println!(
            "  * Defender {:?} marked with a glow for {} ticks",
            actor, duration_ticks
        );
    }

    fn highlight_cell(&mut self, pos: BlockPos, until_tick: Tick) {
        println!("  * Cell {} highlighted until tick {}", pos, until_tick);
    }

    fn status(&mut self, note: StatusNote) {
        match note {
            StatusNote::HostileAlive { pos } => {
                println!("  ! A hostile defender remains near {}", pos)
            }
            StatusNote::SpawnerPresent => {
                println!("  ! A spawner inside still breeds defenders")
            }
        }
    }
}
