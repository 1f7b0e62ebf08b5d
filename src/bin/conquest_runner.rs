//! Headless Conquest Runner
//!
//! Evaluates one garrison scenario (loaded from JSON or generated from a
//! seed) and emits the verdict as JSON or text.

use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use redoubt::conquest::{ConquestEvaluator, ConquestObserver, ThreatTier, Verdict};
use redoubt::core::config::ConquestConfig;
use redoubt::core::types::{BlockPos, RegionBox};
use redoubt::host::grid::GridWorld;
use redoubt::host::scenario::Scenario;
use redoubt::host::{Actor, CellContent, SpawnerSettings};

/// Headless Conquest Runner - scan garrison scenarios and report verdicts
#[derive(Parser, Debug)]
#[command(name = "conquest_runner")]
#[command(about = "Evaluate conquest scenarios and output verdicts")]
struct Args {
    /// Scenario JSON file; omit to generate a random garrison
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Conquest config TOML (weights, threshold, cache TTL)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Edge length of the generated region
    #[arg(long, default_value_t = 16)]
    size: i32,

    /// Regular defenders in the generated garrison
    #[arg(long, default_value_t = 3)]
    normals: u32,

    /// Elite defenders in the generated garrison
    #[arg(long, default_value_t = 1)]
    elites: u32,

    /// Boss-tier defenders in the generated garrison
    #[arg(long, default_value_t = 0)]
    leaders: u32,

    /// Hostile spawners in the generated garrison
    #[arg(long, default_value_t = 1)]
    spawners: u32,

    /// Random seed for deterministic garrison generation
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Narrate every find while scanning
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct ScanReport {
    scenario: String,
    outcome: String,
    resistance: Option<u32>,
    threshold: u32,
    hostiles_found: usize,
    spawners_found: usize,
    defenders_despawned: usize,
    spawners_cleared: usize,
    seed: Option<u64>,
}

/// Observer that tallies finds and optionally narrates them
struct TallyObserver {
    hostiles: usize,
    spawners: usize,
    verbose: bool,
}

impl ConquestObserver for TallyObserver {
    fn hostile_found(&mut self, actor: &Actor, tier: ThreatTier) {
        self.hostiles += 1;
        if self.verbose {
            eprintln!("  hostile {:?}: {} at {}", tier, actor.type_tag, actor.pos);
        }
    }

    fn spawner_found(&mut self, pos: BlockPos, _settings: &SpawnerSettings) {
        self.spawners += 1;
        if self.verbose {
            eprintln!("  hostile spawner at {}", pos);
        }
    }
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match ConquestConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}", e);
                eprintln!("Using default config");
                ConquestConfig::new()
            }
        },
        None => ConquestConfig::new(),
    };
    let threshold = config.conquer_threshold;
    let evaluator = ConquestEvaluator::new(config);

    // Either load the scenario or generate one from the seed
    let (name, mut world, region, seed) = match &args.scenario {
        Some(path) => match Scenario::from_file(path) {
            Ok(scenario) => {
                let world = scenario.build_world();
                (scenario.name.clone(), world, scenario.region, None)
            }
            Err(e) => {
                eprintln!("Failed to load scenario {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let seed = args.seed.unwrap_or_else(|| rand::random());
            let (world, region) = generate_garrison(&args, seed);
            (format!("generated-{}", seed), world, region, Some(seed))
        }
    };

    let spawners_before = count_hostile_spawners(&world, region);

    if args.verbose {
        eprintln!("=== Scanning {} ===", name);
    }

    let mut observer = TallyObserver {
        hostiles: 0,
        spawners: 0,
        verbose: args.verbose,
    };
    let verdict = match evaluator.assess(&mut world, region, &mut observer) {
        Ok(verdict) => verdict,
        Err(e) => {
            eprintln!("Scan failed: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match verdict.settled() {
        Some(true) => "conquered",
        Some(false) => "contested",
        None => "unobservable",
    };
    let resistance = match verdict {
        Verdict::Conquered { resistance } | Verdict::Contested { resistance } => Some(resistance),
        Verdict::Unobservable => None,
    };

    let report = ScanReport {
        scenario: name,
        outcome: outcome.to_string(),
        resistance,
        threshold,
        hostiles_found: observer.hostiles,
        spawners_found: observer.spawners,
        defenders_despawned: world.despawn_records().len(),
        spawners_cleared: spawners_before - count_hostile_spawners(&world, region),
        seed,
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
        "text" => {
            println!("Conquest Report");
            println!("===============");
            println!("Scenario: {}", report.scenario);
            println!("Outcome: {}", report.outcome);
            match report.resistance {
                Some(r) => println!("Resistance: {} (threshold {})", r, report.threshold),
                None => println!("Resistance: unknown (region partly unloaded)"),
            }
            println!("Hostiles found: {}", report.hostiles_found);
            println!("Spawners found: {}", report.spawners_found);
            println!("Defenders despawned: {}", report.defenders_despawned);
            println!("Spawners cleared: {}", report.spawners_cleared);
            if let Some(seed) = report.seed {
                println!("Seed: {}", seed);
            }
        }
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
    }
}

/// Build a random garrison inside a fresh region
fn generate_garrison(args: &Args, seed: u64) -> (GridWorld, RegionBox) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let size = args.size.max(2);
    let region = RegionBox::new(BlockPos::new(0, 0, 0), BlockPos::new(size - 1, 7, size - 1));
    let mut world = GridWorld::new();

    for _ in 0..args.normals {
        let pos = random_pos(&mut rng, size);
        world.spawn_actor("draugr.soldier", pos);
    }
    for _ in 0..args.elites {
        let pos = random_pos(&mut rng, size);
        world.spawn_actor("draugr.elite.spearman", pos);
    }
    for _ in 0..args.leaders {
        let pos = random_pos(&mut rng, size);
        world.spawn_actor("draugr.leader.warlord", pos);
    }

    let capacity = region.volume() as u32;
    let want = args.spawners.min(capacity);
    if want < args.spawners {
        eprintln!("Warning: capping spawners at region capacity {}", want);
    }
    let mut placed = 0;
    while placed < want {
        let pos = random_pos(&mut rng, size);
        if !world.has_spawner(pos) {
            world.place_spawner(pos, SpawnerSettings::hostile("draugr.soldier"));
            placed += 1;
        }
    }

    (world, region)
}

fn random_pos(rng: &mut ChaCha8Rng, size: i32) -> BlockPos {
    BlockPos::new(
        rng.gen_range(0..size),
        rng.gen_range(0..8),
        rng.gen_range(0..size),
    )
}

fn count_hostile_spawners(world: &GridWorld, region: RegionBox) -> usize {
    region
        .cells()
        .filter(|&pos| matches!(world.content_at(pos), CellContent::Spawner(s) if s.spawns_hostiles()))
        .count()
}
