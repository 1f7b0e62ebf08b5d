use criterion::{black_box, criterion_group, criterion_main, Criterion};

use redoubt::conquest::{ConquestEvaluator, ThreatTier};
use redoubt::core::config::ConquestConfig;
use redoubt::core::types::{BlockPos, RegionBox};
use redoubt::host::grid::GridWorld;
use redoubt::host::SpawnerSettings;

/// A garrison strong enough to stay contested, so repeated scans never
/// mutate the world.
fn contested_keep(size: i32) -> (GridWorld, RegionBox) {
    let mut world = GridWorld::new();
    let region = RegionBox::new(BlockPos::new(0, 0, 0), BlockPos::new(size - 1, 7, size - 1));
    world.spawn_actor("draugr.leader.warlord", BlockPos::new(size / 2, 1, size / 2));
    for i in 0..4 {
        world.spawn_actor("draugr.elite.spearman", BlockPos::new(i, 1, 0));
        world.spawn_actor("draugr.soldier", BlockPos::new(i, 1, 1));
    }
    world.place_spawner(
        BlockPos::new(1, 1, size - 2),
        SpawnerSettings::hostile("draugr.soldier"),
    );
    (world, region)
}

fn bench_scan_small_keep(c: &mut Criterion) {
    let (mut world, region) = contested_keep(16);
    let evaluator = ConquestEvaluator::default();
    c.bench_function("scan_keep_16x8x16", |b| {
        b.iter(|| evaluator.assess(black_box(&mut world), black_box(region), &mut ()))
    });
}

fn bench_scan_large_keep(c: &mut Criterion) {
    let (mut world, region) = contested_keep(48);
    let evaluator = ConquestEvaluator::default();
    let mut group = c.benchmark_group("scan_large");
    group.sample_size(30);
    group.bench_function("keep_48x8x48", |b| {
        b.iter(|| evaluator.assess(black_box(&mut world), black_box(region), &mut ()))
    });
    group.finish();
}

fn bench_scan_empty_region(c: &mut Criterion) {
    let mut world = GridWorld::new();
    let region = RegionBox::new(BlockPos::new(0, 0, 0), BlockPos::new(15, 7, 15));
    let evaluator = ConquestEvaluator::default();
    c.bench_function("scan_empty_16x8x16", |b| {
        b.iter(|| evaluator.assess(black_box(&mut world), black_box(region), &mut ()))
    });
}

fn bench_cached_verdict_hit(c: &mut Criterion) {
    let (mut world, region) = contested_keep(16);
    // long TTL so every iteration after the first is a pure cache hit
    let mut config = ConquestConfig::new();
    config.verdict_ttl_ms = 600_000;
    let mut evaluator = ConquestEvaluator::new(config);
    evaluator.is_not_conquered(&mut world, region);

    c.bench_function("cached_verdict_hit", |b| {
        b.iter(|| evaluator.is_not_conquered(black_box(&mut world), black_box(region)))
    });
}

fn bench_threat_classify(c: &mut Criterion) {
    let tags = [
        "draugr.soldier",
        "draugr.elite.spearman",
        "draugr.leader.warlord",
        "villager.captive",
    ];
    c.bench_function("threat_classify_4_tags", |b| {
        b.iter(|| {
            for tag in &tags {
                let _ = ThreatTier::classify(black_box(tag));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_scan_small_keep,
    bench_scan_large_keep,
    bench_scan_empty_region,
    bench_cached_verdict_hit,
    bench_threat_classify,
);
criterion_main!(benches);
