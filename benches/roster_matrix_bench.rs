//! Round-robin matrix: one worker vs the default Rayon pool.
//!
//! Run with: `cargo bench --bench roster_matrix`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use duelist::battle::{Balance, BattleStats, CanonicalTag, Fighter, TagSet};
use duelist::parallel::{round_robin, WorkerPool};

fn roster(size: usize) -> Vec<Fighter> {
    (0..size)
        .map(|index| {
            let step = (index % 11) as f64 * 9.0;
            let tags = [
                CanonicalTag::ALL[index % 24],
                CanonicalTag::ALL[(index + 7) % 24],
                CanonicalTag::ALL[(index + 13) % 24],
            ];
            Fighter::new(
                format!("f{index}"),
                format!("Fighter {index}"),
                BattleStats {
                    hp: 160 + (index % 5) as u32 * 10,
                    power: step,
                    defense: 100.0 - step,
                    speed: (step + 30.0) % 100.0,
                    physical: 50.0,
                    magic: step / 2.0,
                    range: 40.0,
                },
                TagSet::new(tags).expect("offsets keep tags distinct"),
            )
        })
        .collect()
}

fn bench_roster_matrix(c: &mut Criterion) {
    let balance = Balance::reference();
    let fighters = roster(64);
    let matchups = (fighters.len() * (fighters.len() - 1)) as u64;

    let mut group = c.benchmark_group("roster_matrix_64");
    group.sample_size(20);
    group.throughput(Throughput::Elements(matchups));

    let single = WorkerPool::with_workers(1);
    group.bench_function("one_worker", |b| {
        b.iter(|| black_box(round_robin(&fighters, &balance, &single)))
    });

    let default_pool = WorkerPool::default();
    group.bench_function("default_pool", |b| {
        b.iter(|| black_box(round_robin(&fighters, &balance, &default_pool)))
    });

    group.finish();
}

criterion_group!(benches, bench_roster_matrix);
criterion_main!(benches);
