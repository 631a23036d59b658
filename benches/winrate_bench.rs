//! Single-comparison and ingest throughput.
//!
//! Run with: `cargo bench --bench winrate`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use duelist::battle::{build_highlights, calc_winrate, Balance, BattleStats, Fighter, TagSet};
use duelist::profile::normalize_profile;

fn fighter(id: &str, power: f64, tags: [&str; 3]) -> Fighter {
    Fighter::new(
        id,
        id,
        BattleStats {
            hp: 190,
            power,
            defense: 55.0,
            speed: 65.0,
            physical: 60.0,
            magic: 35.0,
            range: 45.0,
        },
        TagSet::try_from_strs(&tags).expect("canonical tags"),
    )
}

const MODEL_OUTPUT: &str = "Analysis below.\n```json\n{\"analysis\":\"Hits first, asks later.\",\
    \"battleTags\":[\"first_strike\",\"rush\",\"rush\",\"nonsense\"],\
    \"stats\":{\"hp\":176,\"power\":\"88\",\"defense\":35,\"speed\":120,\"physical\":70,\"magic\":5,\"range\":30}}\n```";

fn bench_winrate(c: &mut Criterion) {
    let balance = Balance::reference();
    let a = fighter("a", 80.0, ["rush", "burst", "assassinate"]);
    let b = fighter("b", 60.0, ["tank", "sustain", "counter"]);

    let mut group = c.benchmark_group("winrate");
    group.throughput(Throughput::Elements(1));
    group.bench_function("calc_winrate", |bench| {
        bench.iter(|| black_box(calc_winrate(black_box(&a), black_box(&b), &balance)))
    });
    group.bench_function("build_highlights_3", |bench| {
        bench.iter(|| black_box(build_highlights(black_box(&a), black_box(&b), &balance, 3)))
    });
    group.bench_function("normalize_profile_fenced", |bench| {
        bench.iter(|| black_box(normalize_profile(black_box(MODEL_OUTPUT))))
    });
    group.finish();
}

criterion_group!(benches, bench_winrate);
criterion_main!(benches);
