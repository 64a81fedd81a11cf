use criterion::{black_box, criterion_group, criterion_main, Criterion};
use worldwrought_core::prelude::*;

fn seeded_engine(citizens: usize) -> SimulationEngine {
    let mut engine = SimulationEngine::with_config(SimulationConfig {
        seed: Some(1),
        ..Default::default()
    });
    engine.generate(citizens);
    engine
}

fn bench_update_100(c: &mut Criterion) {
    let mut engine = seeded_engine(100);
    c.bench_function("engine_update_100_citizens", |b| {
        b.iter(|| {
            engine.update(black_box(0.25));
        })
    });
}

fn bench_update_1000(c: &mut Criterion) {
    let mut engine = seeded_engine(1000);
    c.bench_function("engine_update_1000_citizens", |b| {
        b.iter(|| {
            engine.update(black_box(0.25));
        })
    });
}

fn bench_interactions(c: &mut Criterion) {
    let mut engine = seeded_engine(200);
    let ids = engine.character_ids();
    for pair in ids.chunks(2).step_by(3) {
        if let [a, b] = pair {
            engine.add_nemesis(*a, *b, 0.5);
        }
    }

    c.bench_function("interact_200_pairs", |b| {
        b.iter(|| {
            for pair in ids.windows(2) {
                black_box(engine.interact(pair[0], pair[1]));
            }
        })
    });
}

fn bench_save(c: &mut Criterion) {
    let engine = seeded_engine(500);
    c.bench_function("save_500_citizens", |b| {
        let mut buffer = Vec::new();
        b.iter(|| {
            buffer.clear();
            engine.save(&mut buffer).unwrap();
            black_box(buffer.len())
        })
    });
}

criterion_group!(
    benches,
    bench_update_100,
    bench_update_1000,
    bench_interactions,
    bench_save
);
criterion_main!(benches);
