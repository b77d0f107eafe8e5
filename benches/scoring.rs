//! Benchmarks for scoring throughput

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use wearwatch::{FeatureMap, FeatureSchema, GradientBoostedModel, ManualInput, Scorer};

fn bundled_scorer() -> Scorer {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models");
    let model = GradientBoostedModel::from_json_file(dir.join("xgb_model.json")).unwrap();
    let schema = FeatureSchema::from_json_file(dir.join("feature_names.json")).unwrap();
    Scorer::new(Arc::new(model), schema).unwrap()
}

fn generate_inputs(count: usize) -> Vec<FeatureMap> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|_| {
            ManualInput {
                air_temperature: rng.gen_range(290.0..305.0),
                process_temperature: rng.gen_range(300.0..330.0),
                rotational_speed: rng.gen_range(1200.0..2200.0),
                torque: rng.gen_range(20.0..80.0),
                tool_wear: rng.gen_range(0.0..300.0),
                ..Default::default()
            }
            .feature_map()
        })
        .collect()
}

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");

    let scorer = bundled_scorer();
    let inputs = generate_inputs(1000);

    group.throughput(Throughput::Elements(1000));

    group.bench_function("score_1000_snapshots", |b| {
        b.iter(|| {
            for features in &inputs {
                black_box(scorer.score(features).unwrap());
            }
        })
    });

    group.finish();
}

fn bench_vectorize(c: &mut Criterion) {
    let scorer = bundled_scorer();
    let features = ManualInput::default().feature_map();

    c.bench_function("vectorize_snapshot", |b| {
        b.iter(|| black_box(scorer.vector(black_box(&features)).unwrap()))
    });
}

criterion_group!(benches, bench_scoring, bench_vectorize);
criterion_main!(benches);
