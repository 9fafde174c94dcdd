//! Benchmarks for generation, solving, and coloring.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use shikaku::partition::partition;
use shikaku::rng::SeededRng;
use shikaku::{
    assign_colors, generate, solve, Difficulty, GenerateConfig, Rect, Seed, SolveOptions,
};

fn config(difficulty: Difficulty, seed: &str) -> GenerateConfig {
    GenerateConfig::new(difficulty, Seed::new(seed).expect("non-empty seed"))
}

/// Benchmark generating a medium puzzle end to end.
fn bench_generate_medium(c: &mut Criterion) {
    let config = config(Difficulty::Medium, "daily-2024-01-01");
    c.bench_function("generate_medium", |b| b.iter(|| generate(black_box(&config))));
}

/// Benchmark generating a large expert puzzle, which skips the solver.
fn bench_generate_expert_large(c: &mut Criterion) {
    let config = config(Difficulty::Expert, "monthly-2024-02")
        .with_size(20, 20)
        .expect("valid size");
    let mut group = c.benchmark_group("expert");
    group.sample_size(20);
    group.bench_function("generate_20x20", |b| b.iter(|| generate(black_box(&config))));
    group.finish();
}

/// Benchmark a uniqueness solve of a generated hard puzzle.
fn bench_solve_hard(c: &mut Criterion) {
    let puzzle = generate(&config(Difficulty::Hard, "weekly-2024-W07"));
    let options = SolveOptions::default();
    c.bench_function("solve_hard", |b| {
        b.iter(|| solve(black_box(&puzzle), black_box(&options)))
    });
}

/// Benchmark partitioning alone.
fn bench_partition(c: &mut Criterion) {
    let tier = Difficulty::Hard.config();
    let seed = Seed::new("partition").expect("non-empty seed");
    c.bench_function("partition_14x14", |b| {
        b.iter(|| {
            let mut rng = SeededRng::new(&seed);
            partition(black_box(Rect::new(0, 0, 14, 14)), &tier, &mut rng)
        })
    });
}

/// Benchmark coloring a generated solution.
fn bench_assign_colors(c: &mut Criterion) {
    let config = config(Difficulty::Expert, "colors")
        .with_size(20, 20)
        .expect("valid size");
    let puzzle = generate(&config);
    c.bench_function("assign_colors", |b| {
        b.iter(|| assign_colors(black_box(&puzzle.solution), &[0u8, 1, 2]))
    });
}

criterion_group!(
    benches,
    bench_generate_medium,
    bench_generate_expert_large,
    bench_solve_hard,
    bench_partition,
    bench_assign_colors
);
criterion_main!(benches);
