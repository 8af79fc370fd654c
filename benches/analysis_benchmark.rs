/// Benchmarks for the aggregation and correlation steps.
/// Measures per-class report aggregation and Spearman correlation on
/// randomly generated data sized like large repositories.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use repo_quality::analysis::aggregate::aggregate_directory;
use repo_quality::analysis::correlation::spearman;
use repo_quality::utils::Aggregation;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write `repos` CK class reports with `classes` rows each
fn setup_metrics_dir(root: &Path, repos: usize, classes: usize) {
    let mut rng = rand::thread_rng();
    for r in 0..repos {
        let name = format!("repo_{}", r);
        let dir = root.join(&name);
        fs::create_dir_all(&dir).unwrap();

        let mut body = String::from("file,class,type,cbo,dit,lcom,loc\n");
        for c in 0..classes {
            body.push_str(&format!(
                "F{0}.java,C{0},class,{1},{2},{3},{4}\n",
                c,
                rng.gen_range(0..40),
                rng.gen_range(1..8),
                rng.gen_range(0..500),
                rng.gen_range(5..2000)
            ));
        }
        fs::write(dir.join(format!("{}class.csv", name)), body).unwrap();
    }
}

fn bench_aggregation(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    setup_metrics_dir(temp_dir.path(), 20, 2_000);
    let metrics: Vec<String> = ["cbo", "dit", "lcom", "loc"].iter().map(|m| m.to_string()).collect();
    let aggregations = [Aggregation::Median, Aggregation::Mean, Aggregation::Sum];

    c.bench_function("aggregate_directory_20x2000", |b| {
        b.iter(|| aggregate_directory(black_box(temp_dir.path()), &metrics, &aggregations).unwrap())
    });
}

fn bench_spearman(c: &mut Criterion) {
    let mut group = c.benchmark_group("spearman");
    let mut rng = rand::thread_rng();

    for size in [100usize, 1_000, 10_000] {
        let x: Vec<f64> = (0..size).map(|_| rng.gen_range(0.0..1e5)).collect();
        // coarse values to exercise tie handling
        let y: Vec<f64> = (0..size).map(|_| rng.gen_range(0..50) as f64).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| spearman(black_box(&x), black_box(&y)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_aggregation, bench_spearman);
criterion_main!(benches);
