use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use fleet_status::models::Position;
use fleet_status::monitoring::fleet_report::{build_fleet_report, write_report_csv};
use fleet_status::simulation_engine::vehicles::generate_fleet;

/// Report export evaluates every vehicle in one batch, then writes CSV.
fn bench_fleet_report(c: &mut Criterion) {
    let now = Utc::now();
    let depot = Position::new(12.9716, 77.5946);

    let mut group = c.benchmark_group("fleet_report");
    for &size in &[50usize, 500] {
        let fleet = generate_fleet(size, depot, now, &mut StdRng::seed_from_u64(2));

        group.bench_with_input(BenchmarkId::new("build", size), &size, |b, &_size| {
            b.iter(|| black_box(build_fleet_report(black_box(&fleet), now)));
        });

        let report = build_fleet_report(&fleet, now);
        group.bench_with_input(BenchmarkId::new("write_csv", size), &size, |b, &_size| {
            b.iter(|| {
                let mut buffer = Vec::with_capacity(size * 256);
                write_report_csv(black_box(&report), &mut buffer).unwrap();
                black_box(buffer);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fleet_report);
criterion_main!(benches);
