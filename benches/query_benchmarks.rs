use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rawgeo::{GeoIndex, Point};

/// A grid of points around greater Paris, roughly 1.1 km apart.
fn populated_index(per_side: usize) -> GeoIndex {
    let mut index = GeoIndex::memory().unwrap();
    for i in 0..per_side {
        for j in 0..per_side {
            let lat = 48.5 + (i as f64) * 0.01;
            let lon = 2.0 + (j as f64) * 0.01;
            index
                .index(&Point::new(format!("p_{i}_{j}"), lat, lon))
                .unwrap();
        }
    }
    index
}

fn benchmark_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("index");

    group.bench_function("single_point", |b| {
        let mut index = GeoIndex::memory().unwrap();
        let mut counter = 0u64;
        b.iter(|| {
            counter += 1;
            let lat = 48.5 + ((counter % 10_000) as f64 * 0.0001);
            let point = Point::new(format!("p:{counter}"), lat, 2.349014);
            index.index(black_box(&point)).unwrap()
        })
    });

    group.finish();
}

fn benchmark_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    let index = populated_index(50);

    group.bench_function("radius_1km", |b| {
        b.iter(|| {
            index
                .query(black_box(48.75), black_box(2.25), black_box(1_000.0))
                .unwrap()
        })
    });

    group.bench_function("radius_50km", |b| {
        b.iter(|| {
            index
                .query(black_box(48.75), black_box(2.25), black_box(50_000.0))
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_index, benchmark_query);
criterion_main!(benches);
