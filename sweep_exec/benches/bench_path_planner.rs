//! # Path Planner Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use sweep_lib::auto::{
    heading::Heading, map::OccupancyMap, nav::find_path, scan::ScanSnapshot, GridCell,
};

/// Side length of the benchmark map, in cells.
const SIZE: i32 = 100;

fn path_planner_benchmark(c: &mut Criterion) {
    // ---- Build a fully explored map with a sparse obstacle pattern ----

    let home = GridCell::new(0, 0);
    let mut map = OccupancyMap::new(home, 10.0);

    for x in 0..SIZE {
        for y in 0..SIZE {
            let mut snapshot = ScanSnapshot::all_clear();

            // Obstruct a scattering of cells, leaving plenty of routes
            if (x * 7 + y * 13) % 29 == 0 && x % 10 != 0 {
                snapshot.set_reading(Heading::North, 2.0);
            }

            map.update(GridCell::new(x, y), snapshot);
        }
    }

    let goal = GridCell::new(SIZE - 1, SIZE - 1);

    c.bench_function("find_path corner to corner", |b| {
        b.iter(|| find_path(&map, home, goal))
    });
}

criterion_group!(benches, path_planner_benchmark);
criterion_main!(benches);
