use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;
use terrain_pathfinding::coordinator::run_pass;
use terrain_pathfinding::solver::astar::{AstarSolver, MappedAstarSolver};
use terrain_pathfinding::solver::dijkstra::DijkstraSolver;
use terrain_pathfinding::solver::wave::WaveSolver;
use terrain_pathfinding::{ElevationCost, GridSolver, PathConfig, PathingGrid, Point, Position};

const N: usize = 64;

/// Rolling terrain with scattered obstacles, start and goal in opposite corners.
fn bench_grid() -> (PathingGrid, Point, Point) {
    let mut rng = StdRng::seed_from_u64(0);
    let mut grid = PathingGrid::from_heights(N, N, 20.0, 25.0, |x, z| {
        30.0 * ((x / 200.0).sin() + (z / 150.0).cos())
    })
    .unwrap();
    for x in 0..N as i32 {
        for y in 0..N as i32 {
            grid.set_walkable(Point::new(x, y), !rng.gen_bool(0.2)).unwrap();
        }
    }
    let start = Point::new(0, 0);
    let goal = Point::new(N as i32 - 1, N as i32 - 1);
    grid.set_walkable(start, true).unwrap();
    grid.set_walkable(goal, true).unwrap();
    grid.update();
    (grid, start, goal)
}

fn bench_solver<S: GridSolver>(c: &mut Criterion, solver: S) {
    let (grid, start, goal) = bench_grid();
    c.bench_function(format!("{N}x{N} terrain, {}", solver.name()).as_str(), |b| {
        b.iter(|| black_box(solver.get_path_single_goal(&grid, start, goal)))
    });
}

fn terrain_bench_solvers(c: &mut Criterion) {
    let cost = ElevationCost::default();
    bench_solver(c, WaveSolver::new(cost));
    bench_solver(c, DijkstraSolver::new(cost));
    bench_solver(c, AstarSolver::new(cost));
    bench_solver(c, MappedAstarSolver::new(cost));
}

fn terrain_bench_pass(c: &mut Criterion) {
    let (grid, start, goal) = bench_grid();
    let config = PathConfig::default();
    c.bench_function(format!("{N}x{N} terrain, full pass").as_str(), |b| {
        b.iter(|| black_box(run_pass(&grid, start, goal, &config)))
    });
}

fn flat_bench_elevation_weight(c: &mut Criterion) {
    let mut grid = PathingGrid::new_flat(N, N, 1.0).unwrap();
    for x in 0..N as i32 {
        for y in 0..N as i32 {
            let height = ((x * 7 + y * 13) % 5) as f32 * 0.5;
            grid.set_position(Point::new(x, y), Position::new(x as f32, height, y as f32))
                .unwrap();
        }
    }
    let start = Point::new(0, N as i32 / 2);
    let goal = Point::new(N as i32 - 1, N as i32 / 2);
    for weight in [0.0, 40.0] {
        let solver = AstarSolver::new(ElevationCost::new(weight).unwrap());
        c.bench_function(format!("{N}x{N} bumpy, astar weight {weight}").as_str(), |b| {
            b.iter(|| black_box(solver.get_path_single_goal(&grid, start, goal)))
        });
    }
}

criterion_group!(
    benches,
    terrain_bench_solvers,
    terrain_bench_pass,
    flat_bench_elevation_weight,
);
criterion_main!(benches);
