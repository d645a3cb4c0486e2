use terrain_pathfinding::solver::astar::MappedAstarSolver;
use terrain_pathfinding::solver::dijkstra::DijkstraSolver;
use terrain_pathfinding::solver::wave::WaveSolver;
use terrain_pathfinding::{GridSolver, PathingGrid, Point};

// In this example paths are found on a grid with shape
// .....
// .S#..
// ..#..
// ..#E.
// .....
// S marks the start
// E marks the end
fn main() {
    let mut pathing_grid = PathingGrid::new_flat(5, 5, 1.0).unwrap();
    for y in 1..4 {
        pathing_grid.set_walkable(Point::new(2, y), false).unwrap();
    }
    pathing_grid.update();
    println!("{}", pathing_grid);
    let start = Point::new(1, 3);
    let end = Point::new(3, 1);
    let solvers: [Box<dyn GridSolver>; 3] = [
        Box::new(WaveSolver::default()),
        Box::new(DijkstraSolver::default()),
        Box::new(MappedAstarSolver::default()),
    ];
    for solver in solvers {
        if let Some(path) = solver.get_path_single_goal(&pathing_grid, start, end).unwrap() {
            println!(
                "{} found a path of cost {:.2}:",
                solver.name(),
                solver.get_path_cost(&pathing_grid, &path)
            );
            for p in path {
                println!("{:?}", p);
            }
        }
    }
}
