use crate::cost::ElevationCost;
use crate::pathing_grid::PathingGrid;
use crate::search_context::reverse_path;
use crate::solver::{best_first, GridSolver};
use grid_util::point::Point;

/// Uniform-cost search: [best_first] without a heuristic.
#[derive(Clone, Debug, Default)]
pub struct DijkstraSolver {
    pub cost: ElevationCost,
}

impl DijkstraSolver {
    pub fn new(cost: ElevationCost) -> DijkstraSolver {
        DijkstraSolver { cost }
    }
}

impl GridSolver for DijkstraSolver {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn cost_function(&self) -> &ElevationCost {
        &self.cost
    }

    fn search(&self, grid: &PathingGrid, start: Point, goal: Point) -> Option<Vec<Point>> {
        let state = best_first(self, grid, start, goal, |_| 0.0);
        reverse_path(&state, goal, grid.len())
    }
}
