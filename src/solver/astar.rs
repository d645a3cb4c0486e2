use crate::cost::ElevationCost;
use crate::pathing_grid::PathingGrid;
use crate::search_context::{reverse_path, Frontier, FxIndexMap};
use crate::solver::{best_first, GridSolver};
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};

/// A* on the node overlay. The heuristic is the edge cost function itself applied between a node
/// and the goal. Any route to the goal covers at least the straight-line distance and climbs at
/// least the height difference, so the estimate never overshoots and paths stay optimal.
#[derive(Clone, Debug, Default)]
pub struct AstarSolver {
    pub cost: ElevationCost,
}

impl AstarSolver {
    pub fn new(cost: ElevationCost) -> AstarSolver {
        AstarSolver { cost }
    }
}

impl GridSolver for AstarSolver {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn cost_function(&self) -> &ElevationCost {
        &self.cost
    }

    fn search(&self, grid: &PathingGrid, start: Point, goal: Point) -> Option<Vec<Point>> {
        let state = best_first(self, grid, start, goal, |p| self.cost(grid, p, &goal));
        reverse_path(&state, goal, grid.len())
    }
}

/// A* keeping its state in `came_from` / `cost_so_far` maps keyed by coordinate instead of a
/// dense overlay, so only the visited part of the grid is ever allocated.
#[derive(Clone, Debug, Default)]
pub struct MappedAstarSolver {
    pub cost: ElevationCost,
}

impl MappedAstarSolver {
    pub fn new(cost: ElevationCost) -> MappedAstarSolver {
        MappedAstarSolver { cost }
    }
}

impl GridSolver for MappedAstarSolver {
    fn name(&self) -> &'static str {
        "astar (mapped)"
    }

    fn cost_function(&self) -> &ElevationCost {
        &self.cost
    }

    fn search(&self, grid: &PathingGrid, start: Point, goal: Point) -> Option<Vec<Point>> {
        let mut frontier = Frontier::default();
        let mut came_from: FxIndexMap<Point, Point> = FxIndexMap::default();
        let mut cost_so_far: FxIndexMap<Point, f32> = FxIndexMap::default();
        frontier.push(start, 0.0, 0.0);
        came_from.insert(start, start);
        cost_so_far.insert(start, 0.0);

        while let Some((current, queued_cost)) = frontier.pop() {
            if current == goal {
                break;
            }
            let current_cost = cost_so_far.get(&current).copied().unwrap_or(f32::INFINITY);
            // We may have queued a node several times if we found a better way to reach it;
            // only the cheapest entry is expanded.
            if queued_cost > current_cost {
                continue;
            }
            for n in grid.neighborhood_points(&current) {
                if !grid.can_move_to(n) {
                    continue;
                }
                let new_cost = current_cost + self.cost(grid, &current, &n);
                match cost_so_far.entry(n) {
                    Vacant(e) => {
                        e.insert(new_cost);
                    }
                    Occupied(mut e) => {
                        if new_cost < *e.get() {
                            e.insert(new_cost);
                        } else {
                            continue;
                        }
                    }
                }
                came_from.insert(n, current);
                frontier.push(n, new_cost, new_cost + self.cost(grid, &n, &goal));
            }
        }
        reverse_path(&came_from, goal, grid.len())
    }
}
