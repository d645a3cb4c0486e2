use crate::cost::ElevationCost;
use crate::error::PathError;
use crate::pathing_grid::PathingGrid;
use crate::search_context::{Frontier, NodeState};
use grid_util::point::Point;
use log::{debug, info};

pub mod astar;
pub mod dijkstra;
pub mod wave;

/// Sums the edge costs along `path`. Paths with fewer than two points cost nothing.
pub fn path_cost(grid: &PathingGrid, path: &[Point], cost: &ElevationCost) -> f32 {
    path.windows(2)
        .filter_map(|w| Some(cost.between(&grid.node(w[0])?.position, &grid.node(w[1])?.position)))
        .sum()
}

pub trait GridSolver {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    fn cost_function(&self) -> &ElevationCost;

    /// Edge cost between two in-bounds points.
    fn cost(&self, grid: &PathingGrid, p1: &Point, p2: &Point) -> f32 {
        self.cost_function().between(
            &grid.node_unchecked(*p1).position,
            &grid.node_unchecked(*p2).position,
        )
    }

    /// Runs the search proper on distinct endpoints.
    ///
    /// # Panics
    ///
    /// Panics if `start` or `goal` lies off the grid. Use
    /// [get_path_single_goal](Self::get_path_single_goal) to have the endpoints validated.
    fn search(&self, grid: &PathingGrid, start: Point, goal: Point) -> Option<Vec<Point>>;

    /// Computes a path from `start` to `goal`, both included. Returns `Ok(None)` when the goal
    /// cannot be reached and fails before searching if either endpoint is off the grid.
    fn get_path_single_goal(
        &self,
        grid: &PathingGrid,
        start: Point,
        goal: Point,
    ) -> Result<Option<Vec<Point>>, PathError> {
        grid.check_bounds(start)?;
        grid.check_bounds(goal)?;
        if start == goal {
            return Ok(Some(vec![start]));
        }
        let path = self.search(grid, start, goal);
        match &path {
            Some(p) => debug!("{}: {} nodes from {:?} to {:?}", self.name(), p.len(), start, goal),
            None => info!("{}: {:?} is not reachable from {:?}", self.name(), goal, start),
        }
        Ok(path)
    }

    fn get_path_cost(&self, grid: &PathingGrid, path: &[Point]) -> f32 {
        path_cost(grid, path, self.cost_function())
    }
}

/// Best-first relaxation over the node overlay, shared by Dijkstra (zero heuristic) and the
/// node-state A*. Entries are popped by `g + heuristic`; entries queued with a cost above the
/// node's current distance are stale and skipped.
pub(crate) fn best_first<S, H>(
    solver: &S,
    grid: &PathingGrid,
    start: Point,
    goal: Point,
    mut heuristic: H,
) -> NodeState
where
    S: GridSolver + ?Sized,
    H: FnMut(&Point) -> f32,
{
    let mut state = NodeState::new(grid, start);
    let mut frontier = Frontier::default();
    frontier.push(start, 0.0, 0.0);
    while let Some((current, queued_cost)) = frontier.pop() {
        if current == goal {
            break;
        }
        let current_distance = state.distance(&current);
        if queued_cost > current_distance {
            continue;
        }
        for n in grid.neighborhood_points(&current) {
            if !grid.can_move_to(n) {
                continue;
            }
            let new_distance = current_distance + solver.cost(grid, &n, &current);
            if new_distance < state.distance(&n) {
                state.relax(&n, current, new_distance);
                frontier.push(n, new_distance, new_distance + heuristic(&n));
            }
        }
    }
    state
}
