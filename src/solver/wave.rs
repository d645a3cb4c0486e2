use crate::cost::ElevationCost;
use crate::pathing_grid::PathingGrid;
use crate::search_context::{reverse_path, NodeState};
use crate::solver::GridSolver;
use grid_util::point::Point;
use std::collections::VecDeque;

/// Wave propagation: breadth-first expansion from a FIFO queue, where a neighbour is only queued
/// again when it is reached more cheaply than before. Stops as soon as the goal leaves the
/// queue, so the path is not guaranteed to be the cheapest one.
#[derive(Clone, Debug, Default)]
pub struct WaveSolver {
    pub cost: ElevationCost,
}

impl WaveSolver {
    pub fn new(cost: ElevationCost) -> WaveSolver {
        WaveSolver { cost }
    }
}

impl GridSolver for WaveSolver {
    fn name(&self) -> &'static str {
        "wave"
    }

    fn cost_function(&self) -> &ElevationCost {
        &self.cost
    }

    fn search(&self, grid: &PathingGrid, start: Point, goal: Point) -> Option<Vec<Point>> {
        let mut state = NodeState::new(grid, start);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if current == goal {
                break;
            }
            let current_distance = state.distance(&current);
            for n in grid.neighborhood_points(&current) {
                if !grid.can_move_to(n) {
                    continue;
                }
                let new_distance = current_distance + self.cost(grid, &n, &current);
                if state.distance(&n) > new_distance {
                    state.relax(&n, current, new_distance);
                    queue.push_back(n);
                }
            }
        }
        reverse_path(&state, goal, grid.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::test_grids::*;

    #[test]
    fn equal_start_goal() {
        let grid = open_3x3();
        let p = Point::new(1, 2);
        let path = WaveSolver::default()
            .get_path_single_goal(&grid, p, p)
            .unwrap();
        assert_eq!(path, Some(vec![p]));
    }

    #[test]
    fn takes_the_diagonal_on_open_ground() {
        let grid = open_3x3();
        let path = WaveSolver::default()
            .get_path_single_goal(&grid, Point::new(0, 0), Point::new(2, 2))
            .unwrap()
            .unwrap();
        assert_eq!(
            path,
            vec![Point::new(0, 0), Point::new(1, 1), Point::new(2, 2)]
        );
    }

    #[test]
    fn routes_around_a_blocked_centre() {
        let grid = blocked_centre_3x3();
        let start = Point::new(0, 0);
        let goal = Point::new(2, 2);
        let path = WaveSolver::default()
            .get_path_single_goal(&grid, start, goal)
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 4);
        assert!(!path.contains(&Point::new(1, 1)));
        assert_valid_path(&grid, &path, start, goal);
    }

    #[test]
    fn walled_off_goal_is_not_found() {
        let mut grid = PathingGrid::new_flat(3, 1, 1.0).unwrap();
        grid.set_walkable(Point::new(1, 0), false).unwrap();
        let path = WaveSolver::default()
            .get_path_single_goal(&grid, Point::new(0, 0), Point::new(2, 0))
            .unwrap();
        assert!(path.is_none());
    }

    #[test]
    fn out_of_bounds_goal_fails_fast() {
        let grid = open_3x3();
        assert!(WaveSolver::default()
            .get_path_single_goal(&grid, Point::new(0, 0), Point::new(3, 0))
            .is_err());
    }

    #[test]
    #[should_panic]
    fn unchecked_search_panics_off_grid() {
        let grid = open_3x3();
        WaveSolver::default().search(&grid, Point::new(3, 0), Point::new(0, 0));
    }
}
