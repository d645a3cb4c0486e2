//! # terrain_pathfinding
//!
//! Side-by-side grid pathfinding over terrain. Three strategies run on the same 8-connected grid
//! and are compared on every pass:
//! - wave propagation, a breadth-first expansion gated on distance improvement
//!   ([WaveSolver](solver::wave::WaveSolver)),
//! - [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
//!   ([DijkstraSolver](solver::dijkstra::DijkstraSolver)),
//! - [A*](https://en.wikipedia.org/wiki/A*_search_algorithm), either on a per-node overlay
//!   ([AstarSolver](solver::astar::AstarSolver)) or on coordinate-keyed maps
//!   ([MappedAstarSolver](solver::astar::MappedAstarSolver)).
//!
//! Edge costs combine straight-line distance with a penalty for changes in elevation
//! ([ElevationCost](cost::ElevationCost)). The [PathCoordinator](coordinator::PathCoordinator)
//! refreshes the grid from the owning application, runs a pass on a worker thread and makes sure
//! passes never overlap. Connected components are kept in a
//! [UnionFind](petgraph::unionfind::UnionFind) so unreachable goals are reported without
//! flood-filling the grid.
pub mod config;
pub mod coordinator;
pub mod cost;
pub mod error;
pub mod pathing_grid;
pub mod search_context;
pub mod solver;

pub use config::{Algorithm, AstarVariant, PathConfig};
pub use coordinator::{
    NodeSource, PassResult, PathCoordinator, PathOutcome, PresentationSink, RunStatus,
};
pub use cost::ElevationCost;
pub use error::PathError;
pub use pathing_grid::{PathNode, PathingGrid, Position};
pub use solver::GridSolver;

pub use grid_util::point::Point;

/// Default weight of the elevation penalty in [ElevationCost].
pub const DEFAULT_ELEVATION_WEIGHT: f32 = 40.0;
