//! Runs all enabled algorithms as one pass on a worker thread and hands the resulting paths to
//! the presentation layer.
//!
//! A pass goes through four steps:
//! 1. [PathCoordinator::request_run] claims the running flag, refreshes every node from a
//!    [NodeSource] and snapshots the [PathConfig]. Requests made while a pass is in flight are
//!    dropped.
//! 2. A worker thread runs the searches on the snapshot, one after the other.
//! 3. [PathCoordinator::poll] (or [PathCoordinator::wait]) collects the [PassResult] and feeds
//!    it to a [PresentationSink] on the caller's thread.
//! 4. Only then is the running flag released.
use crate::config::{Algorithm, AstarVariant, PathConfig};
use crate::error::PathError;
use crate::pathing_grid::{PathNode, PathingGrid, Position};
use crate::solver::astar::{AstarSolver, MappedAstarSolver};
use crate::solver::dijkstra::DijkstraSolver;
use crate::solver::wave::WaveSolver;
use crate::solver::GridSolver;
use crossbeam_channel::{Receiver, TryRecvError};
use fxhash::FxHashSet;
use grid_util::point::Point;
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Where node snapshots come from. Both methods are called once per node per pass: first
/// positions for the whole grid, then walkability.
pub trait NodeSource {
    fn refresh_position(&mut self, point: Point, node: &PathNode) -> Position;
    fn refresh_walkable(&mut self, point: Point, node: &PathNode) -> bool;
}

/// Receives the outcome of a pass. Walkability callbacks for the whole grid come first, then
/// each path in order from start to finish: wave, dijkstra, astar.
pub trait PresentationSink {
    /// A walkable node that is not on any path.
    fn on_default(&mut self, point: Point, node: &PathNode);
    fn on_blocked(&mut self, point: Point, node: &PathNode);
    fn on_path_wave(&mut self, point: Point, node: &PathNode);
    fn on_path_dijkstra(&mut self, point: Point, node: &PathNode);
    fn on_path_astar(&mut self, point: Point, node: &PathNode);
}

/// Result of one algorithm within a pass.
#[derive(Clone, Debug, PartialEq)]
pub enum PathOutcome {
    /// The algorithm was disabled for this pass.
    Skipped,
    Unreachable,
    Found(Vec<Point>),
}

impl PathOutcome {
    pub fn path(&self) -> Option<&[Point]> {
        match self {
            PathOutcome::Found(path) => Some(path),
            _ => None,
        }
    }
}

impl From<Option<Vec<Point>>> for PathOutcome {
    fn from(path: Option<Vec<Point>>) -> PathOutcome {
        path.map_or(PathOutcome::Unreachable, PathOutcome::Found)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PassResult {
    pub start: Point,
    pub finish: Point,
    pub wave: PathOutcome,
    pub dijkstra: PathOutcome,
    pub astar: PathOutcome,
}

impl PassResult {
    pub fn outcome(&self, algorithm: Algorithm) -> &PathOutcome {
        match algorithm {
            Algorithm::Wave => &self.wave,
            Algorithm::Dijkstra => &self.dijkstra,
            Algorithm::Astar => &self.astar,
        }
    }
    pub fn path(&self, algorithm: Algorithm) -> Option<&[Point]> {
        self.outcome(algorithm).path()
    }
}

/// Runs every enabled algorithm from `start` to `finish` on `grid`, one after the other.
///
/// When the grid's components are up to date and show that `finish` cannot be reached, the
/// searches are skipped and every enabled algorithm reports [PathOutcome::Unreachable].
pub fn run_pass(
    grid: &PathingGrid,
    start: Point,
    finish: Point,
    config: &PathConfig,
) -> Result<PassResult, PathError> {
    grid.check_bounds(start)?;
    grid.check_bounds(finish)?;
    info!("Computing paths from {:?} to {:?}", start, finish);
    let reachable = grid.components_dirty || grid.reachable(&start, &finish);
    if !reachable {
        info!("{:?} is not reachable from {:?}, skipping search", finish, start);
    }
    let cost = config.cost();
    let outcome = |algorithm: Algorithm, solver: &dyn GridSolver| {
        if !config.is_enabled(algorithm) {
            Ok(PathOutcome::Skipped)
        } else if !reachable {
            Ok(PathOutcome::Unreachable)
        } else {
            solver
                .get_path_single_goal(grid, start, finish)
                .map(PathOutcome::from)
        }
    };
    let astar: Box<dyn GridSolver> = match config.astar_variant {
        AstarVariant::NodeState => Box::new(AstarSolver::new(cost)),
        AstarVariant::Mapped => Box::new(MappedAstarSolver::new(cost)),
    };
    Ok(PassResult {
        start,
        finish,
        wave: outcome(Algorithm::Wave, &WaveSolver::new(cost))?,
        dijkstra: outcome(Algorithm::Dijkstra, &DijkstraSolver::new(cost))?,
        astar: outcome(Algorithm::Astar, astar.as_ref())?,
    })
}

/// Feeds a finished pass to `sink` in presentation order.
pub fn present<K: PresentationSink + ?Sized>(
    grid: &PathingGrid,
    result: &PassResult,
    sink: &mut K,
) {
    let on_path = Algorithm::ALL
        .iter()
        .filter_map(|a| result.path(*a))
        .flatten()
        .copied()
        .collect::<FxHashSet<Point>>();
    for (point, node) in grid.iter() {
        if !node.walkable {
            sink.on_blocked(point, node);
        } else if !on_path.contains(&point) {
            sink.on_default(point, node);
        }
    }
    let nodes = |path: Option<&[Point]>| {
        path.unwrap_or_default()
            .iter()
            .filter_map(|p| grid.node(*p).map(|n| (*p, n)))
            .collect::<Vec<_>>()
    };
    for (p, n) in nodes(result.path(Algorithm::Wave)) {
        sink.on_path_wave(p, n);
    }
    for (p, n) in nodes(result.path(Algorithm::Dijkstra)) {
        sink.on_path_dijkstra(p, n);
    }
    for (p, n) in nodes(result.path(Algorithm::Astar)) {
        sink.on_path_astar(p, n);
    }
}

/// Whether a request was accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Started,
    /// Another pass was still in flight; the request was ignored.
    Dropped,
}

/// Read-only view of a coordinator's running flag, shareable across threads.
#[derive(Clone, Debug)]
pub struct RunningFlag(Arc<AtomicBool>);

impl RunningFlag {
    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Owns the grid and makes sure at most one pass is in flight at a time.
#[derive(Debug)]
pub struct PathCoordinator {
    grid: Arc<PathingGrid>,
    config: PathConfig,
    running: Arc<AtomicBool>,
    pending: Option<Receiver<PassResult>>,
    last_result: Option<PassResult>,
}

impl PathCoordinator {
    pub fn new(grid: PathingGrid, config: PathConfig) -> PathCoordinator {
        PathCoordinator {
            grid: Arc::new(grid),
            config,
            running: Arc::new(AtomicBool::new(false)),
            pending: None,
            last_result: None,
        }
    }

    pub fn grid(&self) -> &PathingGrid {
        &self.grid
    }
    pub fn config(&self) -> &PathConfig {
        &self.config
    }
    /// Settings changed here apply from the next pass on.
    pub fn config_mut(&mut self) -> &mut PathConfig {
        &mut self.config
    }
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
    pub fn running_flag(&self) -> RunningFlag {
        RunningFlag(Arc::clone(&self.running))
    }
    /// The most recent pass that has been presented.
    pub fn last_result(&self) -> Option<&PassResult> {
        self.last_result.as_ref()
    }

    /// Starts a pass from `start` to `finish` unless one is already running, in which case the
    /// request is dropped and the running pass is left untouched. Endpoints are validated
    /// first; an out-of-bounds endpoint fails without claiming the running flag.
    pub fn request_run<S: NodeSource + ?Sized>(
        &mut self,
        start: Point,
        finish: Point,
        source: &mut S,
    ) -> Result<RunStatus, PathError> {
        self.grid.check_bounds(start)?;
        self.grid.check_bounds(finish)?;
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Pass already running, dropping request");
            return Ok(RunStatus::Dropped);
        }

        let grid = Arc::make_mut(&mut self.grid);
        for (point, node) in grid.nodes_mut() {
            node.position = source.refresh_position(point, node);
        }
        for (point, node) in grid.nodes_mut() {
            node.walkable = source.refresh_walkable(point, node);
        }
        grid.generate_components();

        let grid = Arc::clone(&self.grid);
        let config = self.config;
        let (reply, pending) = crossbeam_channel::bounded(1);
        let spawned = thread::Builder::new()
            .name("pathfinding-pass".into())
            .spawn(move || match run_pass(&grid, start, finish, &config) {
                Ok(result) => {
                    // The coordinator may have been dropped in the meantime
                    let _ = reply.send(result);
                }
                Err(e) => error!("Pass from {:?} to {:?} failed: {e}", start, finish),
            });
        if let Err(e) = spawned {
            self.running.store(false, Ordering::Release);
            return Err(PathError::ThreadSpawnFailed {
                reason: e.to_string(),
            });
        }
        self.pending = Some(pending);
        Ok(RunStatus::Started)
    }

    /// Presents the running pass if it has finished, without blocking. Returns the result that
    /// was presented, if any.
    pub fn poll<K: PresentationSink + ?Sized>(&mut self, sink: &mut K) -> Option<&PassResult> {
        let received = self.pending.as_ref()?.try_recv();
        match received {
            Ok(result) => Some(self.finish(result, sink)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.abandon();
                None
            }
        }
    }

    /// Blocks until the running pass has finished, then presents it.
    pub fn wait<K: PresentationSink + ?Sized>(&mut self, sink: &mut K) -> Option<&PassResult> {
        let received = self.pending.as_ref()?.recv();
        match received {
            Ok(result) => Some(self.finish(result, sink)),
            Err(_) => {
                self.abandon();
                None
            }
        }
    }

    /// Requests a pass and waits for it. Returns `Ok(None)` if another pass was already running.
    pub fn run_blocking<S, K>(
        &mut self,
        start: Point,
        finish: Point,
        source: &mut S,
        sink: &mut K,
    ) -> Result<Option<&PassResult>, PathError>
    where
        S: NodeSource + ?Sized,
        K: PresentationSink + ?Sized,
    {
        match self.request_run(start, finish, source)? {
            RunStatus::Started => Ok(self.wait(sink)),
            RunStatus::Dropped => Ok(None),
        }
    }

    fn finish<K: PresentationSink + ?Sized>(
        &mut self,
        result: PassResult,
        sink: &mut K,
    ) -> &PassResult {
        self.pending = None;
        debug!(
            "Pass finished: wave {:?}, dijkstra {:?}, astar {:?} nodes",
            result.wave.path().map(<[Point]>::len),
            result.dijkstra.path().map(<[Point]>::len),
            result.astar.path().map(<[Point]>::len)
        );
        present(&self.grid, &result, sink);
        self.running.store(false, Ordering::Release);
        self.last_result.insert(result)
    }

    fn abandon(&mut self) {
        error!("Pathfinding worker exited without a result");
        self.pending = None;
        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Keeps whatever the grid already holds, except for the listed blocked points.
    struct Blocked(Vec<Point>);

    impl NodeSource for Blocked {
        fn refresh_position(&mut self, _: Point, node: &PathNode) -> Position {
            node.position
        }
        fn refresh_walkable(&mut self, point: Point, _: &PathNode) -> bool {
            !self.0.contains(&point)
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(&'static str, Point)>,
    }

    impl PresentationSink for Recorder {
        fn on_default(&mut self, point: Point, _: &PathNode) {
            self.calls.push(("default", point));
        }
        fn on_blocked(&mut self, point: Point, _: &PathNode) {
            self.calls.push(("blocked", point));
        }
        fn on_path_wave(&mut self, point: Point, _: &PathNode) {
            self.calls.push(("wave", point));
        }
        fn on_path_dijkstra(&mut self, point: Point, _: &PathNode) {
            self.calls.push(("dijkstra", point));
        }
        fn on_path_astar(&mut self, point: Point, _: &PathNode) {
            self.calls.push(("astar", point));
        }
    }

    fn coordinator() -> PathCoordinator {
        PathCoordinator::new(
            PathingGrid::new_flat(3, 3, 1.0).unwrap(),
            PathConfig::default(),
        )
    }

    #[test]
    fn disabled_algorithms_are_skipped() {
        let grid = PathingGrid::new_flat(3, 3, 1.0).unwrap();
        let config = PathConfig::default().with_enabled(Algorithm::Wave, false);
        let result = run_pass(&grid, Point::new(0, 0), Point::new(2, 2), &config).unwrap();
        assert_eq!(result.wave, PathOutcome::Skipped);
        assert_eq!(result.dijkstra.path().map(<[Point]>::len), Some(3));
        assert_eq!(result.astar.path().map(<[Point]>::len), Some(3));
    }

    #[test]
    fn walled_off_finish_is_unreachable_for_all() {
        let mut grid = PathingGrid::new_flat(3, 3, 1.0).unwrap();
        for y in 0..3 {
            grid.set_walkable(Point::new(1, y), false).unwrap();
        }
        grid.update();
        let result =
            run_pass(&grid, Point::new(0, 0), Point::new(2, 2), &PathConfig::default()).unwrap();
        for algorithm in Algorithm::ALL {
            assert_eq!(result.outcome(algorithm), &PathOutcome::Unreachable);
        }
    }

    #[test]
    fn out_of_bounds_request_leaves_flag_released() {
        let mut coordinator = coordinator();
        let err = coordinator
            .request_run(Point::new(0, 0), Point::new(3, 3), &mut Blocked(vec![]))
            .unwrap_err();
        assert!(matches!(err, PathError::OutOfBounds { .. }));
        assert!(!coordinator.is_running());
    }

    #[test]
    fn presentation_order_is_walkability_then_paths() {
        let mut coordinator = coordinator();
        let mut sink = Recorder::default();
        let mut source = Blocked(vec![Point::new(1, 1)]);
        coordinator
            .run_blocking(Point::new(0, 0), Point::new(2, 2), &mut source, &mut sink)
            .unwrap()
            .unwrap();
        let kinds = sink.calls.iter().map(|(k, _)| *k).collect::<Vec<_>>();
        let first_path = kinds.iter().position(|k| *k == "wave").unwrap();
        assert!(kinds[..first_path]
            .iter()
            .all(|k| *k == "default" || *k == "blocked"));
        assert_eq!(sink.calls.iter().filter(|(k, _)| *k == "blocked").count(), 1);
        let wave = kinds.iter().filter(|k| **k == "wave").count();
        let dijkstra = kinds.iter().filter(|k| **k == "dijkstra").count();
        let astar = kinds.iter().filter(|k| **k == "astar").count();
        assert_eq!((wave, dijkstra, astar), (4, 4, 4));
        let last_wave = kinds.iter().rposition(|k| *k == "wave").unwrap();
        let first_dijkstra = kinds.iter().position(|k| *k == "dijkstra").unwrap();
        let last_dijkstra = kinds.iter().rposition(|k| *k == "dijkstra").unwrap();
        let first_astar = kinds.iter().position(|k| *k == "astar").unwrap();
        assert!(last_wave < first_dijkstra && last_dijkstra < first_astar);
        assert_eq!(sink.calls.last(), Some(&("astar", Point::new(2, 2))));
    }

    /// Puts the coordinator in the state left behind by a worker that exited without replying.
    fn with_dead_worker(coordinator: &mut PathCoordinator) {
        let (reply, pending) = crossbeam_channel::bounded::<PassResult>(1);
        drop(reply);
        coordinator.running.store(true, Ordering::Release);
        coordinator.pending = Some(pending);
    }

    #[test]
    fn dead_worker_releases_the_flag() {
        let mut coordinator = coordinator();
        with_dead_worker(&mut coordinator);
        assert!(coordinator.is_running());
        assert!(coordinator.poll(&mut Recorder::default()).is_none());
        assert!(!coordinator.is_running());
        assert!(coordinator.last_result().is_none());

        with_dead_worker(&mut coordinator);
        let mut sink = Recorder::default();
        assert!(coordinator.wait(&mut sink).is_none());
        assert!(!coordinator.is_running());
        assert!(sink.calls.is_empty());

        // The next request is accepted again
        let status = coordinator
            .request_run(Point::new(0, 0), Point::new(2, 2), &mut Blocked(vec![]))
            .unwrap();
        assert_eq!(status, RunStatus::Started);
        assert!(coordinator.wait(&mut sink).is_some());
    }

    #[test]
    fn second_request_is_dropped_until_presented() {
        let mut coordinator = coordinator();
        let flag = coordinator.running_flag();
        let mut source = Blocked(vec![]);
        let status = coordinator
            .request_run(Point::new(0, 0), Point::new(2, 2), &mut source)
            .unwrap();
        assert_eq!(status, RunStatus::Started);
        assert!(flag.is_running());
        let status = coordinator
            .request_run(Point::new(2, 2), Point::new(0, 0), &mut source)
            .unwrap();
        assert_eq!(status, RunStatus::Dropped);
        assert!(flag.is_running());
        let result = coordinator.wait(&mut Recorder::default()).unwrap().clone();
        assert_eq!(result.start, Point::new(0, 0));
        assert!(!flag.is_running());
    }
}
