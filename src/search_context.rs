//! Scratch state shared by the solvers: the priority frontier, the per-run node overlay and
//! back-link path reconstruction.
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexMap;
use log::warn;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::pathing_grid::PathingGrid;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

pub(crate) struct SmallestCostHolder {
    estimated_cost: f32,
    cost: f32,
    sequence: u64,
    point: Point,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest estimate; equal estimates pop in the
        // order they were pushed
        match other.estimated_cost.total_cmp(&self.estimated_cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

/// Min-priority queue of grid points with lazy deletion: a point may be pushed several times and
/// it is up to the caller to recognise stale entries.
#[derive(Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<SmallestCostHolder>,
    pushed: u64,
}

impl Frontier {
    /// Queues `point`, reached at `cost`, under the priority `estimated_cost`.
    pub(crate) fn push(&mut self, point: Point, cost: f32, estimated_cost: f32) {
        self.heap.push(SmallestCostHolder {
            estimated_cost,
            cost,
            sequence: self.pushed,
            point,
        });
        self.pushed += 1;
    }
    /// Pops the entry with the smallest priority, returning the point and the cost it was
    /// queued with.
    pub(crate) fn pop(&mut self) -> Option<(Point, f32)> {
        self.heap.pop().map(|holder| (holder.point, holder.cost))
    }
}

/// Lookup of the predecessor recorded for a point during a search. The start of the search is
/// its own back-link; points that were never reached have none.
pub trait BackLinks {
    fn back_link(&self, point: &Point) -> Option<Point>;
}

/// Per-run distance and parent for every cell of a grid. Created fresh for each search, so no
/// state survives from one algorithm to the next.
#[derive(Clone, Debug)]
pub struct NodeState {
    height: usize,
    distance: Vec<f32>,
    parent: Vec<Option<Point>>,
}

impl NodeState {
    /// All distances at +infinity, no parents, except the start which sits at distance zero and
    /// points at itself.
    pub fn new(grid: &PathingGrid, start: Point) -> NodeState {
        let mut state = NodeState {
            height: grid.height(),
            distance: vec![f32::INFINITY; grid.len()],
            parent: vec![None; grid.len()],
        };
        let ix = state.ix(&start);
        state.distance[ix] = 0.0;
        state.parent[ix] = Some(start);
        state
    }
    fn ix(&self, point: &Point) -> usize {
        point.x as usize * self.height + point.y as usize
    }
    pub fn distance(&self, point: &Point) -> f32 {
        self.distance[self.ix(point)]
    }
    /// Records a cheaper way to reach `point` through `parent`.
    pub fn relax(&mut self, point: &Point, parent: Point, distance: f32) {
        let ix = self.ix(point);
        self.distance[ix] = distance;
        self.parent[ix] = Some(parent);
    }
}

impl BackLinks for NodeState {
    fn back_link(&self, point: &Point) -> Option<Point> {
        self.parent[self.ix(point)]
    }
}

impl BackLinks for FxIndexMap<Point, Point> {
    fn back_link(&self, point: &Point) -> Option<Point> {
        self.get(point).copied()
    }
}

/// Follows back-links from `goal` until the self-linked start is reached and returns the path in
/// start to goal order. Returns [None] when the chain breaks off before reaching the start, which
/// is what happens when the goal was never reached. The walk is capped at `max_len` steps.
pub fn reverse_path<B: BackLinks + ?Sized>(
    links: &B,
    goal: Point,
    max_len: usize,
) -> Option<Vec<Point>> {
    let mut path = vec![goal];
    let mut current = goal;
    loop {
        let previous = links.back_link(&current)?;
        if previous == current {
            path.reverse();
            return Some(path);
        }
        if path.len() >= max_len {
            warn!("Back-link chain from {:?} is longer than the grid, giving up", goal);
            return None;
        }
        path.push(previous);
        current = previous;
    }
}
