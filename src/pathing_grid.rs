use crate::error::PathError;
use core::fmt;
use grid_util::point::Point;
use itertools::iproduct;
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// A point in world space. `y` is the elevation axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Position {
        Position { x, y, z }
    }
    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A single cell of the grid. Both fields are snapshots taken from the owning application
/// at the start of a pass; search state lives elsewhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathNode {
    pub position: Position,
    pub walkable: bool,
}

impl PathNode {
    pub fn new(position: Position, walkable: bool) -> PathNode {
        PathNode { position, walkable }
    }
}

/// [PathingGrid] is a fixed-size lattice of [PathNode]s with 8-directional adjacency. Cells are
/// stored column by column (x outer, y inner) so that iterating the storage visits nodes in the
/// same scan order used for neighbour enumeration. In addition to the nodes it maintains
/// connected components of walkable cells in a [UnionFind] structure.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    width: usize,
    height: usize,
    nodes: Vec<PathNode>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl PathingGrid {
    /// Builds a grid by asking `f` for every node, visiting x outer and y inner.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<PathingGrid, PathError>
    where
        F: FnMut(Point) -> PathNode,
    {
        if width == 0 || height == 0 || i32::try_from(width.max(height)).is_err() {
            return Err(PathError::InvalidDimensions { width, height });
        }
        let nodes = iproduct!(0..width as i32, 0..height as i32)
            .map(|(x, y)| f(Point::new(x, y)))
            .collect::<Vec<_>>();
        let mut grid = PathingGrid {
            width,
            height,
            nodes,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    /// A flat, fully walkable grid with nodes `spacing` apart on the ground plane.
    pub fn new_flat(width: usize, height: usize, spacing: f32) -> Result<PathingGrid, PathError> {
        PathingGrid::from_fn(width, height, |p| {
            PathNode::new(
                Position::new(p.x as f32 * spacing, 0.0, p.y as f32 * spacing),
                true,
            )
        })
    }

    /// Lays nodes out over a height field: node `(x, z)` is placed at
    /// `(x * spacing, height(x, z) + lift, z * spacing)`. Nodes start out unwalkable, the first
    /// refresh from the owning application decides which of them can be entered.
    pub fn from_heights<H>(
        width: usize,
        height: usize,
        spacing: f32,
        lift: f32,
        mut height_at: H,
    ) -> Result<PathingGrid, PathError>
    where
        H: FnMut(f32, f32) -> f32,
    {
        PathingGrid::from_fn(width, height, |p| {
            let x = p.x as f32 * spacing;
            let z = p.y as f32 * spacing;
            PathNode::new(Position::new(x, height_at(x, z) + lift, z), false)
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }
    /// Fails with [PathError::OutOfBounds] unless `point` lies on the grid.
    pub fn check_bounds(&self, point: Point) -> Result<(), PathError> {
        if self.in_bounds(point) {
            Ok(())
        } else {
            Err(PathError::OutOfBounds {
                point,
                width: self.width,
                height: self.height,
            })
        }
    }
    /// Storage index of an in-bounds point.
    pub fn get_ix_point(&self, point: &Point) -> usize {
        debug_assert!(self.in_bounds(*point));
        point.x as usize * self.height + point.y as usize
    }
    pub fn point_at(&self, ix: usize) -> Point {
        Point::new((ix / self.height) as i32, (ix % self.height) as i32)
    }

    pub fn node(&self, point: Point) -> Option<&PathNode> {
        if self.in_bounds(point) {
            self.nodes.get(self.get_ix_point(&point))
        } else {
            None
        }
    }
    /// Node at an in-bounds point. Panics when `point` is off the grid; solvers only call this
    /// with coordinates produced by [neighborhood_points](Self::neighborhood_points) or
    /// validated endpoints.
    pub(crate) fn node_unchecked(&self, point: Point) -> &PathNode {
        &self.nodes[self.get_ix_point(&point)]
    }

    /// Visits every node in storage order together with its coordinate.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &PathNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(move |(ix, node)| (self.point_at(ix), node))
    }
    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = (Point, &mut PathNode)> + '_ {
        let height = self.height;
        self.nodes
            .iter_mut()
            .enumerate()
            .map(move |(ix, node)| (Point::new((ix / height) as i32, (ix % height) as i32), node))
    }

    /// Updates walkability of a single node. Blocking a node may split a component, so the
    /// components are flagged as dirty; unblocking joins the node with its walkable neighbours.
    pub fn set_walkable(&mut self, point: Point, walkable: bool) -> Result<(), PathError> {
        self.check_bounds(point)?;
        let ix = self.get_ix_point(&point);
        let was_walkable = self.nodes[ix].walkable;
        self.nodes[ix].walkable = walkable;
        if was_walkable && !walkable {
            self.components_dirty = true;
        } else if walkable {
            for n in self.neighborhood_points(&point) {
                if self.can_move_to(n) {
                    let n_ix = self.get_ix_point(&n);
                    self.components.union(ix, n_ix);
                }
            }
        }
        Ok(())
    }
    pub fn set_position(&mut self, point: Point, position: Position) -> Result<(), PathError> {
        self.check_bounds(point)?;
        let ix = self.get_ix_point(&point);
        self.nodes[ix].position = position;
        Ok(())
    }

    pub fn can_move_to(&self, point: Point) -> bool {
        self.node(point).is_some_and(|n| n.walkable)
    }

    /// In-bounds 8-neighbourhood of `point`, excluding `point` itself. Emitted with x as the
    /// outer loop and y as the inner loop; equal-cost relaxations tie-break on this order.
    pub fn neighborhood_points(&self, point: &Point) -> SmallVec<[Point; 8]> {
        iproduct!(point.x - 1..=point.x + 1, point.y - 1..=point.y + 1)
            .map(|(x, y)| Point::new(x, y))
            .filter(|p| p != point && self.in_bounds(*p))
            .collect()
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> usize {
        self.components.find(self.get_ix_point(point))
    }

    /// Checks whether a search from `start` can reach `goal`. The start is always expanded, even
    /// when it is not walkable itself, so in that case its walkable neighbours stand in for it.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        if !self.in_bounds(*start) || !self.in_bounds(*goal) {
            return false;
        }
        if start == goal {
            return true;
        }
        if !self.can_move_to(*goal) {
            return false;
        }
        let goal_component = self.get_component(goal);
        if self.can_move_to(*start) {
            self.get_component(start) == goal_component
        } else {
            self.neighborhood_points(start)
                .iter()
                .filter(|p| self.can_move_to(**p))
                .any(|p| self.get_component(p) == goal_component)
        }
    }
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        !self.reachable(start, goal)
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up walkable neighbours to the same
    /// components. Only the forward half of the neighbourhood needs to be visited.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.nodes.len());
        self.components_dirty = false;
        for ix in 0..self.nodes.len() {
            if !self.nodes[ix].walkable {
                continue;
            }
            let point = self.point_at(ix);
            for p in [
                Point::new(point.x, point.y + 1),
                Point::new(point.x + 1, point.y - 1),
                Point::new(point.x + 1, point.y),
                Point::new(point.x + 1, point.y + 1),
            ] {
                if self.can_move_to(p) {
                    let n_ix = self.get_ix_point(&p);
                    self.components.union(ix, n_ix);
                }
            }
        }
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for y in (0..self.height as i32).rev() {
            let row = (0..self.width as i32)
                .map(|x| {
                    if self.can_move_to(Point::new(x, y)) {
                        '.'
                    } else {
                        '#'
                    }
                })
                .collect::<String>();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
