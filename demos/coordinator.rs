use std::time::Duration;
use terrain_pathfinding::{
    Algorithm, NodeSource, PathConfig, PathCoordinator, PathNode, PathingGrid, Point, Position,
    PresentationSink,
};

// Drives a coordinator the way a game loop would: every frame a pass is requested, and the
// frame after a pass finishes the paths are drawn. Requests made while a pass is in flight are
// ignored. A boulder rolls across the hillside, so each pass routes around a different obstacle.

const SIZE: usize = 12;

struct Hillside {
    boulder: Point,
}

impl Hillside {
    fn height(x: f32, z: f32) -> f32 {
        (x / 40.0).sin() * 8.0 + (z / 60.0).cos() * 5.0
    }
}

impl NodeSource for Hillside {
    fn refresh_position(&mut self, _: Point, node: &PathNode) -> Position {
        node.position
    }
    fn refresh_walkable(&mut self, point: Point, _: &PathNode) -> bool {
        (point.x - self.boulder.x).abs() > 1 || (point.y - self.boulder.y).abs() > 1
    }
}

struct Canvas {
    cells: Vec<Vec<char>>,
}

impl Canvas {
    fn new() -> Canvas {
        Canvas {
            cells: vec![vec![' '; SIZE]; SIZE],
        }
    }
    fn paint(&mut self, point: Point, c: char) {
        self.cells[point.y as usize][point.x as usize] = c;
    }
    fn show(&self) {
        for row in self.cells.iter().rev() {
            println!("{}", row.iter().collect::<String>());
        }
    }
}

impl PresentationSink for Canvas {
    fn on_default(&mut self, point: Point, _: &PathNode) {
        self.paint(point, '.');
    }
    fn on_blocked(&mut self, point: Point, _: &PathNode) {
        self.paint(point, '#');
    }
    fn on_path_wave(&mut self, point: Point, _: &PathNode) {
        self.paint(point, 'w');
    }
    fn on_path_dijkstra(&mut self, point: Point, _: &PathNode) {
        self.paint(point, 'd');
    }
    fn on_path_astar(&mut self, point: Point, _: &PathNode) {
        self.paint(point, 'a');
    }
}

fn main() {
    let grid = PathingGrid::from_heights(SIZE, SIZE, 20.0, 25.0, Hillside::height).unwrap();
    let mut coordinator = PathCoordinator::new(grid, PathConfig::default());
    let start = Point::new(0, 0);
    let finish = Point::new(SIZE as i32 - 1, SIZE as i32 - 1);
    let mut hillside = Hillside {
        boulder: Point::new(2, 4),
    };
    let mut passes = 0;
    for frame in 0.. {
        if passes == 3 {
            break;
        }
        if frame == 1 {
            // Only affects passes requested from now on
            coordinator.config_mut().toggle(Algorithm::Wave);
        }
        coordinator
            .request_run(start, finish, &mut hillside)
            .unwrap();
        let mut canvas = Canvas::new();
        if let Some(result) = coordinator.poll(&mut canvas) {
            passes += 1;
            println!("Frame {frame}, pass {passes}:");
            for algorithm in Algorithm::ALL {
                let nodes = result.path(algorithm).map(<[Point]>::len);
                println!("  {algorithm}: {nodes:?} nodes");
            }
            canvas.show();
            hillside.boulder = Point::new(hillside.boulder.x + 3, hillside.boulder.y + 2);
        }
        std::thread::sleep(Duration::from_millis(16));
    }
}
