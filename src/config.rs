//! Per-pass configuration: which algorithms run and how elevation is weighted.
use crate::cost::ElevationCost;
use crate::error::PathError;
use core::fmt;

/// The three competing strategies of a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Wave,
    Dijkstra,
    Astar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Wave, Algorithm::Dijkstra, Algorithm::Astar];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Algorithm::Wave => write!(f, "wave"),
            Algorithm::Dijkstra => write!(f, "dijkstra"),
            Algorithm::Astar => write!(f, "astar"),
        }
    }
}

/// Which A* formulation fills the [Algorithm::Astar] slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AstarVariant {
    /// Distance and parent kept in a dense per-node overlay.
    NodeState,
    /// `came_from` / `cost_so_far` maps keyed by coordinate.
    #[default]
    Mapped,
}

/// Settings read once at the start of every pass. Changing them while a pass is in flight only
/// affects the next one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathConfig {
    pub wave: bool,
    pub dijkstra: bool,
    pub astar: bool,
    pub astar_variant: AstarVariant,
    cost: ElevationCost,
}

impl Default for PathConfig {
    fn default() -> PathConfig {
        PathConfig {
            wave: true,
            dijkstra: true,
            astar: true,
            astar_variant: AstarVariant::default(),
            cost: ElevationCost::default(),
        }
    }
}

impl PathConfig {
    pub fn is_enabled(&self, algorithm: Algorithm) -> bool {
        match algorithm {
            Algorithm::Wave => self.wave,
            Algorithm::Dijkstra => self.dijkstra,
            Algorithm::Astar => self.astar,
        }
    }
    pub fn set_enabled(&mut self, algorithm: Algorithm, enabled: bool) {
        match algorithm {
            Algorithm::Wave => self.wave = enabled,
            Algorithm::Dijkstra => self.dijkstra = enabled,
            Algorithm::Astar => self.astar = enabled,
        }
    }
    /// Flips one algorithm on or off and returns its new state.
    pub fn toggle(&mut self, algorithm: Algorithm) -> bool {
        let enabled = !self.is_enabled(algorithm);
        self.set_enabled(algorithm, enabled);
        enabled
    }
    pub fn with_enabled(mut self, algorithm: Algorithm, enabled: bool) -> PathConfig {
        self.set_enabled(algorithm, enabled);
        self
    }
    pub fn with_astar_variant(mut self, variant: AstarVariant) -> PathConfig {
        self.astar_variant = variant;
        self
    }
    pub fn with_elevation_weight(mut self, weight: f32) -> Result<PathConfig, PathError> {
        self.set_elevation_weight(weight)?;
        Ok(self)
    }

    pub fn elevation_weight(&self) -> f32 {
        self.cost.weight()
    }
    pub fn set_elevation_weight(&mut self, weight: f32) -> Result<(), PathError> {
        self.cost = ElevationCost::new(weight)?;
        Ok(())
    }
    pub fn cost(&self) -> ElevationCost {
        self.cost
    }
}
