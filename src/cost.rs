use crate::error::PathError;
use crate::pathing_grid::Position;
use crate::DEFAULT_ELEVATION_WEIGHT;

/// Edge cost between two nodes: straight-line distance plus a penalty proportional to the
/// change in elevation. With `weight` set to 0 this is plain Euclidean distance.
///
/// The cost is symmetric and always computed from the current positions, so it picks up
/// terrain changes between passes without any invalidation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevationCost {
    weight: f32,
}

impl Default for ElevationCost {
    fn default() -> ElevationCost {
        ElevationCost {
            weight: DEFAULT_ELEVATION_WEIGHT,
        }
    }
}

impl ElevationCost {
    pub fn new(weight: f32) -> Result<ElevationCost, PathError> {
        if weight.is_finite() && weight >= 0.0 {
            Ok(ElevationCost { weight })
        } else {
            Err(PathError::InvalidWeight(weight))
        }
    }
    pub fn weight(&self) -> f32 {
        self.weight
    }
    pub fn between(&self, a: &Position, b: &Position) -> f32 {
        a.distance(b) + self.weight * (a.y - b.y).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_cost_is_euclidean() {
        let cost = ElevationCost::default();
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 0.0, 4.0);
        assert!((cost.between(&a, &b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn climbing_is_penalized_symmetrically() {
        let cost = ElevationCost::new(40.0).unwrap();
        let low = Position::new(0.0, 0.0, 0.0);
        let high = Position::new(0.0, 1.0, 0.0);
        assert!((cost.between(&low, &high) - 41.0).abs() < 1e-6);
        assert_eq!(cost.between(&low, &high), cost.between(&high, &low));
    }

    #[test]
    fn rejects_negative_and_nan_weights() {
        assert_eq!(ElevationCost::new(-1.0), Err(PathError::InvalidWeight(-1.0)));
        assert!(ElevationCost::new(f32::NAN).is_err());
        assert!(ElevationCost::new(0.0).is_ok());
    }
}
