//! Regions: named volumes of the world that scripts can refer to.
//!
//! The engine only stores region data. Whether an actor is inside a region
//! is always answered by the host's domain services.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scenario-local region identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u32);

impl RegionId {
    /// Create a new region ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Region({})", self.0)
    }
}

/// Axis-aligned box in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    /// Lowest corner.
    pub min: [f64; 3],
    /// Highest corner.
    pub max: [f64; 3],
}

impl RegionBounds {
    /// Create bounds from two opposite corners, in any order.
    #[must_use]
    pub fn new(a: [f64; 3], b: [f64; 3]) -> Self {
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for axis in 0..3 {
            min[axis] = a[axis].min(b[axis]);
            max[axis] = a[axis].max(b[axis]);
        }
        Self { min, max }
    }

    /// Whether a point lies inside (borders included).
    #[must_use]
    pub fn contains(&self, point: [f64; 3]) -> bool {
        (0..3).all(|axis| self.min[axis] <= point[axis] && point[axis] <= self.max[axis])
    }

    /// The center point.
    #[must_use]
    pub fn center(&self) -> [f64; 3] {
        [0, 1, 2].map(|axis| (self.min[axis] + self.max[axis]) / 2.0)
    }
}

/// A region of the scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Local id, unique within the scenario.
    pub id: RegionId,
    /// Display name.
    pub name: String,
    /// Globally stable id, used by the codec when present.
    pub stable_id: Option<Uuid>,
    /// Extent.
    pub bounds: RegionBounds,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_id() {
        let id = RegionId::new(3);
        assert_eq!(id.raw(), 3);
        assert_eq!(format!("{}", id), "Region(3)");
    }

    #[test]
    fn test_bounds_normalized() {
        let bounds = RegionBounds::new([10.0, 0.0, 5.0], [0.0, 10.0, -5.0]);
        assert_eq!(bounds.min, [0.0, 0.0, -5.0]);
        assert_eq!(bounds.max, [10.0, 10.0, 5.0]);
        assert_eq!(bounds.center(), [5.0, 5.0, 0.0]);
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = RegionBounds::new([0.0; 3], [2.0; 3]);
        assert!(bounds.contains([1.0, 1.0, 1.0]));
        assert!(bounds.contains([2.0, 0.0, 2.0]));
        assert!(!bounds.contains([2.1, 1.0, 1.0]));
    }
}
