//! 3D ray for intersection queries

use serde::{Deserialize, Serialize};

use crate::vector::Vec3;

/// Half-line from `origin` along `direction`
///
/// The direction is normalized on construction. Ray parameters returned by
/// the intersection functions are in units of `direction`, so
/// [`Ray::at`] always lands on the reported hit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray with normalized direction
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at parameter `t`
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}
