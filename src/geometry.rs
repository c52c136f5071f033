// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A half-space in lattice cell coordinates.
///
/// The "one" volume is the open side the normal points toward: a point `p`
/// belongs to it when `(p - origin) · normal > 0`. Points exactly on the plane
/// belong to the "zero" volume.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(origin: Vec3, normal: Vec3) -> Self {
        Self { origin, normal }
    }

    /// The plane equation evaluated at `point`. Not normalized by the normal's length.
    #[inline]
    pub fn evaluate(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.normal)
    }

    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        self.evaluate(point) > 0.0
    }

    /// A zero normal selects nothing to cut: the plane is treated as present
    /// throughout the grid.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }
}

// End of File
