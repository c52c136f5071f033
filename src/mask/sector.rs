// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use glam::{UVec3, Vec3};

use crate::geometry::Plane;

/// Relative rounding slack of the corner test. The plane equation at a corner
/// and at a lane inside the box are computed with different roundings, so a
/// box only counts as uniform when its corners clear the plane by more than
/// either rounding could account for.
const CLASSIFY_EPSILON: f32 = 1e-5;

/// Where a box of cells lies relative to a plane.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SectorClass {
    /// Entirely in the "zero" volume.
    Zero,
    /// Entirely in the "one" volume.
    One,
    /// Crosses the plane, or is too close to call.
    Straddling,
}

/// An axis-aligned box of whole cells, `[min, min + size)`.
///
/// Every lane of every cell in the box lies inside the closed box spanned by
/// its eight corners, which is what makes the corner test sound.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Sector {
    pub min: UVec3,
    pub size: UVec3,
}

impl Sector {
    pub fn new(min: UVec3, size: UVec3) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> UVec3 {
        self.min + self.size
    }

    pub fn cell_count(&self) -> u64 {
        self.size.x as u64 * self.size.y as u64 * self.size.z as u64
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let lo = self.min.as_vec3();
        let hi = self.max().as_vec3();
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    pub fn classify(&self, plane: &Plane) -> SectorClass {
        let lo = self.min.as_vec3();
        let hi = self.max().as_vec3();
        let scale = lo.abs().max(hi.abs()) + plane.origin.abs() + Vec3::ONE;
        let tolerance = CLASSIFY_EPSILON * (plane.normal.abs() * scale).element_sum();

        let values = self.corners().map(|corner| plane.evaluate(corner));
        if values.iter().all(|&value| value < -tolerance) {
            SectorClass::Zero
        } else if values.iter().all(|&value| value > tolerance) {
            SectorClass::One
        } else {
            SectorClass::Straddling
        }
    }

    /// Tiles the sector with boxes of `edge` cells, clipped at the far faces.
    /// Tiles are produced in z, y, x order.
    pub fn subdivide(&self, edge: u32) -> Vec<Sector> {
        let edge = edge.max(1);
        let max = self.max();
        let mut result = Vec::new();

        for z in (self.min.z..max.z).step_by(edge as usize) {
            let size_z = edge.min(max.z - z);
            for y in (self.min.y..max.y).step_by(edge as usize) {
                let size_y = edge.min(max.y - y);
                for x in (self.min.x..max.x).step_by(edge as usize) {
                    let size_x = edge.min(max.x - x);
                    result.push(Sector::new(
                        UVec3::new(x, y, z),
                        UVec3::new(size_x, size_y, size_z),
                    ));
                }
            }
        }

        result
    }

    /// Every cell of the sector, in z, y, x order.
    pub fn cells(&self) -> impl Iterator<Item = UVec3> {
        let min = self.min;
        let max = self.max();
        (min.z..max.z).flat_map(move |z| {
            (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| UVec3::new(x, y, z)))
        })
    }
}


// End of File
