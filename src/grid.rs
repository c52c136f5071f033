// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use glam::{Mat3, UVec3, Vec3};

use crate::basis::BasisKind;
use crate::cell::{Cell, CellTemplate};
use crate::config::LatticeStatistics;
use crate::entity::{Entity, EntityType, EMPTY_CODE};
use crate::error::LatticeError;
use crate::geometry::Plane;
use crate::mask::{cell_count, Mask, MaskCompiler, Sector};
use crate::material::Material;
use crate::timer::Timer;

/// The x dimension of every grid is padded to a multiple of this many cells.
pub const LANE_GRANULARITY: u32 = 4;

/// Dense storage of every cell in the construction's bounds.
///
/// Cells are stored row-major in z, y, x order. The x dimension is padded for
/// batched classification; padding cells and any lane outside the declared
/// bounds are emptied when the grid is created, so they never yield atoms.
#[derive(Debug, Clone)]
pub struct Grid {
    basis: BasisKind,
    material: Material,
    bounds: UVec3,
    dimensions: UVec3,
    lattice_matrix: Mat3,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(
        basis: BasisKind,
        material: Material,
        bounds: UVec3,
        compiler: &MaskCompiler,
        statistics: &mut LatticeStatistics,
    ) -> Result<Self, LatticeError> {
        let _timer = Timer::new("Grid creation");

        let template = CellTemplate::for_basis(basis);
        let pattern = template.pattern(material)?;
        let lattice_matrix = basis.lattice_matrix(material)?;
        let dimensions = Self::dimensions_for(bounds);
        let cells = cell_count(dimensions);

        let mut grid = Self {
            basis,
            material,
            bounds,
            dimensions,
            lattice_matrix,
            cells: vec![pattern; cells],
        };
        statistics.cells = cells as u64;

        // Everything outside the bounds box is removed up front.
        let mut outside = Mask::all_zeros(cells);
        for plane in grid.clipping_planes() {
            let mask = compiler.compile(template, dimensions, &plane, &mut statistics.masks);
            statistics.planes_compiled += 1;
            outside.unite(&mask)?;
        }
        let cleared = grid.replace(EntityType::Empty, &outside)?;

        log::debug!(
            "created {} grid of {} {} cells for bounds {} ({} lanes clipped)",
            basis,
            material,
            dimensions,
            bounds,
            cleared
        );
        Ok(grid)
    }

    /// Grid dimensions for bounds given in whole cells.
    pub fn dimensions_for(bounds: UVec3) -> UVec3 {
        UVec3::new(
            bounds.x.next_multiple_of(LANE_GRANULARITY),
            bounds.y,
            bounds.z,
        )
    }

    /// The six faces of the bounds box, each facing outwards.
    pub fn clipping_planes(&self) -> [Plane; 6] {
        let far = self.bounds.as_vec3();
        [
            Plane::new(Vec3::ZERO, Vec3::NEG_X),
            Plane::new(Vec3::ZERO, Vec3::NEG_Y),
            Plane::new(Vec3::ZERO, Vec3::NEG_Z),
            Plane::new(far, Vec3::X),
            Plane::new(far, Vec3::Y),
            Plane::new(far, Vec3::Z),
        ]
    }

    /// Overwrites every occupied lane selected by `mask` with `entity_type`.
    ///
    /// Empty lanes are never revived, so removal is permanent for the life of
    /// the grid. Returns the number of lanes written.
    pub fn replace(&mut self, entity_type: EntityType, mask: &Mask) -> Result<u64, LatticeError> {
        if let EntityType::Bond(_) = entity_type {
            return Err(LatticeError::UnsupportedEntity(entity_type));
        }
        if mask.len() != self.cells.len() {
            return Err(LatticeError::SizeMismatch {
                expected: self.cells.len(),
                found: mask.len(),
            });
        }

        let code = entity_type.pack();
        let written = self
            .cells
            .iter_mut()
            .zip(mask.as_slice())
            .map(|(cell, &bits)| u64::from(cell.replace(code, bits)))
            .sum();
        Ok(written)
    }

    /// Extracts every occupied lane as an entity positioned in nanometers.
    ///
    /// Cells are visited in storage order and lanes in template order, so the
    /// result is deterministic.
    pub fn entities(&self) -> Vec<Entity> {
        let _timer = Timer::new("Entity extraction");

        let template = CellTemplate::for_basis(self.basis);
        let mut entities = Vec::with_capacity(self.atom_count());
        let positions = Sector::new(UVec3::ZERO, self.dimensions).cells();

        for (position, cell) in positions.zip(&self.cells) {
            let corner = position.as_vec3();
            for (lane, &offset) in template.offsets().iter().enumerate() {
                let code = cell.code(lane);
                if code == EMPTY_CODE {
                    continue;
                }
                // Lanes only ever hold codes produced by `EntityType::pack`.
                if let Some(entity_type) = EntityType::unpack(code) {
                    let position = self.lattice_matrix * (corner + offset);
                    entities.push(Entity::new(position, entity_type));
                }
            }
        }

        entities
    }

    /// Number of occupied lanes.
    pub fn atom_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| cell.occupancy().count_ones() as usize)
            .sum()
    }

    pub fn basis(&self) -> BasisKind {
        self.basis
    }

    pub fn material(&self) -> Material {
        self.material
    }

    /// Declared bounds, in cells.
    pub fn bounds(&self) -> UVec3 {
        self.bounds
    }

    /// Stored cell counts, including padding.
    pub fn dimensions(&self) -> UVec3 {
        self.dimensions
    }

    pub fn template(&self) -> &'static CellTemplate {
        CellTemplate::for_basis(self.basis)
    }

    /// Maps working cell coordinates to nanometers.
    pub fn lattice_matrix(&self) -> Mat3 {
        self.lattice_matrix
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The packed cell records as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }
}

// End of File
