// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Fixed sub-lattice layouts of one unit cell, and the packed per-cell record.
//!
//! Both templates hold eight lanes. Lanes come in bonded pairs: every even
//! lane belongs to the first sublattice, and the following odd lane is its
//! partner on the second sublattice. No lane sits on a cell face or on a
//! half-cell plane, so cuts through integer or half-integer lattice
//! coordinates never pass through an atom.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use periodic_table::Element;
use static_assertions::const_assert_eq;
use std::mem;

use crate::basis::BasisKind;
use crate::entity::{EntityType, EMPTY_CODE};
use crate::error::LatticeError;
use crate::material::Material;

/// Number of lanes in every cell.
pub const LANES: usize = 8;

const ONE_SIXTH: f32 = 1.0 / 6.0;
const ONE_THIRD: f32 = 1.0 / 3.0;
const TWO_THIRDS: f32 = 2.0 / 3.0;
const FIVE_SIXTHS: f32 = 5.0 / 6.0;

/// Diamond cubic, with the cell origin at the midpoint of a bond.
///
/// Sites sit an eighth of a cell off the conventional (0, ½) positions, so
/// extracted positions are shifted by `a / 8` along each axis relative to a
/// lattice with an atom at the origin.
static CUBIC: CellTemplate = CellTemplate {
    basis: BasisKind::Cubic,
    offsets: [
        Vec3::new(0.125, 0.125, 0.125),
        Vec3::new(0.375, 0.375, 0.375),
        Vec3::new(0.625, 0.625, 0.125),
        Vec3::new(0.875, 0.875, 0.375),
        Vec3::new(0.625, 0.125, 0.625),
        Vec3::new(0.875, 0.375, 0.875),
        Vec3::new(0.125, 0.625, 0.625),
        Vec3::new(0.375, 0.875, 0.875),
    ],
};

/// Lonsdaleite in the orthohexagonal (h, h + 2k, l) cell.
static HEXAGONAL: CellTemplate = CellTemplate {
    basis: BasisKind::Hexagonal,
    offsets: [
        Vec3::new(0.25, ONE_THIRD, 0.0625),
        Vec3::new(0.25, ONE_THIRD, 0.4375),
        Vec3::new(0.75, ONE_SIXTH, 0.5625),
        Vec3::new(0.75, ONE_SIXTH, 0.9375),
        Vec3::new(0.75, FIVE_SIXTHS, 0.0625),
        Vec3::new(0.75, FIVE_SIXTHS, 0.4375),
        Vec3::new(0.25, TWO_THIRDS, 0.5625),
        Vec3::new(0.25, TWO_THIRDS, 0.9375),
    ],
};

#[derive(Debug)]
pub struct CellTemplate {
    basis: BasisKind,
    offsets: [Vec3; LANES],
}

impl CellTemplate {
    pub fn for_basis(basis: BasisKind) -> &'static CellTemplate {
        match basis {
            BasisKind::Cubic => &CUBIC,
            BasisKind::Hexagonal => &HEXAGONAL,
        }
    }

    pub fn basis(&self) -> BasisKind {
        self.basis
    }

    /// Fractional position of each lane within its cell, in working coordinates.
    pub fn offsets(&self) -> &[Vec3; LANES] {
        &self.offsets
    }

    /// The mask bit of `lane`.
    #[inline]
    pub const fn flag(lane: usize) -> u8 {
        1 << lane
    }

    /// Sublattice of `lane`: 0 for the first element of a checkerboard, 1 for the second.
    #[inline]
    pub const fn parity(lane: usize) -> usize {
        lane & 1
    }

    /// The repeating cell a material fills the grid with.
    ///
    /// Gold keeps only the first sublattice, which turns diamond cubic into
    /// face-centered cubic.
    pub fn pattern(&self, material: Material) -> Result<Cell, LatticeError> {
        material.validate(self.basis)?;

        let mut cell = Cell::EMPTY;
        for (lane, code) in cell.0.iter_mut().enumerate() {
            let first = Self::parity(lane) == 0;
            *code = match material {
                Material::Elemental(Element::Gold) if !first => EMPTY_CODE,
                Material::Elemental(element) => EntityType::Atom(element).pack(),
                Material::Checkerboard(a, _) if first => EntityType::Atom(a).pack(),
                Material::Checkerboard(_, b) => EntityType::Atom(b).pack(),
            };
        }
        Ok(cell)
    }
}

/// Eight packed entity codes, one per lane.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Cell(pub [i8; LANES]);

const_assert_eq!(mem::size_of::<Cell>(), mem::size_of::<u64>());

impl Cell {
    pub const EMPTY: Cell = Cell([EMPTY_CODE; LANES]);

    pub fn splat(entity_type: EntityType) -> Self {
        Cell([entity_type.pack(); LANES])
    }

    #[inline]
    pub fn code(&self, lane: usize) -> i8 {
        self.0[lane]
    }

    pub fn entity_type(&self, lane: usize) -> Option<EntityType> {
        EntityType::unpack(self.0[lane])
    }

    /// Bitmask of the lanes holding anything.
    pub fn occupancy(&self) -> u8 {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &code)| code != EMPTY_CODE)
            .fold(0, |bits, (lane, _)| bits | CellTemplate::flag(lane))
    }

    /// Overwrites every occupied lane selected by `mask` with `code`. Empty
    /// lanes stay empty. Returns how many lanes were written.
    #[inline]
    pub fn replace(&mut self, code: i8, mask: u8) -> u32 {
        let mut written = 0;
        for (lane, value) in self.0.iter_mut().enumerate() {
            if mask & CellTemplate::flag(lane) != 0 && *value != EMPTY_CODE {
                *value = code;
                written += 1;
            }
        }
        written
    }

    /// Packs all eight lanes into one word, lane 0 in the low byte.
    pub fn to_bits(self) -> u64 {
        u64::from_le_bytes(bytemuck::cast(self.0))
    }

    pub fn from_bits(bits: u64) -> Self {
        Cell(bytemuck::cast(bits.to_le_bytes()))
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// End of File
