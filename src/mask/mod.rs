// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Per-cell lane selections and the compiler that derives them from planes.
//!
//! A [`Mask`] holds one byte per grid cell, in the grid's z, y, x order. Bit
//! `i` of a cell's byte is set when lane `i` lies in the "one" volume of the
//! plane or planes the mask was built from. Masks from several planes combine
//! by intersection (every plane must select the lane) or union (any plane
//! may), which is enough to describe any solid bounded by planes.

mod compiler;
mod sector;

pub use compiler::MaskCompiler;
pub use sector::{Sector, SectorClass};

use glam::UVec3;

use crate::error::LatticeError;

/// Number of cells in a grid of `dimensions`.
#[inline]
pub fn cell_count(dimensions: UVec3) -> usize {
    dimensions.x as usize * dimensions.y as usize * dimensions.z as usize
}

/// Position of `cell` in z, y, x row-major storage.
#[inline]
pub fn cell_index(dimensions: UVec3, cell: UVec3) -> usize {
    (cell.z as usize * dimensions.y as usize + cell.y as usize) * dimensions.x as usize
        + cell.x as usize
}

/// How a scope folds the masks of its planes together.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Bitwise AND: geometric intersection.
    Intersection,
    /// Bitwise OR: geometric union.
    Union,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mask {
    bits: Vec<u8>,
}

impl Mask {
    pub fn all_ones(cells: usize) -> Self {
        Self {
            bits: vec![u8::MAX; cells],
        }
    }

    pub fn all_zeros(cells: usize) -> Self {
        Self {
            bits: vec![0; cells],
        }
    }

    pub fn from_bits(bits: Vec<u8>) -> Self {
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    #[inline]
    pub fn get(&self, cell: usize) -> u8 {
        self.bits[cell]
    }

    /// Total number of selected lanes.
    pub fn count_ones(&self) -> u64 {
        self.bits.iter().map(|bits| u64::from(bits.count_ones())).sum()
    }

    /// In-place bitwise AND.
    pub fn intersect(&mut self, other: &Mask) -> Result<(), LatticeError> {
        self.check_len(other)?;
        for (bits, other) in self.bits.iter_mut().zip(&other.bits) {
            *bits &= *other;
        }
        Ok(())
    }

    /// In-place bitwise OR.
    pub fn unite(&mut self, other: &Mask) -> Result<(), LatticeError> {
        self.check_len(other)?;
        for (bits, other) in self.bits.iter_mut().zip(&other.bits) {
            *bits |= *other;
        }
        Ok(())
    }

    pub fn combine(&mut self, other: &Mask, combinator: Combinator) -> Result<(), LatticeError> {
        match combinator {
            Combinator::Intersection => self.intersect(other),
            Combinator::Union => self.unite(other),
        }
    }

    fn check_len(&self, other: &Mask) -> Result<(), LatticeError> {
        if self.len() != other.len() {
            return Err(LatticeError::SizeMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        Ok(())
    }
}

// End of File
