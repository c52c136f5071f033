// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Unit-cell geometry families.
//!
//! Both families are stored and classified in an orthogonal working basis
//! with unit-length cells. For [`Cubic`] that basis is h, k, l itself. For
//! [`Hexagonal`] it is h, h + 2k, l: the orthohexagonal cell, which holds two
//! primitive hexagonal cells. In working coordinates the hexagonal k vector is
//! therefore (-½, ½, 0). Positions are mapped to real space only when atoms are
//! extracted.

use std::fmt;

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::LatticeError;
use crate::material::{constant, ConstantKind, Material};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasisKind {
    Cubic,
    Hexagonal,
}

impl BasisKind {
    /// The h, k, l lattice vectors in working cell coordinates.
    pub fn basis_vectors(self) -> [Vec3; 3] {
        match self {
            BasisKind::Cubic => [Vec3::X, Vec3::Y, Vec3::Z],
            BasisKind::Hexagonal => [Vec3::X, Vec3::new(-0.5, 0.5, 0.0), Vec3::Z],
        }
    }

    /// Maps working cell coordinates to nanometers for the given material.
    pub fn lattice_matrix(self, material: Material) -> Result<Mat3, LatticeError> {
        match self {
            BasisKind::Cubic => {
                let a = constant(ConstantKind::Square, material)?;
                Ok(Mat3::from_diagonal(Vec3::splat(a)))
            }
            BasisKind::Hexagonal => {
                let a = constant(ConstantKind::Hexagon, material)?;
                let c = constant(ConstantKind::Prism, material)?;
                // Columns are h, h + 2k and l in Cartesian space.
                Ok(Mat3::from_cols(
                    Vec3::new(a, 0.0, 0.0),
                    Vec3::new(0.0, a * 3f32.sqrt(), 0.0),
                    Vec3::new(0.0, 0.0, c),
                ))
            }
        }
    }
}

impl fmt::Display for BasisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BasisKind::Cubic => "cubic",
            BasisKind::Hexagonal => "hexagonal",
        })
    }
}

/// Type-level selection of the unit-cell geometry a [`Lattice`](crate::Lattice) is built on.
pub trait Basis {
    const KIND: BasisKind;
}

/// Edges of a cube.
#[derive(Debug, Copy, Clone, Default)]
pub struct Cubic;

/// Sides of a hexagonal prism.
#[derive(Debug, Copy, Clone, Default)]
pub struct Hexagonal;

impl Basis for Cubic {
    const KIND: BasisKind = BasisKind::Cubic;
}

impl Basis for Hexagonal {
    const KIND: BasisKind = BasisKind::Hexagonal;
}

// End of File
