// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::fmt;

use periodic_table::Element;
use serde::{Deserialize, Serialize};

use crate::basis::BasisKind;
use crate::error::LatticeError;

/// The species filling a lattice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    /// A monoatomic lattice.
    Elemental(Element),
    /// Two elements alternating between sublattices, as in zincblende or
    /// wurtzite compound semiconductors. The first element occupies the even
    /// lanes of each cell.
    Checkerboard(Element, Element),
}

impl Material {
    /// Checks that this material can be built on `basis`.
    pub fn validate(self, basis: BasisKind) -> Result<(), LatticeError> {
        cubic_lattice_constant(self).ok_or(LatticeError::UnrecognizedMaterial(self))?;
        if basis == BasisKind::Hexagonal && self == Material::Elemental(Element::Gold) {
            return Err(LatticeError::UnsupportedMaterial {
                basis,
                material: self,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Material::Elemental(element) => write!(f, "elemental {element}"),
            Material::Checkerboard(a, b) => write!(f, "checkerboard {a}/{b}"),
        }
    }
}

/// Lattice constants a caller can query for geometry math.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstantKind {
    /// Edge of the cubic cell.
    Square,
    /// Edge of the hexagon in a hexagonal cell.
    Hexagon,
    /// Height of the hexagonal prism.
    Prism,
}

/// Looks up a lattice constant of `material`, in nanometers.
///
/// Hexagonal constants follow from the cubic one through the ideal
/// tetrahedral geometry: the hexagon edge is the cubic face diagonal halved,
/// and the prism is `√(8/3)` hexagon edges tall.
pub fn constant(kind: ConstantKind, material: Material) -> Result<f32, LatticeError> {
    let square =
        cubic_lattice_constant(material).ok_or(LatticeError::UnrecognizedMaterial(material))?;
    if kind != ConstantKind::Square {
        material.validate(BasisKind::Hexagonal)?;
    }

    let hexagon = square / 2f32.sqrt();
    Ok(match kind {
        ConstantKind::Square => square,
        ConstantKind::Hexagon => hexagon,
        ConstantKind::Prism => hexagon * (8.0f32 / 3.0).sqrt(),
    })
}

fn cubic_lattice_constant(material: Material) -> Option<f32> {
    use Element::*;

    match material {
        Material::Elemental(element) => match element {
            Carbon => Some(0.3567),
            Silicon => Some(0.5431),
            Germanium => Some(0.5658),
            Gold => Some(0.4078),
            _ => None,
        },
        Material::Checkerboard(a, b) => {
            // Order-insensitive: sort the pair by atomic number.
            let pair = if a <= b { (a, b) } else { (b, a) };
            match pair {
                (Boron, Nitrogen) => Some(0.3615),
                (Boron, Phosphorus) => Some(0.4538),
                (Carbon, Silicon) => Some(0.4360),
                (Nitrogen, Aluminium) => Some(0.4380),
                (Nitrogen, Gallium) => Some(0.4520),
                (Aluminium, Phosphorus) => Some(0.5463),
                (Aluminium, Arsenic) => Some(0.5661),
                (Phosphorus, Gallium) => Some(0.5451),
                (Gallium, Arsenic) => Some(0.5653),
                _ => None,
            }
        }
    }
}

// End of File
