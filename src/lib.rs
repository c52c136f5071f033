// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Volumetric lattice construction.
//!
//! A construction fills a block of crystal unit cells with a material, then
//! carves it with planes grouped into volumes, and finally extracts the atoms
//! that survive. Everything is resolved on a dense grid of packed eight-lane
//! cells with bitwise masks, so carving cost scales with the number of planes
//! and the area they cut through, not with the number of atoms.

pub mod basis;
mod bounding_box;
pub mod cell;
pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod grid;
mod lattice;
pub mod mask;
pub mod material;
mod timer;

pub use basis::{Basis, BasisKind, Cubic, Hexagonal};
pub use bounding_box::BoundingBox;
pub use config::{LatticeOptions, LatticeStatistics, MaskCompilerOptions, MaskStatistics};
pub use context::{ConstructionContext, ScopeKind};
pub use entity::{BondKind, Entity, EntityType};
pub use error::LatticeError;
pub use geometry::Plane;
pub use grid::Grid;
pub use lattice::Lattice;
pub use material::{constant, ConstantKind, Material};

pub use glam::{UVec3, Vec3};
pub use periodic_table::Element;

pub mod prelude {
    pub use crate::{
        constant, BasisKind, ConstantKind, ConstructionContext, Cubic, Element, Entity,
        EntityType, Hexagonal, Lattice, LatticeError, LatticeOptions, Material, ScopeKind, Vec3,
    };
}

// End of File
