// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::fmt;

use glam::Vec3;
use thiserror::Error;

use crate::basis::BasisKind;
use crate::context::ScopeKind;
use crate::entity::EntityType;
use crate::material::Material;

/// A declaration that may be made at most once per construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Binding {
    Basis,
    Bounds,
    Material,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Binding::Basis => "Basis",
            Binding::Bounds => "Bounds",
            Binding::Material => "Material",
        })
    }
}

/// Every operation a construction context can be asked to perform.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    Lattice,
    Basis,
    Bounds,
    Material,
    Volume,
    Concave,
    Convex,
    Origin,
    Plane,
    Replace,
    /// Closing a scope of the given kind.
    End(ScopeKind),
    Finish,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Lattice => "Lattice",
            Operation::Basis => "Basis",
            Operation::Bounds => "Bounds",
            Operation::Material => "Material",
            Operation::Volume => "Volume",
            Operation::Concave => "Concave",
            Operation::Convex => "Convex",
            Operation::Origin => "Origin",
            Operation::Plane => "Plane",
            Operation::Replace => "Replace",
            Operation::Finish => "Finish",
            Operation::End(kind) => return write!(f, "end of {kind}"),
        };
        f.write_str(name)
    }
}

/// Configuration errors raised while compiling a lattice.
///
/// All of them are detected synchronously from the caller's declarative
/// description, so none is retried: the first error aborts the construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    #[error("{0} was declared more than once")]
    DuplicateBinding(Binding),

    #[error("{operation} is not allowed {}", describe_scope(.scope))]
    InvalidScope {
        operation: Operation,
        scope: Option<ScopeKind>,
    },

    #[error("{binding} must be declared before {operation}")]
    MissingBinding {
        binding: Binding,
        operation: Operation,
    },

    #[error("bounds must be whole numbers of cells, got {0}")]
    NonIntegerBounds(Vec3),

    #[error("bounds must not be negative, got {0}")]
    NegativeBounds(Vec3),

    #[error("{material} is not supported on a {basis} basis")]
    UnsupportedMaterial { basis: BasisKind, material: Material },

    #[error("unrecognized material {0}")]
    UnrecognizedMaterial(Material),

    #[error("{0} cannot be placed by a lattice replace")]
    UnsupportedEntity(EntityType),

    #[error("mask length mismatch: expected {expected} cells, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("a lattice construction is already active on this context")]
    Reentrancy,

    #[error("invalid mask compiler options: {0}")]
    InvalidOptions(&'static str),
}

fn describe_scope(scope: &Option<ScopeKind>) -> String {
    match scope {
        Some(kind) => format!("inside {kind}"),
        None => "outside of a Lattice".to_string(),
    }
}

// End of File
