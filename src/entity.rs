// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::fmt;

use glam::Vec3;
use periodic_table::Element;
use serde::{Deserialize, Serialize};

/// Packed lane value of an empty lane.
pub const EMPTY_CODE: i8 = 0;
/// Packed lane value of a sigma bond. Reserved for topology compilation.
pub const SIGMA_BOND_CODE: i8 = -1;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondKind {
    Sigma,
}

/// What occupies a lattice lane.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Atom(Element),
    Bond(BondKind),
    Empty,
}

impl EntityType {
    /// Packs into a single signed byte: `0` is empty, a positive value is an
    /// atomic number, negative values are bonds.
    #[inline]
    pub fn pack(self) -> i8 {
        match self {
            EntityType::Atom(element) => element.atomic_number() as i8,
            EntityType::Bond(BondKind::Sigma) => SIGMA_BOND_CODE,
            EntityType::Empty => EMPTY_CODE,
        }
    }

    /// Inverse of [`pack`](Self::pack). Returns `None` for codes no entity packs to.
    #[inline]
    pub fn unpack(code: i8) -> Option<Self> {
        match code {
            EMPTY_CODE => Some(EntityType::Empty),
            SIGMA_BOND_CODE => Some(EntityType::Bond(BondKind::Sigma)),
            n if n > 0 => Element::from_atomic_number(n as u8).map(EntityType::Atom),
            _ => None,
        }
    }

    pub fn element(self) -> Option<Element> {
        match self {
            EntityType::Atom(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == EntityType::Empty
    }
}

impl From<Element> for EntityType {
    fn from(element: Element) -> Self {
        EntityType::Atom(element)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Atom(element) => write!(f, "atom {element}"),
            EntityType::Bond(BondKind::Sigma) => f.write_str("sigma bond"),
            EntityType::Empty => f.write_str("empty"),
        }
    }
}

/// One extracted lattice entity, positioned in nanometers.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub position: Vec3,
    pub entity_type: EntityType,
}

impl Entity {
    pub fn new(position: Vec3, entity_type: EntityType) -> Self {
        Self {
            position,
            entity_type,
        }
    }

    #[inline]
    pub fn element(&self) -> Option<Element> {
        self.entity_type.element()
    }
}

// End of File
