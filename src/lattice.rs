// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::marker::PhantomData;

use glam::Vec3;

use crate::basis::Basis;
use crate::bounding_box::BoundingBox;
use crate::config::{LatticeOptions, LatticeStatistics};
use crate::context::{ConstructionContext, ScopeKind};
use crate::entity::Entity;
use crate::error::LatticeError;
use crate::grid::Grid;
use crate::material::Material;
use crate::timer::Timer;

/// A crystal lattice carved out of a solid block of cells.
///
/// The build closure receives the h, k, l basis vectors in working cell
/// coordinates and a fresh [`ConstructionContext`]. It declares bounds and
/// material, then opens volumes and carves them with planes:
///
/// ```
/// use atomcad_lattice::prelude::*;
///
/// let lattice = Lattice::<Cubic>::build(|[h, k, l], ctx| {
///     ctx.bounds(4.0 * h + 4.0 * k + 4.0 * l)?;
///     ctx.material(Material::Elemental(Element::Carbon))?;
///     ctx.volume(|ctx| {
///         ctx.origin(2.0 * h)?;
///         ctx.plane(h)?;
///         ctx.replace(EntityType::Empty)
///     })
/// })?;
/// assert_eq!(lattice.atoms().len(), 256);
/// # Ok::<(), LatticeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Lattice<B: Basis> {
    grid: Grid,
    atoms: Vec<Entity>,
    statistics: LatticeStatistics,
    _basis: PhantomData<B>,
}

impl<B: Basis> Lattice<B> {
    pub fn build<F>(build: F) -> Result<Self, LatticeError>
    where
        F: FnOnce([Vec3; 3], &mut ConstructionContext) -> Result<(), LatticeError>,
    {
        Self::build_with_options(LatticeOptions::default(), build)
    }

    pub fn build_with_options<F>(options: LatticeOptions, build: F) -> Result<Self, LatticeError>
    where
        F: FnOnce([Vec3; 3], &mut ConstructionContext) -> Result<(), LatticeError>,
    {
        let _timer = Timer::new("Lattice construction");
        let log_statistics = options.log_statistics;

        let mut context = ConstructionContext::with_options(options)?;
        context.push_scope(ScopeKind::Lattice)?;
        context.bind_basis(B::KIND)?;
        build(B::KIND.basis_vectors(), &mut context)?;
        context.pop_scope(ScopeKind::Lattice)?;

        let (grid, mut statistics) = context.finish()?;
        let atoms = grid.entities();
        statistics.atoms = atoms.len() as u64;
        if log_statistics {
            statistics.log_statistics();
        }

        Ok(Self {
            grid,
            atoms,
            statistics,
            _basis: PhantomData,
        })
    }

    /// Every surviving atom, positioned in nanometers.
    pub fn atoms(&self) -> &[Entity] {
        &self.atoms
    }

    pub fn into_atoms(self) -> Vec<Entity> {
        self.atoms
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn material(&self) -> Material {
        self.grid.material()
    }

    /// The declared bounds mapped to nanometers.
    pub fn bounds_box(&self) -> BoundingBox {
        let far = self.grid.bounds().as_vec3();
        let matrix = self.grid.lattice_matrix();
        BoundingBox::enclosing([Vec3::ZERO, far].map(|corner| matrix * corner))
    }

    pub fn statistics(&self) -> &LatticeStatistics {
        &self.statistics
    }
}

// End of File
