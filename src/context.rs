// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! The builder state of one lattice construction.
//!
//! A [`ConstructionContext`] owns everything a construction touches: the
//! bound basis, bounds and material, the grid, and a stack of open scopes.
//! Scopes nest as `Lattice → Volume*` and `Volume → (Volume | Concave |
//! Convex)*`, with `Concave` and `Convex` nesting freely inside each other.
//!
//! Each open scope keeps the planes declared in it and a running mask.
//! `Volume` and `Concave` scopes intersect the masks of their planes, `Convex`
//! scopes unite them. When a `Concave` or `Convex` scope closes, its mask is
//! folded into the enclosing scope the same way the enclosing scope folds its
//! own planes, and its planes stay on the enclosing scope's list. Closing a
//! `Volume` discards its planes and mask; only the grid edits survive.
//!
//! Every operation checks that it is legal at the top of the stack and
//! returns a [`LatticeError`] naming the violated rule otherwise.

use std::fmt;

use glam::{UVec3, Vec3};

use crate::basis::BasisKind;
use crate::config::{LatticeOptions, LatticeStatistics};
use crate::entity::EntityType;
use crate::error::{Binding, LatticeError, Operation};
use crate::geometry::Plane;
use crate::grid::Grid;
use crate::mask::{Combinator, Mask, MaskCompiler};
use crate::material::Material;

/// How far declared bounds may stray from a whole number of cells.
const BOUNDS_EPSILON: f32 = 1e-3;

const CARVING_SCOPES: &[ScopeKind] = &[ScopeKind::Volume, ScopeKind::Concave, ScopeKind::Convex];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Lattice,
    Volume,
    Concave,
    Convex,
}

impl ScopeKind {
    /// How planes declared directly in this scope are folded together.
    pub fn combinator(self) -> Combinator {
        match self {
            ScopeKind::Convex => Combinator::Union,
            ScopeKind::Lattice | ScopeKind::Volume | ScopeKind::Concave => Combinator::Intersection,
        }
    }

    fn operation(self) -> Operation {
        match self {
            ScopeKind::Lattice => Operation::Lattice,
            ScopeKind::Volume => Operation::Volume,
            ScopeKind::Concave => Operation::Concave,
            ScopeKind::Convex => Operation::Convex,
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScopeKind::Lattice => "Lattice",
            ScopeKind::Volume => "Volume",
            ScopeKind::Concave => "Concave",
            ScopeKind::Convex => "Convex",
        })
    }
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    /// Cumulative translation applied to plane origins declared in this scope.
    origin: Vec3,
    planes: Vec<Plane>,
    /// `None` until the first plane: the scope selects every lane.
    mask: Option<Mask>,
}

impl Scope {
    fn new(kind: ScopeKind, origin: Vec3) -> Self {
        Self {
            kind,
            origin,
            planes: Vec::new(),
            mask: None,
        }
    }

    fn accumulate(&mut self, mask: Mask) -> Result<(), LatticeError> {
        match self.mask.as_mut() {
            Some(current) => current.combine(&mask, self.kind.combinator()),
            None => {
                self.mask = Some(mask);
                Ok(())
            }
        }
    }
}

#[derive(Debug)]
pub struct ConstructionContext {
    options: LatticeOptions,
    compiler: MaskCompiler,
    started: bool,
    basis: Option<BasisKind>,
    bounds: Option<UVec3>,
    material: Option<Material>,
    grid: Option<Grid>,
    scopes: Vec<Scope>,
    statistics: LatticeStatistics,
}

impl Default for ConstructionContext {
    fn default() -> Self {
        let options = LatticeOptions::default();
        Self {
            compiler: MaskCompiler::default(),
            options,
            started: false,
            basis: None,
            bounds: None,
            material: None,
            grid: None,
            scopes: Vec::new(),
            statistics: LatticeStatistics::new(),
        }
    }
}

impl ConstructionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LatticeOptions) -> Result<Self, LatticeError> {
        options.validate()?;
        Ok(Self {
            compiler: MaskCompiler::new(options.mask.clone())?,
            options,
            ..Self::default()
        })
    }

    // ------------------------------------------------------------------------
    // Scopes
    // ------------------------------------------------------------------------

    pub fn push_scope(&mut self, kind: ScopeKind) -> Result<(), LatticeError> {
        match kind {
            ScopeKind::Lattice => {
                if self.started {
                    return Err(LatticeError::Reentrancy);
                }
                self.started = true;
            }
            ScopeKind::Volume => {
                self.require_scope(Operation::Volume, &[ScopeKind::Lattice, ScopeKind::Volume])?;
                if self.grid.is_none() {
                    return Err(LatticeError::MissingBinding {
                        binding: self.missing_binding(),
                        operation: Operation::Volume,
                    });
                }
            }
            ScopeKind::Concave | ScopeKind::Convex => {
                self.require_scope(kind.operation(), CARVING_SCOPES)?;
            }
        }

        let origin = self.origin_translation();
        self.scopes.push(Scope::new(kind, origin));
        log::trace!("entered {} at depth {}", kind, self.scopes.len());
        Ok(())
    }

    pub fn pop_scope(&mut self, kind: ScopeKind) -> Result<(), LatticeError> {
        let mismatch = |scope: Option<ScopeKind>| LatticeError::InvalidScope {
            operation: Operation::End(kind),
            scope,
        };
        let scope = self.scopes.pop().ok_or_else(|| mismatch(None))?;
        if scope.kind != kind {
            let found = scope.kind;
            self.scopes.push(scope);
            return Err(mismatch(Some(found)));
        }

        if matches!(kind, ScopeKind::Concave | ScopeKind::Convex) {
            if let Some(parent) = self.scopes.last_mut() {
                parent.planes.extend(scope.planes);
                if let Some(mask) = scope.mask {
                    parent.accumulate(mask)?;
                }
            }
        }

        log::trace!("left {} at depth {}", kind, self.scopes.len() + 1);
        Ok(())
    }

    /// Runs `build` inside a `Volume` scope.
    pub fn volume<F>(&mut self, build: F) -> Result<(), LatticeError>
    where
        F: FnOnce(&mut Self) -> Result<(), LatticeError>,
    {
        self.scoped(ScopeKind::Volume, build)
    }

    /// Runs `build` inside a `Concave` scope: its planes select the
    /// intersection of their "one" volumes.
    pub fn concave<F>(&mut self, build: F) -> Result<(), LatticeError>
    where
        F: FnOnce(&mut Self) -> Result<(), LatticeError>,
    {
        self.scoped(ScopeKind::Concave, build)
    }

    /// Runs `build` inside a `Convex` scope: its planes select the union of
    /// their "one" volumes.
    pub fn convex<F>(&mut self, build: F) -> Result<(), LatticeError>
    where
        F: FnOnce(&mut Self) -> Result<(), LatticeError>,
    {
        self.scoped(ScopeKind::Convex, build)
    }

    fn scoped<F>(&mut self, kind: ScopeKind, build: F) -> Result<(), LatticeError>
    where
        F: FnOnce(&mut Self) -> Result<(), LatticeError>,
    {
        self.push_scope(kind)?;
        build(self)?;
        self.pop_scope(kind)
    }

    // ------------------------------------------------------------------------
    // Bindings
    // ------------------------------------------------------------------------

    pub fn bind_basis(&mut self, basis: BasisKind) -> Result<(), LatticeError> {
        self.require_scope(Operation::Basis, &[ScopeKind::Lattice])?;
        if self.basis.is_some() {
            return Err(LatticeError::DuplicateBinding(Binding::Basis));
        }
        self.basis = Some(basis);
        self.create_grid()
    }

    /// Declares the extent of the lattice, in whole cells along h, k, l (or
    /// h, h + 2k, l on a hexagonal basis).
    pub fn bounds(&mut self, bounds: Vec3) -> Result<(), LatticeError> {
        self.require_scope(Operation::Bounds, &[ScopeKind::Lattice])?;
        if self.bounds.is_some() {
            return Err(LatticeError::DuplicateBinding(Binding::Bounds));
        }
        self.bounds = Some(whole_cells(bounds)?);
        self.create_grid()
    }

    pub fn material(&mut self, material: Material) -> Result<(), LatticeError> {
        self.require_scope(Operation::Material, &[ScopeKind::Lattice])?;
        if self.material.is_some() {
            return Err(LatticeError::DuplicateBinding(Binding::Material));
        }
        let basis = self.basis.ok_or(LatticeError::MissingBinding {
            binding: Binding::Basis,
            operation: Operation::Material,
        })?;
        material.validate(basis)?;
        self.material = Some(material);
        self.create_grid()
    }

    fn create_grid(&mut self) -> Result<(), LatticeError> {
        if self.grid.is_some() {
            return Ok(());
        }
        if let (Some(basis), Some(bounds), Some(material)) = (self.basis, self.bounds, self.material) {
            let grid = Grid::new(basis, material, bounds, &self.compiler, &mut self.statistics)?;
            self.grid = Some(grid);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Carving
    // ------------------------------------------------------------------------

    /// Translates the origin of every plane declared later in this scope and
    /// its children. Undone when the scope closes.
    pub fn origin(&mut self, translation: Vec3) -> Result<(), LatticeError> {
        let scope = self.carving_scope(Operation::Origin)?;
        scope.origin += translation;
        Ok(())
    }

    /// Declares a plane through the current origin, whose normal points into
    /// the "one" volume.
    pub fn plane(&mut self, normal: Vec3) -> Result<(), LatticeError> {
        self.carving_scope(Operation::Plane)?;
        let grid = self.grid.as_ref().ok_or(LatticeError::MissingBinding {
            binding: Binding::Bounds,
            operation: Operation::Plane,
        })?;

        let plane = Plane::new(self.origin_translation(), normal);
        let mask = self.compiler.compile(
            grid.template(),
            grid.dimensions(),
            &plane,
            &mut self.statistics.masks,
        );
        self.statistics.planes_compiled += 1;

        let scope = self.carving_scope(Operation::Plane)?;
        scope.planes.push(plane);
        scope.accumulate(mask)
    }

    /// Overwrites every atom the current scope selects with `entity_type`.
    /// Replacing with [`EntityType::Empty`] removes atoms for good.
    pub fn replace(&mut self, entity_type: EntityType) -> Result<(), LatticeError> {
        self.carving_scope(Operation::Replace)?;
        let grid = self.grid.as_mut().ok_or(LatticeError::MissingBinding {
            binding: Binding::Bounds,
            operation: Operation::Replace,
        })?;

        let selection = self.scopes.last().and_then(|scope| scope.mask.as_ref());
        let written = match selection {
            Some(mask) => grid.replace(entity_type, mask)?,
            None => {
                let everything = Mask::all_ones(grid.cells().len());
                grid.replace(entity_type, &everything)?
            }
        };

        self.statistics.replaces += 1;
        self.statistics.lanes_replaced += written;
        log::debug!("replaced {} lanes with {}", written, entity_type);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    pub fn current_scope(&self) -> Option<ScopeKind> {
        self.scopes.last().map(|scope| scope.kind)
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// The cumulative origin translation of the innermost scope.
    pub fn origin_translation(&self) -> Vec3 {
        self.scopes.last().map_or(Vec3::ZERO, |scope| scope.origin)
    }

    /// Planes accumulated by the innermost scope, including those of closed
    /// `Concave`/`Convex` children.
    pub fn planes(&self) -> &[Plane] {
        self.scopes.last().map_or(&[], |scope| scope.planes.as_slice())
    }

    /// The innermost scope's running mask; `None` while it selects everything.
    pub fn selection(&self) -> Option<&Mask> {
        self.scopes.last().and_then(|scope| scope.mask.as_ref())
    }

    pub fn basis(&self) -> Option<BasisKind> {
        self.basis
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn options(&self) -> &LatticeOptions {
        &self.options
    }

    pub fn statistics(&self) -> &LatticeStatistics {
        &self.statistics
    }

    /// Ends the construction, handing over the grid.
    pub fn finish(self) -> Result<(Grid, LatticeStatistics), LatticeError> {
        if let Some(scope) = self.current_scope() {
            return Err(LatticeError::InvalidScope {
                operation: Operation::Finish,
                scope: Some(scope),
            });
        }
        let binding = self.missing_binding();
        let grid = self.grid.ok_or(LatticeError::MissingBinding {
            binding,
            operation: Operation::Finish,
        })?;
        Ok((grid, self.statistics))
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn require_scope(&self, operation: Operation, allowed: &[ScopeKind]) -> Result<(), LatticeError> {
        match self.current_scope() {
            Some(kind) if allowed.contains(&kind) => Ok(()),
            scope => Err(LatticeError::InvalidScope { operation, scope }),
        }
    }

    fn carving_scope(&mut self, operation: Operation) -> Result<&mut Scope, LatticeError> {
        self.require_scope(operation, CARVING_SCOPES)?;
        self.scopes.last_mut().ok_or(LatticeError::InvalidScope {
            operation,
            scope: None,
        })
    }

    fn missing_binding(&self) -> Binding {
        if self.basis.is_none() {
            Binding::Basis
        } else if self.bounds.is_none() {
            Binding::Bounds
        } else {
            Binding::Material
        }
    }
}

/// Converts declared bounds to cell counts.
fn whole_cells(bounds: Vec3) -> Result<UVec3, LatticeError> {
    let rounded = bounds.round();
    if !bounds.is_finite() || (bounds - rounded).abs().max_element() > BOUNDS_EPSILON {
        return Err(LatticeError::NonIntegerBounds(bounds));
    }
    if rounded.min_element() < 0.0 {
        return Err(LatticeError::NegativeBounds(bounds));
    }
    Ok(rounded.as_uvec3())
}

// End of File
