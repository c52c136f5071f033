use atomcad_lattice::error::{Binding, Operation};
use atomcad_lattice::{
    BasisKind, BondKind, ConstructionContext, Element, EntityType, LatticeError, Material,
    ScopeKind, Vec3,
};

const H: Vec3 = Vec3::X;
const K: Vec3 = Vec3::Y;
const L: Vec3 = Vec3::Z;

/// A context inside an open `Lattice` scope with a cubic basis bound.
fn lattice_context() -> ConstructionContext {
    crate::init_logger();
    let mut ctx = ConstructionContext::new();
    ctx.push_scope(ScopeKind::Lattice).unwrap();
    ctx.bind_basis(BasisKind::Cubic).unwrap();
    ctx
}

/// A lattice context with a 4×4×4 carbon grid.
fn carbon_context() -> ConstructionContext {
    let mut ctx = lattice_context();
    ctx.bounds(4.0 * H + 4.0 * K + 4.0 * L).unwrap();
    ctx.material(Material::Elemental(Element::Carbon)).unwrap();
    ctx
}

fn atom_count(ctx: &ConstructionContext) -> usize {
    ctx.grid().map_or(0, |grid| grid.atom_count())
}

// =============================================================================
// Scope nesting
// =============================================================================

#[test]
fn test_scope_depth_tracks_pushes_and_pops() {
    let mut ctx = carbon_context();
    assert_eq!(ctx.scope_depth(), 1);
    assert_eq!(ctx.current_scope(), Some(ScopeKind::Lattice));

    ctx.push_scope(ScopeKind::Volume).unwrap();
    ctx.push_scope(ScopeKind::Convex).unwrap();
    ctx.push_scope(ScopeKind::Concave).unwrap();
    assert_eq!(ctx.scope_depth(), 4);
    assert_eq!(ctx.current_scope(), Some(ScopeKind::Concave));

    ctx.pop_scope(ScopeKind::Concave).unwrap();
    ctx.pop_scope(ScopeKind::Convex).unwrap();
    ctx.pop_scope(ScopeKind::Volume).unwrap();
    ctx.pop_scope(ScopeKind::Lattice).unwrap();
    assert_eq!(ctx.scope_depth(), 0);
    assert_eq!(ctx.current_scope(), None);
}

#[test]
fn test_mismatched_pop_leaves_the_stack_alone() {
    let mut ctx = carbon_context();
    ctx.push_scope(ScopeKind::Volume).unwrap();

    let error = ctx.pop_scope(ScopeKind::Concave).unwrap_err();
    assert_eq!(
        error,
        LatticeError::InvalidScope {
            operation: Operation::End(ScopeKind::Concave),
            scope: Some(ScopeKind::Volume),
        }
    );
    insta::assert_snapshot!(error.to_string(), @"end of Concave is not allowed inside Volume");
    assert_eq!(ctx.current_scope(), Some(ScopeKind::Volume));
}

#[test]
fn test_carving_scopes_need_a_volume() {
    let mut ctx = carbon_context();
    let error = ctx.push_scope(ScopeKind::Concave).unwrap_err();
    assert_eq!(
        error,
        LatticeError::InvalidScope {
            operation: Operation::Concave,
            scope: Some(ScopeKind::Lattice),
        }
    );
    insta::assert_snapshot!(error.to_string(), @"Concave is not allowed inside Lattice");
}

#[test]
fn test_operations_outside_a_lattice() {
    let mut ctx = ConstructionContext::new();
    let error = ctx.plane(H).unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"Plane is not allowed outside of a Lattice");
    assert!(matches!(
        ctx.bounds(Vec3::ONE),
        Err(LatticeError::InvalidScope { scope: None, .. })
    ));
    assert!(matches!(
        ctx.pop_scope(ScopeKind::Lattice),
        Err(LatticeError::InvalidScope { scope: None, .. })
    ));
}

#[test]
fn test_second_lattice_is_reentrant() {
    let mut ctx = lattice_context();
    let error = ctx.push_scope(ScopeKind::Lattice).unwrap_err();
    assert_eq!(error, LatticeError::Reentrancy);
    insta::assert_snapshot!(error.to_string(), @"a lattice construction is already active on this context");

    // A closed construction cannot be restarted either.
    ctx.pop_scope(ScopeKind::Lattice).unwrap();
    assert_eq!(ctx.push_scope(ScopeKind::Lattice), Err(LatticeError::Reentrancy));
}

// =============================================================================
// Bindings
// =============================================================================

#[test]
fn test_duplicate_bindings() {
    let mut ctx = carbon_context();
    let error = ctx.bind_basis(BasisKind::Hexagonal).unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"Basis was declared more than once");
    assert_eq!(
        ctx.bounds(Vec3::ONE),
        Err(LatticeError::DuplicateBinding(Binding::Bounds))
    );
    assert_eq!(
        ctx.material(Material::Elemental(Element::Silicon)),
        Err(LatticeError::DuplicateBinding(Binding::Material))
    );
}

#[test]
fn test_bindings_only_inside_lattice_scope() {
    let mut ctx = lattice_context();
    ctx.bounds(Vec3::splat(2.0)).unwrap();
    ctx.material(Material::Elemental(Element::Carbon)).unwrap();
    ctx.push_scope(ScopeKind::Volume).unwrap();

    let error = ctx.bounds(Vec3::splat(2.0)).unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"Bounds is not allowed inside Volume");
}

#[test]
fn test_bounds_must_be_whole_and_non_negative() {
    let mut ctx = lattice_context();
    let error = ctx.bounds(Vec3::new(1.5, 1.0, 1.0)).unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"bounds must be whole numbers of cells, got [1.5, 1, 1]");

    assert_eq!(
        ctx.bounds(Vec3::new(-1.0, 2.0, 2.0)),
        Err(LatticeError::NegativeBounds(Vec3::new(-1.0, 2.0, 2.0)))
    );
    assert!(matches!(
        ctx.bounds(Vec3::new(f32::NAN, 1.0, 1.0)),
        Err(LatticeError::NonIntegerBounds(_))
    ));

    // Rounding slack is accepted.
    ctx.bounds(Vec3::new(2.0004, 1.9996, 3.0)).unwrap();
    ctx.material(Material::Elemental(Element::Carbon)).unwrap();
    assert_eq!(atom_count(&ctx), 2 * 2 * 3 * 8);
}

#[test]
fn test_material_needs_a_basis() {
    let mut ctx = ConstructionContext::new();
    ctx.push_scope(ScopeKind::Lattice).unwrap();
    assert_eq!(
        ctx.material(Material::Elemental(Element::Carbon)),
        Err(LatticeError::MissingBinding {
            binding: Binding::Basis,
            operation: Operation::Material,
        })
    );
}

#[test]
fn test_material_is_validated_against_the_basis() {
    let mut ctx = ConstructionContext::new();
    ctx.push_scope(ScopeKind::Lattice).unwrap();
    ctx.bind_basis(BasisKind::Hexagonal).unwrap();

    let error = ctx.material(Material::Elemental(Element::Gold)).unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"elemental Au is not supported on a hexagonal basis");
    assert_eq!(
        ctx.material(Material::Elemental(Element::Iron)),
        Err(LatticeError::UnrecognizedMaterial(Material::Elemental(
            Element::Iron
        )))
    );
    ctx.material(Material::Checkerboard(Element::Gallium, Element::Nitrogen))
        .unwrap();
}

#[test]
fn test_volume_needs_a_grid() {
    let mut ctx = lattice_context();
    ctx.bounds(Vec3::splat(2.0)).unwrap();
    let error = ctx.push_scope(ScopeKind::Volume).unwrap_err();
    assert_eq!(
        error,
        LatticeError::MissingBinding {
            binding: Binding::Material,
            operation: Operation::Volume,
        }
    );
    insta::assert_snapshot!(error.to_string(), @"Material must be declared before Volume");
}

#[test]
fn test_grid_is_created_once_everything_is_bound() {
    let mut ctx = lattice_context();
    ctx.material(Material::Elemental(Element::Carbon)).unwrap();
    assert!(ctx.grid().is_none());
    ctx.bounds(Vec3::new(1.0, 2.0, 3.0)).unwrap();
    assert_eq!(atom_count(&ctx), 48);
    assert_eq!(ctx.statistics().planes_compiled, 6);
}

// =============================================================================
// Carving
// =============================================================================

#[test]
fn test_unconstrained_volume_replaces_everything() {
    let mut ctx = carbon_context();
    ctx.volume(|ctx| {
        assert!(ctx.selection().is_none());
        ctx.replace(EntityType::Empty)
    })
    .unwrap();
    assert_eq!(atom_count(&ctx), 0);
    assert_eq!(ctx.statistics().replaces, 1);
    assert_eq!(ctx.statistics().lanes_replaced, 512);
}

#[test]
fn test_origin_is_cumulative_and_scoped() {
    let mut ctx = carbon_context();
    ctx.volume(|ctx| {
        ctx.origin(H)?;
        ctx.origin(K)?;
        assert_eq!(ctx.origin_translation(), H + K);

        ctx.concave(|ctx| {
            assert_eq!(ctx.origin_translation(), H + K);
            ctx.origin(L)?;
            ctx.plane(H)?;
            assert_eq!(ctx.planes()[0].origin, H + K + L);
            Ok(())
        })?;
        assert_eq!(ctx.origin_translation(), H + K);

        ctx.volume(|ctx| {
            assert_eq!(ctx.origin_translation(), H + K);
            assert!(ctx.planes().is_empty());
            Ok(())
        })
    })
    .unwrap();
    assert_eq!(ctx.origin_translation(), Vec3::ZERO);
}

#[test]
fn test_child_planes_are_appended_to_the_parent() {
    let mut ctx = carbon_context();
    ctx.volume(|ctx| {
        ctx.plane(-H)?;
        ctx.convex(|ctx| {
            ctx.plane(K)?;
            ctx.plane(L)
        })?;
        assert_eq!(ctx.planes().len(), 3);
        assert_eq!(ctx.planes()[0].normal, -H);
        assert_eq!(ctx.planes()[2].normal, L);
        Ok(())
    })
    .unwrap();
    assert!(ctx.planes().is_empty());
}

#[test]
fn test_empty_carving_scope_leaves_the_parent_unconstrained() {
    let mut ctx = carbon_context();
    ctx.volume(|ctx| {
        ctx.concave(|_| Ok(()))?;
        assert!(ctx.selection().is_none());
        ctx.origin(2.0 * H)?;
        ctx.plane(H)?;
        ctx.convex(|_| Ok(()))?;
        ctx.replace(EntityType::Empty)
    })
    .unwrap();
    assert_eq!(atom_count(&ctx), 256);
}

#[test]
fn test_volume_masks_do_not_leak_out() {
    let mut ctx = carbon_context();
    ctx.volume(|ctx| {
        ctx.origin(2.0 * H)?;
        ctx.plane(H)?;
        ctx.replace(EntityType::Atom(Element::Silicon))?;

        // A nested volume starts from nothing, so this removes every atom.
        ctx.volume(|ctx| ctx.replace(EntityType::Empty))
    })
    .unwrap();
    assert_eq!(atom_count(&ctx), 0);
    assert_eq!(ctx.statistics().lanes_replaced, 256 + 512);
}

#[test]
fn test_replace_rejects_bonds() {
    let mut ctx = carbon_context();
    let error = ctx
        .volume(|ctx| ctx.replace(EntityType::Bond(BondKind::Sigma)))
        .unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"sigma bond cannot be placed by a lattice replace");
    assert_eq!(atom_count(&ctx), 512);
}

#[test]
fn test_replace_outside_a_volume() {
    let mut ctx = carbon_context();
    assert_eq!(
        ctx.replace(EntityType::Empty),
        Err(LatticeError::InvalidScope {
            operation: Operation::Replace,
            scope: Some(ScopeKind::Lattice),
        })
    );
    assert_eq!(
        ctx.origin(H),
        Err(LatticeError::InvalidScope {
            operation: Operation::Origin,
            scope: Some(ScopeKind::Lattice),
        })
    );
}

// =============================================================================
// Finishing
// =============================================================================

#[test]
fn test_finish_hands_over_the_grid() {
    let mut ctx = carbon_context();
    ctx.volume(|ctx| {
        ctx.origin(2.0 * H)?;
        ctx.plane(H)?;
        ctx.replace(EntityType::Empty)
    })
    .unwrap();
    ctx.pop_scope(ScopeKind::Lattice).unwrap();

    let (grid, statistics) = ctx.finish().unwrap();
    assert_eq!(grid.atom_count(), 256);
    assert_eq!(statistics.planes_compiled, 7);
    assert_eq!(statistics.replaces, 1);
}

#[test]
fn test_finish_requires_closed_scopes() {
    let ctx = carbon_context();
    let error = ctx.finish().unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"Finish is not allowed inside Lattice");
}

#[test]
fn test_finish_requires_a_grid() {
    let mut ctx = lattice_context();
    ctx.bounds(Vec3::ONE).unwrap();
    ctx.pop_scope(ScopeKind::Lattice).unwrap();
    assert_eq!(
        ctx.finish().unwrap_err(),
        LatticeError::MissingBinding {
            binding: Binding::Material,
            operation: Operation::Finish,
        }
    );
}
