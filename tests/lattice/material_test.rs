use atomcad_lattice::{constant, BasisKind, ConstantKind, Element, LatticeError, Material};

const TOLERANCE: f32 = 1e-6;

fn square(material: Material) -> f32 {
    constant(ConstantKind::Square, material).unwrap()
}

#[test]
fn test_elemental_constants() {
    assert_eq!(square(Material::Elemental(Element::Carbon)), 0.3567);
    assert_eq!(square(Material::Elemental(Element::Silicon)), 0.5431);
    assert_eq!(square(Material::Elemental(Element::Germanium)), 0.5658);
    assert_eq!(square(Material::Elemental(Element::Gold)), 0.4078);
}

#[test]
fn test_checkerboard_constants() {
    use Element::*;

    let table = [
        (Boron, Nitrogen, 0.3615),
        (Boron, Phosphorus, 0.4538),
        (Carbon, Silicon, 0.4360),
        (Aluminium, Nitrogen, 0.4380),
        (Aluminium, Phosphorus, 0.5463),
        (Aluminium, Arsenic, 0.5661),
        (Gallium, Nitrogen, 0.4520),
        (Gallium, Phosphorus, 0.5451),
        (Gallium, Arsenic, 0.5653),
    ];
    for (a, b, expected) in table {
        assert_eq!(square(Material::Checkerboard(a, b)), expected, "{a}/{b}");
        assert_eq!(square(Material::Checkerboard(b, a)), expected, "{b}/{a}");
    }
}

#[test]
fn test_hexagonal_constants_follow_from_the_cubic_one() {
    let carbon = Material::Elemental(Element::Carbon);
    let hexagon = constant(ConstantKind::Hexagon, carbon).unwrap();
    let prism = constant(ConstantKind::Prism, carbon).unwrap();

    assert!((hexagon - 0.3567 / 2f32.sqrt()).abs() < TOLERANCE);
    assert!((prism / hexagon - (8.0f32 / 3.0).sqrt()).abs() < TOLERANCE);
}

#[test]
fn test_unknown_materials() {
    let iron = Material::Elemental(Element::Iron);
    assert_eq!(
        constant(ConstantKind::Square, iron),
        Err(LatticeError::UnrecognizedMaterial(iron))
    );

    let carbon_carbon = Material::Checkerboard(Element::Carbon, Element::Carbon);
    assert_eq!(
        carbon_carbon.validate(BasisKind::Cubic),
        Err(LatticeError::UnrecognizedMaterial(carbon_carbon))
    );
}

#[test]
fn test_gold_has_no_hexagonal_constants() {
    let gold = Material::Elemental(Element::Gold);
    assert_eq!(
        constant(ConstantKind::Prism, gold),
        Err(LatticeError::UnsupportedMaterial {
            basis: BasisKind::Hexagonal,
            material: gold,
        })
    );
    assert!(gold.validate(BasisKind::Cubic).is_ok());
}

#[test]
fn test_display() {
    assert_eq!(Material::Elemental(Element::Silicon).to_string(), "elemental Si");
    assert_eq!(
        Material::Checkerboard(Element::Gallium, Element::Arsenic).to_string(),
        "checkerboard Ga/As"
    );
}
