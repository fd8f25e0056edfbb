use super::*;

#[test]
fn test_parse_ppm_and_da() {
    assert_eq!("20ppm".parse::<Tolerance>().unwrap(), Tolerance::Ppm(20.0));
    assert_eq!("20 PPM".parse::<Tolerance>().unwrap(), Tolerance::Ppm(20.0));
    assert_eq!("0.02da".parse::<Tolerance>().unwrap(), Tolerance::Da(0.02));
    assert_eq!(" 0.02 Da ".parse::<Tolerance>().unwrap(), Tolerance::Da(0.02));
    assert_eq!("0.5 m/z".parse::<Tolerance>().unwrap(), Tolerance::Da(0.5));
}

#[test]
fn test_parse_without_unit_defaults_to_da() {
    assert_eq!("0.1".parse::<Tolerance>().unwrap(), Tolerance::Da(0.1));
}

#[test]
fn test_parse_malformed() {
    assert_eq!("".parse::<Tolerance>(), Err(ToleranceError::Empty));
    assert!(matches!(
        "ppm".parse::<Tolerance>(),
        Err(ToleranceError::InvalidValue(_))
    ));
    assert!(matches!(
        "1.2.3ppm".parse::<Tolerance>(),
        Err(ToleranceError::InvalidValue(_))
    ));
    assert!(matches!(
        "20 furlongs".parse::<Tolerance>(),
        Err(ToleranceError::UnknownUnit(_))
    ));
    assert!(matches!(
        "-5ppm".parse::<Tolerance>(),
        Err(ToleranceError::OutOfRange(_))
    ));
}

#[test]
fn test_ppm_range() {
    let t = Tolerance::ppm(10.0);
    let r = t.range(1000.0);
    assert!((r.min - 999.99).abs() < 1e-9);
    assert!((r.max - 1000.01).abs() < 1e-9);
}

#[test]
fn test_da_range() {
    let t = Tolerance::da(0.5);
    let r = t.range(100.0);
    assert_eq!(r.min, 99.5);
    assert_eq!(r.max, 100.5);
}

#[test]
fn test_range_with_reference_uses_reference_for_width() {
    let t = Tolerance::ppm(10.0);
    let r = t.range_with_reference(500.0, 1000.0);
    assert!((r.width() - 0.02).abs() < 1e-9);
    assert!((r.min - 499.99).abs() < 1e-9);

    // absolute tolerances ignore the reference
    let t = Tolerance::da(0.1);
    assert_eq!(t.range_with_reference(500.0, 1000.0), t.range(500.0));
}

#[test]
fn test_zero_mass_gives_finite_window() {
    let r = Tolerance::ppm(20.0).range(0.0);
    assert!(r.min.is_finite() && r.max.is_finite());
    assert_eq!(r.width(), 0.0);
    assert!(!r.is_empty());
}

#[test]
fn test_range_bounds_inclusive() {
    let r = MassRange::new(10.0, 20.0);
    assert!(r.contains(10.0));
    assert!(r.contains(20.0));
    assert!(!r.contains(20.000001));
    assert!(MassRange::new(f64::NAN, 1.0).is_empty());
}

#[test]
fn test_compare() {
    let t = Tolerance::da(0.1);
    assert_eq!(t.compare(100.0, 100.05), Ordering::Equal);
    assert_eq!(t.compare(100.0, 100.2), Ordering::Less);
    assert_eq!(t.compare(100.2, 100.0), Ordering::Greater);

    let t = Tolerance::ppm(10.0);
    assert_eq!(t.compare(1000.0, 1000.005), Ordering::Equal);
    assert_eq!(t.compare(1000.0, 1000.02), Ordering::Less);
    assert_eq!(t.compare(1000.02, 1000.0), Ordering::Greater);
}

#[test]
fn test_compare_is_antisymmetric() {
    let t = Tolerance::ppm(5.0);
    for (a, b) in [(500.0, 500.01), (800.0, 799.0), (123.4, 123.4)] {
        assert_eq!(t.compare(a, b), t.compare(b, a).reverse());
    }
}

#[test]
fn test_min_diff() {
    let t = Tolerance::da(0.1);
    assert!((t.min_diff(100.0, 100.5) - 0.4).abs() < 1e-9);
    assert_eq!(t.min_diff(100.0, 100.05), 0.0);
}

#[test]
fn test_error_and_display() {
    let t = Tolerance::ppm(10.0);
    assert!((t.error(999.999, 1000.0) - 1.0).abs() < 1e-6);
    assert_eq!(t.to_string(), "10 ppm");
    assert_eq!(Tolerance::da(0.02).to_string(), "0.02 Da");
    assert_eq!(Tolerance::da(0.02).format_error(100.01, 100.0), "0.010Da");
}
