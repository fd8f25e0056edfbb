use super::*;
use crate::chemistry::ResidueTable;

const K: f64 = 128.094963;
const Y: f64 = 163.063329;

fn peptide(seq: &str) -> Peptide {
    Peptide::parse(seq, &ResidueTable::standard()).unwrap()
}

#[test]
fn test_b_y_precursor_counts() {
    let p = peptide("KKKYYKKK");
    let fragments = PrimaryFragments::default().fragments(&p).unwrap();
    let count = |kind| fragments.iter().filter(|f| f.kind == kind).count();
    assert_eq!(count(FragmentKind::B), 7);
    assert_eq!(count(FragmentKind::Y), 7);
    assert_eq!(count(FragmentKind::Precursor), 1);
    assert_eq!(count(FragmentKind::CrosslinkerModified), 0);
}

#[test]
fn test_fragment_masses() {
    let p = peptide("KKKYYKKK");
    let fragments = PrimaryFragments::default().fragments(&p).unwrap();

    let b1 = fragments
        .iter()
        .find(|f| f.kind == FragmentKind::B && f.length == 1)
        .unwrap();
    assert!((b1.mass - (K + PROTON_MASS)).abs() < 1e-9);

    let b4 = fragments
        .iter()
        .find(|f| f.kind == FragmentKind::B && f.length == 4)
        .unwrap();
    assert!((b4.mass - (3.0 * K + Y + PROTON_MASS)).abs() < 1e-9);

    let y2 = fragments
        .iter()
        .find(|f| f.kind == FragmentKind::Y && f.length == 2)
        .unwrap();
    assert_eq!(y2.start, 6);
    assert!((y2.mass - (2.0 * K + WATER_MASS + PROTON_MASS)).abs() < 1e-9);

    let precursor = fragments
        .iter()
        .find(|f| f.kind == FragmentKind::Precursor)
        .unwrap();
    assert!((precursor.mass - (p.mass() + PROTON_MASS)).abs() < 1e-9);
}

#[test]
fn test_ion_type_selection() {
    let p = peptide("PEPTIDE");
    let producer = PrimaryFragments::new([IonType::Y, IonType::Y], Vec::new());
    assert_eq!(producer.ion_types(), &[IonType::Y]);
    let fragments = producer.fragments(&p).unwrap();
    assert_eq!(fragments.len(), 6);
    assert!(fragments.iter().all(|f| f.kind == FragmentKind::Y));
}

#[test]
fn test_crosslinker_modified_fragments() {
    let p = peptide("PEKR");
    let xl = Crosslinker::new("BS3", 138.06808, ['K']);
    let producer = PrimaryFragments::new(IonType::ALL, vec![xl]);
    let fragments = producer.fragments(&p).unwrap();

    let modified: Vec<_> = fragments
        .iter()
        .filter(|f| f.kind == FragmentKind::CrosslinkerModified)
        .collect();
    // b3, y2, y3 and the precursor contain the lysine; b1, b2 and y1 do not
    assert_eq!(modified.len(), 4);
    for m in modified {
        let primary = fragments
            .iter()
            .find(|f| f.kind != FragmentKind::CrosslinkerModified && f.start == m.start && f.length == m.length)
            .unwrap();
        assert!((m.mass - primary.mass - 138.06808).abs() < 1e-9);
    }
}

#[test]
fn test_single_residue_peptide() {
    let p = peptide("K");
    let fragments = PrimaryFragments::default().fragments(&p).unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].kind, FragmentKind::Precursor);
}

#[test]
fn test_non_finite_mass_is_an_error() {
    let mut table = ResidueTable::standard();
    table.insert('X', f64::NAN);
    let p = Peptide::parse("KXK", &table).unwrap();
    let err = PrimaryFragments::default().fragments(&p).unwrap_err();
    assert!(matches!(err, FragmentError::NonFiniteMass { .. }));
}

#[test]
fn test_ion_type_from_str() {
    assert_eq!("B".parse::<IonType>(), Ok(IonType::B));
    assert_eq!(" precursor ".parse::<IonType>(), Ok(IonType::Precursor));
    assert!("z".parse::<IonType>().is_err());
}
