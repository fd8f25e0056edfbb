use super::*;
use crate::chemistry::{ResidueTable, WATER_MASS};
use crate::tolerance::{MassRange, Tolerance};

const K: f64 = 128.094963;
const Y: f64 = 163.063329;

fn table() -> ResidueTable {
    let mut table = ResidueTable::standard();
    table.add_modification("ox", 'M', 15.99491);
    table
}

#[test]
fn test_parse_and_mass() {
    let p = Peptide::parse("KKKKKKKK", &table()).unwrap();
    assert_eq!(p.len(), 8);
    assert!((p.mass() - (8.0 * K + WATER_MASS)).abs() < 1e-9);
    assert_eq!(p.to_string(), "KKKKKKKK");
    assert!(!p.is_modified());
}

#[test]
fn test_parse_modified() {
    let p = Peptide::parse("PEMoxK", &table()).unwrap();
    assert_eq!(p.len(), 4);
    assert_eq!(p.to_string(), "PEMoxK");
    assert_eq!(p.base_sequence(), "PEMK");
    assert!(p.is_modified());
}

#[test]
fn test_parse_errors() {
    let t = table();
    assert_eq!(Peptide::parse("", &t), Err(SequenceError::Empty));
    assert_eq!(
        Peptide::parse("PEPJ", &t),
        Err(SequenceError::UnknownResidue {
            symbol: "J".to_string(),
            position: 3
        })
    );
    assert_eq!(
        Peptide::parse("KMfooK", &t),
        Err(SequenceError::UnknownResidue {
            symbol: "Mfoo".to_string(),
            position: 1
        })
    );
    assert!(matches!(
        Peptide::parse("oxK", &t),
        Err(SequenceError::InvalidCharacter { character: 'o', offset: 0 })
    ));
}

#[test]
fn test_table_assigns_dense_ids() {
    let t = table();
    let mut peptides = PeptideTable::new();
    let a = peptides.push(Peptide::parse("KKKYYKKK", &t).unwrap());
    let b = peptides.push(Peptide::parse("KKKKKKKK", &t).unwrap());
    assert_eq!(a, PeptideId(0));
    assert_eq!(b, PeptideId(1));
    assert_eq!(peptides.get(b).map(|p| p.id()), Some(b));
    assert!(peptides.get(PeptideId(2)).is_none());

    // the lighter peptide sorts first
    assert_eq!(peptides.ids_by_mass(), &[b, a]);
    assert!((peptides.max_mass().unwrap() - (6.0 * K + 2.0 * Y + WATER_MASS)).abs() < 1e-9);
}

#[test]
fn test_mass_range_lookup() {
    let t = table();
    let peptides = PeptideTable::from_peptides(
        ["GG", "KK", "YY", "KKKK"]
            .iter()
            .map(|s| Peptide::parse(s, &t).unwrap()),
    );

    let kk = 2.0 * K + WATER_MASS;
    let ids = peptides.ids_in_mass_range(MassRange::new(kk, kk));
    assert_eq!(ids, &[PeptideId(1)]);

    let ids = peptides.ids_in_mass_range(MassRange::new(0.0, 1000.0));
    assert_eq!(ids.len(), 4);

    let found: Vec<_> = peptides
        .peptides_for_mass(kk + 0.001, kk, &Tolerance::ppm(10.0))
        .map(|p| p.to_string())
        .collect();
    assert_eq!(found, vec!["KK".to_string()]);

    assert!(peptides.ids_in_mass_range(MassRange::new(10.0, 5.0)).is_empty());
}
