//! The partitioned build must produce the same index no matter how the
//! peptides are split across partitions and threads.

use proptest::prelude::*;
use xlfrag::prelude::*;

fn build(peptides: &PeptideTable, threads: usize, partitions: usize) -> (FragmentMassIndex, BuildReport) {
    let config = SearchConfig::new(Tolerance::ppm(20.0))
        .with_crosslinker(Crosslinker::new("BS3", 138.06808, ['K']))
        .with_parallelism(threads, Some(partitions));
    IndexBuilder::new(&config)
        .with_status(&NullStatus)
        .build(peptides)
        .unwrap()
}

fn dump(index: &FragmentMassIndex) -> String {
    let mut out = Vec::new();
    index.dump(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn table(sequences: &[String]) -> PeptideTable {
    let residues = ResidueTable::standard();
    PeptideTable::from_peptides(sequences.iter().map(|s| Peptide::parse(s, &residues).unwrap()))
}

#[test]
fn test_more_partitions_than_peptides() {
    let peptides = table(&["PEPTIDEK".to_string(), "ELVISK".to_string()]);
    let (single, _) = build(&peptides, 1, 1);
    let (many, report) = build(&peptides, 4, 64);

    // never more partitions than peptides
    assert_eq!(report.partitions, 2);
    assert_eq!(dump(&single), dump(&many));
}

#[test]
fn test_partitions_are_mass_ordered() {
    let sequences: Vec<String> = ["GGGGK", "WWWWWWK", "AAK", "YYYYYYYYK", "SSSK", "PPPPPK"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let peptides = table(&sequences);
    let (index, _) = build(&peptides, 2, 3);

    // each partition holds a contiguous slice of the mass-sorted peptides,
    // so its heaviest peptide is never heavier than the next partition's lightest
    let mass_spans: Vec<(f64, f64)> = index
        .partitions()
        .iter()
        .map(|store| {
            let masses: Vec<f64> = store
                .iter()
                .map(|(_, id)| peptides.get(id).unwrap().mass())
                .collect();
            let min = masses.iter().copied().fold(f64::INFINITY, f64::min);
            let max = masses.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (min, max)
        })
        .collect();
    assert_eq!(mass_spans.len(), 3);
    assert!(mass_spans.windows(2).all(|w| w[0].1 <= w[1].0));
}

mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_partitioning_is_invisible(
            sequences in prop::collection::vec("[ACDEFGHIKLMNPQRSTVWY]{2,15}", 1..40),
            threads in 1usize..4,
            partitions in 1usize..16,
        ) {
            let peptides = table(&sequences);
            let (single, single_report) = build(&peptides, 1, 1);
            let (split, split_report) = build(&peptides, threads, partitions);

            prop_assert_eq!(single.fragment_count(), split.fragment_count());
            prop_assert_eq!(single_report.peptides_indexed, split_report.peptides_indexed);
            prop_assert_eq!(dump(&single), dump(&split));
        }

        #[test]
        fn test_queries_agree_across_partitionings(
            sequences in prop::collection::vec("[GASPVTKLEY]{3,10}", 1..30),
            partitions in 2usize..12,
            probe in 100.0f64..1500.0,
        ) {
            let peptides = table(&sequences);
            let (single, _) = build(&peptides, 1, 1);
            let (split, _) = build(&peptides, 3, partitions);

            let mut a = single.query_range(probe, probe);
            let mut b = split.query_range(probe, probe);
            a.sort();
            b.sort();
            prop_assert_eq!(a, b);
            prop_assert_eq!(single.count_in_range(probe, probe), split.count_in_range(probe, probe));
        }
    }
}
