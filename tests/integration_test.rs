//! Integration tests for xlfrag
//!
//! These tests run the full pipeline from configuration and peptides to
//! index queries, dumps and ranked candidates.

use std::fs;
use std::io::Write;

use tempfile::tempdir;
use xlfrag::prelude::*;

fn reference_peptides() -> PeptideTable {
    let residues = ResidueTable::standard();
    PeptideTable::from_peptides(vec![
        Peptide::parse("KKKKKKKK", &residues).unwrap(),
        Peptide::parse("KKKYYKKK", &residues).unwrap(),
    ])
}

fn reference_config() -> SearchConfig {
    SearchConfig::new(Tolerance::ppm(20.0)).with_precursor_tolerance(Tolerance::ppm(10.0))
}

/// The two-peptide reference index
#[test]
fn test_reference_lookup() {
    let peptides = reference_peptides();
    let config = reference_config();
    let (index, _) = IndexBuilder::new(&config)
        .with_status(&NullStatus)
        .build(&peptides)
        .unwrap();

    // y3 (KKK) is shared by both peptides
    let mut ids = index.peptide_ids_for_mass(403.30327443699997);
    ids.sort();
    assert_eq!(ids, vec![PeptideId(0), PeptideId(1)]);

    // y4 (YKKK) only exists in the second peptide; KKKK is 35 Da lighter
    let ids = index.peptide_ids_for_mass(566.366603012);
    assert_eq!(ids, vec![PeptideId(1)]);

    // 25 ppm off is outside the 20 ppm window
    assert!(index.peptide_ids_for_mass(566.366603012 * (1.0 + 25e-6)).is_empty());
}

#[test]
fn test_precursor_mass_matches_residue_sum() {
    let peptides = reference_peptides();
    let k = ResidueTable::standard().get("K").unwrap().mass;
    let p = peptides.get(PeptideId(0)).unwrap();
    assert!((p.mass() - (8.0 * k + WATER_MASS)).abs() < 1e-9);
}

#[test]
fn test_config_file_to_dump() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("search.toml");
    let mut file = fs::File::create(&config_path).unwrap();
    writeln!(
        file,
        r#"
fragment_tolerance = "20ppm"
precursor_tolerance = "10ppm"
max_candidates_per_peak = -1
ion_types = ["b", "y"]
threads = 2
partitions = 3

[[modifications]]
name = "ox"
residue = "M"
mass_delta = 15.99491

[[crosslinkers]]
name = "BS3"
mass = 138.06808
linked_residues = ["K"]
"#
    )
    .unwrap();
    drop(file);

    let config = SearchConfig::from_file(&config_path).unwrap();
    assert_eq!(config.max_candidates_per_peak, None);
    assert_eq!(config.crosslinkers.len(), 1);

    let residues = config.residue_table().unwrap();
    let peptides = PeptideTable::from_peptides(
        ["PEPMK", "PEPMoxK", "ELVISR", "GGGGK"]
            .iter()
            .map(|s| Peptide::parse(s, &residues).unwrap()),
    );
    assert!(peptides.get(PeptideId(1)).unwrap().is_modified());

    let (index, report) = IndexBuilder::new(&config)
        .with_status(&NullStatus)
        .build(&peptides)
        .unwrap();
    assert_eq!(report.peptides_indexed, 4);
    assert_eq!(report.fragments_inserted, index.fragment_count());

    let dump_path = dir.path().join("index.tsv");
    index.dump_to_path(&dump_path).unwrap();
    let content = fs::read_to_string(&dump_path).unwrap();

    let rows: Vec<(f64, u32)> = content
        .lines()
        .map(|line| {
            let (mass, id) = line.split_once('\t').unwrap();
            (mass.parse().unwrap(), id.parse().unwrap())
        })
        .collect();
    assert_eq!(rows.len(), index.fragment_count());
    assert!(rows.windows(2).all(|w| w[0].0 <= w[1].0));
    assert!(rows.iter().all(|&(_, id)| (id as usize) < peptides.len()));
}

#[test]
fn test_crosslinked_pair_from_spectrum() {
    let residues = ResidueTable::standard();
    let peptides = PeptideTable::from_peptides(
        ["PEPKR", "GKGK", "ELVISR", "DDDDDDDDR"]
            .iter()
            .map(|s| Peptide::parse(s, &residues).unwrap()),
    );
    let config = reference_config().with_crosslinker(Crosslinker::new("BS3", 138.06808, ['K']));
    let (index, _) = IndexBuilder::new(&config)
        .with_status(&NullStatus)
        .build(&peptides)
        .unwrap();

    let alpha = peptides.get(PeptideId(0)).unwrap();
    let beta = peptides.get(PeptideId(1)).unwrap();

    // peaks: the plain b and y ions of the alpha peptide
    let fragments = PrimaryFragments::new([IonType::B, IonType::Y], Vec::new())
        .fragments(alpha)
        .unwrap();
    let spectrum = fragments
        .iter()
        .fold(Spectrum::builder("xl"), |b, f| b.add_peak(f.mass, 100.0))
        .precursor_mass(alpha.mass() + beta.mass() + 138.06808)
        .build();

    let ranker = CandidateRanker::new(&index, &peptides, &config);
    let scored = ranker.alpha_candidates_for_precursor(&spectrum);
    assert_eq!(scored[0].peptide.id(), PeptideId(0));

    let ranked = ranker.rank_alpha_candidates(&scored, Some(5));
    assert_eq!(ranked[0].rank, 1);

    let pairs = ranker.candidate_pairs(&ranked, &spectrum);
    assert!(!pairs.is_empty());
    assert_eq!(pairs[0].alpha.id(), PeptideId(0));
    assert_eq!(pairs[0].beta.id(), PeptideId(1));
    assert_eq!(pairs[0].crosslinker.name(), "BS3");
    assert!(ranker.linear_candidates(&spectrum).is_empty());
}

#[test]
fn test_build_progress_over_channel() {
    let peptides = reference_peptides();
    let mut config = reference_config();
    config.progress_interval = 1;

    let (sender, receiver) = crossbeam_channel::unbounded();
    let status = ChannelStatus::new(sender);
    IndexBuilder::new(&config)
        .with_status(&status)
        .build(&peptides)
        .unwrap();
    drop(status);

    let messages: Vec<String> = receiver.iter().collect();
    assert!(messages.iter().any(|m| m == "Progress: 2/2 peptides (100.0%)"));
    assert!(messages.last().unwrap().starts_with("Fragment index built"));
}

#[test]
fn test_pre_raised_abort_flag_cancels() {
    let peptides = reference_peptides();
    let config = reference_config();
    let abort = AbortFlag::new();
    abort.abort();

    let result = IndexBuilder::new(&config)
        .with_status(&NullStatus)
        .with_abort_flag(abort.clone())
        .build(&peptides);
    assert!(matches!(result, Err(BuildError::Cancelled { .. })));

    abort.reset();
    assert!(IndexBuilder::new(&config)
        .with_status(&NullStatus)
        .with_abort_flag(abort)
        .build(&peptides)
        .is_ok());
}
