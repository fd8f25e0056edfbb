//! Candidate search over a batch of spectra.
//!
//! Spectra are read from a JSON array:
//!
//! ```json
//! [
//!   {
//!     "id": "scan=1",
//!     "precursor_mz": 652.3412,
//!     "precursor_charge": 3,
//!     "peaks": [{"mz": 175.119, "intensity": 1200.0}]
//!   }
//! ]
//! ```
//!
//! Results are written to stdout as TSV, one row per linear candidate or
//! crosslinked pair.

use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use xlfrag::config::SearchConfig;
use xlfrag::index::FragmentMassIndex;
use xlfrag::peptide::PeptideTable;
use xlfrag::scoring::CandidateRanker;
use xlfrag::spectrum::{Peak, Spectrum};

use super::{build, config, peptides, IndexArgs};

#[derive(Debug, Deserialize)]
struct SpectrumRecord {
    id: String,
    #[serde(default)]
    precursor_mz: f64,
    #[serde(default = "default_charge")]
    precursor_charge: u8,
    /// Overrides the mass derived from m/z and charge
    precursor_mass: Option<f64>,
    #[serde(default)]
    peaks: Vec<Peak>,
}

fn default_charge() -> u8 {
    1
}

impl From<SpectrumRecord> for Spectrum {
    fn from(record: SpectrumRecord) -> Self {
        let builder = Spectrum::builder(record.id)
            .precursor(record.precursor_mz, record.precursor_charge)
            .peaks(record.peaks);
        match record.precursor_mass {
            Some(mass) => builder.precursor_mass(mass).build(),
            None => builder.build(),
        }
    }
}

/// One output line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRow {
    /// Id of the spectrum the row belongs to
    pub spectrum: String,
    /// Rank of the alpha candidate
    pub rank: usize,
    /// Occurrence score of the alpha candidate (lower is better)
    pub score: f64,
    /// Alpha peptide sequence
    pub alpha: String,
    /// Beta peptide sequence; empty for linear candidates
    pub beta: String,
    /// Crosslinker name; empty for linear candidates
    pub crosslinker: String,
    /// Whether either peptide is a decoy
    pub decoy: bool,
}

/// Rank candidates for every spectrum and print them as TSV
pub fn run(args: IndexArgs, spectra: PathBuf, top: usize) -> Result<()> {
    let config = config::load(args.config.as_deref(), &args.overrides())?;
    let residues = config.residue_table().context("Invalid modifications")?;
    let peptides = peptides::load(&args.peptides, &residues)?;
    let spectra = load_spectra(&spectra)?;

    let (index, _) = build::build_index(&config, &peptides)?;

    let rows = search(&index, &peptides, &config, &spectra, top);
    info!("{} candidate rows for {} spectra", rows.len(), spectra.len());

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(io::stdout().lock());
    for row in &rows {
        writer.serialize(row).context("Failed to write result row")?;
    }
    writer.flush().context("Failed to flush results")?;
    Ok(())
}

pub fn load_spectra(path: &Path) -> Result<Vec<Spectrum>> {
    let file = File::open(path).with_context(|| format!("Failed to open spectra: {}", path.display()))?;
    let records: Vec<SpectrumRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse spectra JSON: {}", path.display()))?;
    info!("Loaded {} spectra from {}", records.len(), path.display());
    Ok(records.into_iter().map(Spectrum::from).collect())
}

/// Rows for all spectra, in input order; spectra are ranked in parallel.
pub fn search(
    index: &FragmentMassIndex,
    peptides: &PeptideTable,
    config: &SearchConfig,
    spectra: &[Spectrum],
    top: usize,
) -> Vec<CandidateRow> {
    let ranker = CandidateRanker::new(index, peptides, config);
    spectra
        .par_iter()
        .map(|spectrum| rows_for_spectrum(&ranker, spectrum, top))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

fn rows_for_spectrum(ranker: &CandidateRanker<'_>, spectrum: &Spectrum, top: usize) -> Vec<CandidateRow> {
    let scored = ranker.alpha_candidates_for_precursor(spectrum);
    let ranked = ranker.rank_alpha_candidates(&scored, Some(top));

    let mut rows: Vec<CandidateRow> = ranked
        .iter()
        .filter(|c| ranker.is_linear(c.peptide, spectrum))
        .map(|c| CandidateRow {
            spectrum: spectrum.id().to_string(),
            rank: c.rank,
            score: c.score,
            alpha: c.peptide.to_string(),
            beta: String::new(),
            crosslinker: String::new(),
            decoy: c.peptide.is_decoy(),
        })
        .collect();

    for pair in ranker.candidate_pairs(&ranked, spectrum) {
        rows.push(CandidateRow {
            spectrum: spectrum.id().to_string(),
            rank: pair.alpha_rank,
            score: pair.alpha_score,
            alpha: pair.alpha.to_string(),
            beta: pair.beta.to_string(),
            crosslinker: pair.crosslinker.name().to_string(),
            decoy: pair.alpha.is_decoy() || pair.beta.is_decoy(),
        });
    }
    rows.sort_by_key(|r| r.rank);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_spectrum_record_defaults() {
        let json = r#"[{"id": "a", "precursor_mz": 501.0, "precursor_charge": 2, "peaks": [{"mz": 300.0, "intensity": 5.0}]},
                       {"id": "b", "precursor_mass": 1000.0}]"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let spectra = load_spectra(file.path()).unwrap();
        assert_eq!(spectra.len(), 2);
        assert_eq!(spectra[0].precursor_charge(), 2);
        assert_eq!(spectra[0].len(), 1);
        assert_eq!(spectra[1].precursor_mass(), 1000.0);
        assert!(spectra[1].is_empty());
    }

    #[test]
    fn test_linear_row_leaves_pair_columns_empty() {
        use xlfrag::prelude::*;

        let residues = ResidueTable::standard();
        let peptides = PeptideTable::from_peptides(vec![
            Peptide::parse("GGK", &residues).unwrap(),
            Peptide::parse("GGR", &residues).unwrap(),
        ]);
        let config = SearchConfig::new(Tolerance::ppm(20.0));
        let index = FragmentMassIndex::from_pairs(
            [(300.0, PeptideId(0)), (400.0, PeptideId(1))],
            config.fragment_tolerance,
            100_000.0,
        );
        let linear = peptides.get(PeptideId(0)).unwrap().mass();
        let spectrum = Spectrum::builder("scan=1")
            .precursor_mass(linear)
            .add_peak(300.0, 1.0)
            .build();

        let rows = search(&index, &peptides, &config, &[spectrum], 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].spectrum, "scan=1");
        assert_eq!(rows[0].alpha, "GGK");
        assert!(rows[0].beta.is_empty());
        assert!(rows[0].crosslinker.is_empty());
        assert!(!rows[0].decoy);
    }

    #[test]
    fn test_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert!(load_spectra(file.path()).is_err());
    }
}
