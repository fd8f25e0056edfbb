//! Peptide table input.
//!
//! The file needs a `sequence` column; an optional `decoy` column marks
//! decoy peptides. Files ending in `.tsv` or `.txt` are read tab-separated,
//! everything else as CSV.

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::path::Path;

use xlfrag::chemistry::ResidueTable;
use xlfrag::peptide::{Peptide, PeptideTable};

#[derive(Debug, Deserialize)]
struct PeptideRecord {
    sequence: String,
    #[serde(default)]
    decoy: bool,
}

fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("txt") => b'\t',
        _ => b',',
    }
}

/// Parse every row of `path` against `residues`.
///
/// A row that does not parse fails the whole load with its line number.
pub fn load(path: &Path, residues: &ResidueTable) -> Result<PeptideTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open peptide table: {}", path.display()))?;

    let mut peptides = Vec::new();
    for record in reader.deserialize::<PeptideRecord>() {
        let record = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        let peptide = Peptide::parse(&record.sequence, residues)
            .with_context(|| format!("Invalid peptide '{}'", record.sequence))?
            .with_decoy(record.decoy);
        peptides.push(peptide);
    }

    info!("Loaded {} peptides from {}", peptides.len(), path.display());
    Ok(PeptideTable::from_peptides(peptides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = write_table(".csv", "sequence,decoy\nPEPTIDEK,false\nKEDITPEP,true\n");
        let table = load(file.path(), &ResidueTable::standard()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.iter().next().unwrap().is_decoy());
        assert!(table.iter().nth(1).unwrap().is_decoy());
    }

    #[test]
    fn test_load_tsv_without_decoy_column() {
        let file = write_table(".tsv", "sequence\nPEPTIDEK\nELVISK\n");
        let table = load(file.path(), &ResidueTable::standard()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|p| !p.is_decoy()));
    }

    #[test]
    fn test_invalid_sequence_fails() {
        let file = write_table(".csv", "sequence\nPEPTIDEK\nPEP*K\n");
        let err = load(file.path(), &ResidueTable::standard()).unwrap_err();
        assert!(format!("{:#}", err).contains("PEP*K"));
    }

    #[test]
    fn test_missing_file() {
        assert!(load(Path::new("/nonexistent/peptides.csv"), &ResidueTable::standard()).is_err());
    }
}
