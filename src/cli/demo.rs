use anyhow::{Context, Result};
use log::info;

use xlfrag::chemistry::{ResidueTable, PROTON_MASS, WATER_MASS};
use xlfrag::config::SearchConfig;
use xlfrag::crosslinker::Crosslinker;
use xlfrag::index::IndexBuilder;
use xlfrag::peptide::{Peptide, PeptideTable};
use xlfrag::scoring::CandidateRanker;
use xlfrag::spectrum::Spectrum;
use xlfrag::status::LogStatus;
use xlfrag::tolerance::Tolerance;

const DEMO_PEPTIDES: [&str; 2] = ["KKKKKKKK", "KKKYYKKK"];

/// Index two peptides, probe a few fragment masses and rank a spectrum
pub fn run() -> Result<()> {
    info!("xlfrag demo");
    info!("===========");

    let residues = ResidueTable::standard();
    let peptides = PeptideTable::from_peptides(
        DEMO_PEPTIDES
            .iter()
            .map(|s| Peptide::parse(s, &residues))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to parse demo peptides")?,
    );

    let config = SearchConfig::new(Tolerance::ppm(20.0))
        .with_precursor_tolerance(Tolerance::ppm(10.0))
        .with_crosslinker(Crosslinker::new("BS3", 138.06808, ['K']))
        .with_parallelism(1, None);

    let (index, report) = IndexBuilder::new(&config)
        .with_status(&LogStatus)
        .build(&peptides)
        .context("Failed to build demo index")?;
    println!("{}", report);
    println!("{}", index.stats());
    println!();

    let k = residue_mass(&residues, "K")?;
    let y = residue_mass(&residues, "Y")?;
    let probes = [
        ("b1 of both peptides", k + PROTON_MASS),
        ("b4 of KKKYYKKK", 3.0 * k + y + PROTON_MASS),
        ("b4 of KKKKKKKK, shifted", 4.0 * k + PROTON_MASS + 0.5),
    ];
    for (label, mass) in probes {
        let hits: Vec<String> = index
            .peptides_in_range(mass, mass, f64::MAX, &peptides)
            .iter()
            .map(|p| p.to_string())
            .collect();
        println!("{:>28} {:>12.5} -> [{}]", label, mass, hits.join(", "));
    }
    println!();

    let spectrum = Spectrum::builder("demo")
        .precursor_mass(peptides.iter().map(|p| p.mass()).sum::<f64>() + 138.06808)
        .add_peak(3.0 * k + y + PROTON_MASS, 100.0)
        .add_peak(2.0 * k + WATER_MASS + PROTON_MASS, 50.0)
        .build();
    let ranker = CandidateRanker::new(&index, &peptides, &config);
    let ranked = ranker.rank_alpha_candidates(&ranker.alpha_candidates_for_precursor(&spectrum), None);
    for candidate in &ranked {
        println!("rank {} {:>10} score {:.3e}", candidate.rank, candidate.peptide.to_string(), candidate.score);
    }
    for pair in ranker.candidate_pairs(&ranked, &spectrum) {
        println!("pair {} x {} via {}", pair.alpha, pair.beta, pair.crosslinker);
    }
    Ok(())
}

fn residue_mass(residues: &ResidueTable, symbol: &str) -> Result<f64> {
    residues
        .get(symbol)
        .map(|r| r.mass)
        .with_context(|| format!("Residue {} missing from the standard table", symbol))
}
