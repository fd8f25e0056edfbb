use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};
use std::thread;

use xlfrag::config::SearchConfig;
use xlfrag::index::{BuildReport, FragmentMassIndex, IndexBuilder};
use xlfrag::peptide::PeptideTable;
use xlfrag::status::ChannelStatus;

use super::{config, peptides, IndexArgs};

/// Build the index and print statistics
pub fn run(args: IndexArgs, dump: Option<PathBuf>) -> Result<()> {
    let config = config::load(args.config.as_deref(), &args.overrides())?;
    let residues = config.residue_table().context("Invalid modifications")?;
    let peptides = peptides::load(&args.peptides, &residues)?;

    let (index, report) = build_index(&config, &peptides)?;

    print_summary(&report, &index);

    if let Some(path) = dump {
        write_dump(&index, &path)?;
    }
    Ok(())
}

/// Build with status messages forwarded to stderr by a consumer thread.
pub fn build_index(config: &SearchConfig, peptides: &PeptideTable) -> Result<(FragmentMassIndex, BuildReport)> {
    let (sender, receiver) = crossbeam_channel::unbounded();
    let status = ChannelStatus::new(sender);
    let printer = thread::spawn(move || {
        for message in receiver {
            eprintln!("{}", message);
        }
    });

    let result = IndexBuilder::new(config).with_status(&status).build(peptides);

    // closing the channel ends the printer loop
    drop(status);
    let _ = printer.join();

    result.context("Failed to build fragment index")
}

fn print_summary(report: &BuildReport, index: &FragmentMassIndex) {
    #[cfg(feature = "colorized_output")]
    {
        use console::style;
        println!("{}", style("Fragment Index").bold().cyan());
        println!("{}", style("==============").cyan());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("Fragment Index");
        println!("==============");
    }

    println!("{}", report);
    println!("{}", index.stats());
}

fn write_dump(index: &FragmentMassIndex, path: &Path) -> Result<()> {
    index
        .dump_to_path(path)
        .with_context(|| format!("Failed to write index dump: {}", path.display()))?;
    info!("Wrote {} fragment pairs to {}", index.fragment_count(), path.display());
    Ok(())
}
