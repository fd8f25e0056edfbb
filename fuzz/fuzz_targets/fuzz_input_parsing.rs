#![no_main]

use libfuzzer_sys::fuzz_target;
use xlfrag::prelude::*;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Tolerance strings must parse or fail cleanly, and parsed values must
    // produce well-formed windows
    if let Ok(tolerance) = text.parse::<Tolerance>() {
        let range = tolerance.range(500.0);
        assert!(range.min <= range.max);
    }

    // Same for peptide sequences and their fragments
    let residues = ResidueTable::standard();
    if let Ok(peptide) = Peptide::parse(text, &residues) {
        let producer = PrimaryFragments::default();
        if let Ok(fragments) = producer.fragments(&peptide) {
            assert!(fragments.iter().all(|f| f.mass.is_finite()));
        }
    }

    // Config documents must never panic
    let _ = SearchConfig::from_toml_str(text);
});
