/// Errors that can occur while parsing a peptide sequence
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SequenceError {
    /// The sequence contained no residues
    #[error("Empty peptide sequence")]
    Empty,

    /// A residue symbol is not in the residue table
    #[error("Unknown residue '{symbol}' at position {position}")]
    UnknownResidue {
        /// The unresolved symbol, e.g. `Mfoo`
        symbol: String,
        /// Zero-based residue position
        position: usize,
    },

    /// A character that can not start a residue
    #[error("Invalid character '{character}' at offset {offset}")]
    InvalidCharacter {
        /// The offending character
        character: char,
        /// Byte offset in the input
        offset: usize,
    },
}
