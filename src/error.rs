//! Error types for the dream insight system
//!
//! The analysis pipeline itself is infallible. Errors only exist at the
//! edges: building the lexicon store from pack files, and the journal
//! persistence collaborator.

use thiserror::Error;

/// Errors raised while loading and validating lexicon packs.
///
/// These are start-up errors. Once a `LexiconStore` exists, no analysis
/// call can fail.
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Failed to read lexicon pack from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse lexicon pack '{pack}': {source}")]
    Parse {
        pack: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("No lexicon packs found in {0}")]
    NoPacks(String),

    #[error("Duplicate symbol id '{id}' in pack '{pack}'")]
    DuplicateSymbol { id: String, pack: String },

    #[error("Alias set in pack '{pack}' refers to unknown symbol '{id}'")]
    UnknownAliasTarget { id: String, pack: String },

    #[error("Duplicate composite rule '{id}' in pack '{pack}'")]
    DuplicateRule { id: String, pack: String },

    #[error("Empty surface form in {context} (pack '{pack}')")]
    EmptyForm { context: String, pack: String },

    #[error("Composite rule '{id}' in pack '{pack}' has an empty keyword group")]
    EmptyGroup { id: String, pack: String },

    #[error("Invalid script range '{range}' in pack '{pack}': expected HEX-HEX")]
    InvalidScriptRange { range: String, pack: String },

    #[error("Primary pack '{pack}' is missing the '{section}' section")]
    MissingSection { pack: String, section: &'static str },

    #[error("Pack '{pack}' must define exactly {expected} {field}, found {found}")]
    WrongCount {
        pack: String,
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Errors from the journal store.
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Journal IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Journal serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Journal quota exceeded: {limit} entries")]
    QuotaExceeded { limit: usize },

    #[error("Journal entry {0} not found")]
    NotFound(uuid::Uuid),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LexiconError::DuplicateSymbol {
            id: "teeth".to_string(),
            pack: "ko_core".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate symbol id 'teeth' in pack 'ko_core'"
        );

        let err = JournalError::QuotaExceeded { limit: 3 };
        assert_eq!(err.to_string(), "Journal quota exceeded: 3 entries");
    }
}
