//! Error types.
//!
//! Errors fall into four groups:
//!
//! - **Load failures** (`Io`, `Malformed`, `MissingTable`): the data source could
//!   not provide a table. The affected data stays "not loaded" and a later load
//!   may be retried.
//! - **Lookups** (`NotFound`): a value is absent from a conversion table, a tone
//!   table or the catalog. Expected for malformed input; callers pick a fallback.
//! - **Construction defects** (`DuplicateValue`): a table column that must be
//!   unique is not.
//! - **Misuse** (`Misuse`, `NotLoaded`): the caller asked for something that is
//!   never valid, or queried before loading.
//! - **Output** (`Serialize`): an export could not be written.
//!
//! "No rule applies" is not an error anywhere in this crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Reading a table from the data source failed.
    #[error("failed to read table `{table}`: {source}")]
    Io {
        table: String,
        #[source]
        source: std::io::Error,
    },

    /// A table was read but could not be decoded.
    #[error("malformed table `{table}`: {source}")]
    Malformed {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    /// The data source has no table with this name.
    #[error("table `{table}` is missing from the data source")]
    MissingTable { table: String },

    /// A lookup by value failed.
    #[error("{what} not found: `{value}`")]
    NotFound { what: &'static str, value: String },

    /// A column that must be unique holds the same value twice.
    #[error("duplicate {column} value `{value}` in {dialect} table (rows {first} and {second})")]
    DuplicateValue { dialect: &'static str, column: &'static str, value: String, first: usize, second: usize },

    /// A request that is never valid, e.g. diacritic tones on an IPA notation.
    #[error("invalid configuration: {0}")]
    Misuse(String),

    /// A query ran before its backing data was loaded.
    #[error("{0} is not loaded")]
    NotLoaded(String),

    /// Encoding an export failed.
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn not_found(what: &'static str, value: impl Into<String>) -> Self {
        Error::NotFound { what, value: value.into() }
    }

    /// True for failures of the data source (retriable by reloading).
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Error::Io { .. } | Error::Malformed { .. } | Error::MissingTable { .. })
    }

    /// True for expected lookup misses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn serialize_failure_is_not_a_load_failure() {
        let mut export = BTreeMap::new();
        export.insert((1, 2), "tan1");
        let source = serde_json::to_string(&export).unwrap_err();
        let err = Error::Serialize { what: "strata", source };

        assert!(!err.is_load_failure());
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("failed to serialize strata: "));
        assert!(std::error::Error::source(&err).is_some());
    }
}
