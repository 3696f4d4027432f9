//! Middle Chinese catalog.
//!
//! The catalog is the historical reference system: an indexed table of
//! small-rhyme (小韻) entries, each with its phonological classification and
//! the expected baseline reflex in every modern dialect.
//!
//! - `info.rs`: the classification record (`McInfo`), initial-class sets
//!   (`Initials`) and the final class (`FinalClass`) used by rule guards.
//! - `catalog.rs`: `McEntry` and the immutable `Catalog` with its queries.
//! - `strata.rs`: per-dialect stratum overrides keyed by catalog index.

#[path = "mc/catalog.rs"]
mod catalog;
#[path = "mc/info.rs"]
mod info;
#[path = "mc/strata.rs"]
mod strata;

pub use catalog::{Catalog, McEntry};
pub(crate) use catalog::RawMcEntry;
pub use info::{Category, FinalClass, FinalStyle, Initials, McField, McInfo, McInfoStyle};
pub use strata::StrataTable;
pub(crate) use strata::RawStrata;
