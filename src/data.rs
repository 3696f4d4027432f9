//! Data loading.
//!
//! Tables come from a [`DataSource`] and are decoded with `serde_json`. The
//! shared tables are loaded in a fixed order, each one allowed to refer to
//! what the earlier ones define:
//!
//! ```text
//! syllables → tones → parts → all-parts → MC → strata → <DIALECT> dictionaries
//! ```
//!
//! [`PhonologyStore`] memoizes the result. Concurrent `load` calls coalesce
//! into one build; a failed build leaves the store unloaded so a later call
//! retries. Queries before loading fail with `Error::NotLoaded`.
//!
//! - `source.rs`: the `DataSource` capability, `DirSource`, `MemorySource`.
//! - `store.rs`: `PhonologyStore` and the build step.
//! - `version.rs`: the `last-update` stamp of a data set.

#[path = "data/source.rs"]
mod source;
#[path = "data/store.rs"]
mod store;
#[path = "data/version.rs"]
mod version;

pub use source::{DataSource, DirSource, MemorySource};
pub use store::PhonologyStore;
pub use version::DataVersion;
