//! Dialect dictionaries and the views built on them.
//!
//! - `dictionary.rs`: `DictionaryEntry` rows with their derived reflex,
//!   resolved once at load, and the immutable `Dictionary` table.
//! - `inventory.rs`: distinct part values attested in a dictionary.
//! - `relator.rs`: distribution of one MC feature per value of another.

#[path = "lang/dictionary.rs"]
mod dictionary;
#[path = "lang/inventory.rs"]
mod inventory;
#[path = "lang/relator.rs"]
mod relator;

pub use dictionary::{Dictionary, DictionaryEntry};
pub(crate) use dictionary::RawDictionaryEntry;
pub use inventory::Inventory;
pub use relator::{DistributionCell, Relator};
