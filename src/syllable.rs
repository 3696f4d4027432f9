//! Syllables of the modern dialects.
//!
//! A syllable string such as `qiah7` is read in two steps: the tone codec
//! strips the tone marker (`7`), then the converter looks the toneless body
//! (`qiah`) up in the dialect's conversion table, which gives the spelling in
//! every notation and the segmentation into initial, medial, nucleus, coda.
//!
//! - `tone.rs`: tone tables and the tone marker codec.
//! - `convert.rs`: the strict per-notation lookup tables.
//! - `parts.rs`: part values, labels and category orderings.
//! - `separator.rs`: table-free initial/final/tone split.
//! - `codec.rs`: whole-syllable parse, show and sort.

#[path = "syllable/codec.rs"]
mod codec;
#[path = "syllable/convert.rs"]
mod convert;
#[path = "syllable/parts.rs"]
mod parts;
#[path = "syllable/separator.rs"]
mod separator;
#[path = "syllable/tone.rs"]
mod tone;

pub use codec::SyllableCodec;
pub use convert::{Converter, NotationRow};
pub use parts::{FinalOrdering, PartCategories, PartComparator, PartLabel, PartLabels, PartValue, PartsCodec};
pub(crate) use parts::Categories;
pub use separator::separate;
pub(crate) use tone::superscript;
pub use tone::{ToneCodec, ToneInfo, ToneTable};
