//! Rule tables.
//!
//! - `reflex/`: ordered stratum rules of the reflex predictor, one `get()` per
//!   dialect that has a rule book.
//! - `simulate/`: the proto-form and regional-variant rewrite pipelines.
//! - `helpers.rs`: character-safe string edits shared by both.

pub(crate) mod helpers;
pub(crate) mod reflex;
pub mod simulate;
