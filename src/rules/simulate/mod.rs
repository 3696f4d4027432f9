//! Display-time rewrite pipelines for 撫州話.
//!
//! - `proto.rs`: reverses attested sound changes to show a reconstructed
//!   proto-form. Runs on phonetic notation, any tone notation.
//! - `variant.rs`: respells a reading as a recognized regional variant. The
//!   pre-pass runs on romanization with ordinal tones, the post-pass on
//!   phonetic notation.
//!
//! Each step is gated by its settings flag and a guard on the MC
//! classification. Steps are not idempotent: apply each pipeline once per
//! display.

mod proto;
mod variant;

pub use proto::{ProtoSettings, simulate_proto};
pub use variant::{VariantSettings, simulate_variant_post, simulate_variant_pre};
