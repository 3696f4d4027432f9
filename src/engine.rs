//! Reflex prediction engine.
//!
//! Given the MC classification of a small rhyme and its baseline reflex in a
//! dialect, the engine derives the readings of the other historical layers.
//!
//! ## How the parts work together
//!
//! ```text
//! rules::reflex::get(dialect) ──┐
//!                               │  RuleBook::new            (compiled_rules.rs)
//!                               └──────────┬──────────────
//!                                          │
//! baseline ── strip tone, devoice ─────────┼─ Predictor::get_reflexes (predictor.rs)
//!                                          │
//!                                          v
//!                           Predictor::predict_stratum, per layer
//!                             - rules in declaration order
//!                             - guard on the MC category
//!                             - first matching row of the rewrite
//!                                          │
//!                                          v
//!                           [default, vernacular, recent] + tones
//! ```
//!
//! Rules are not mutually exclusive: every rule whose guard holds runs on the
//! output of the previous one.
//!
//! ## Responsibilities by module
//!
//! - `compiled_rules.rs`: per-dialect `RuleBook`s (built once, process-wide),
//!   guard and rewrite evaluation.
//! - `predictor.rs`: `Predictor`, the layer/tone handling of
//!   `get_reflexes`, and the derived strata export.
//! - `metrics.rs`: opt-in traces of fired rules.
//!
//! ## Debugging
//!
//! Fired rules are logged at `trace` level under this module's target.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/predictor.rs"]
mod predictor;

pub use metrics::{ReflexRun, RuleTrace};
pub use predictor::{Predictor, ReflexOptions, Reflexes, derive_strata};
