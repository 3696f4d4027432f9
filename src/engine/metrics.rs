//! Prediction traces.
//!
//! `Predictor::predict_stratum` is the hot path and records nothing.
//! `Predictor::predict_with_trace` returns a [`ReflexRun`] listing every rule
//! that changed the pronunciation, for the CLI report and for debugging rule
//! order.

use std::time::Duration;

use crate::Layer;

/// One rule that rewrote the pronunciation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTrace {
    pub rule: &'static str,
    pub layer: Layer,
    pub before: String,
    pub after: String,
}

/// Stratum prediction bundled with the rules that fired.
#[derive(Debug, Clone)]
pub struct ReflexRun {
    pub layer: Layer,
    pub input: String,
    pub output: String,
    /// Fired rules in application order.
    pub traces: Vec<RuleTrace>,
    /// Number of rules whose guard held, whether or not they rewrote.
    pub rules_matched: usize,
    pub duration: Duration,
}

impl ReflexRun {
    pub fn fired(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.traces.iter().map(|trace| trace.rule)
    }
}
