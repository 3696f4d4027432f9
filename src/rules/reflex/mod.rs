//! Stratum rule books of the reflex predictor.
//!
//! Only 撫州話 has historical-layer rules; every other dialect gets an empty
//! book and its predictions pass through unchanged.

pub(crate) mod predicates;
mod rules;
#[cfg(test)]
mod tests;

use crate::{Dialect, Rule};

/// Ordered rules of both stratum layers for `dialect`.
pub(crate) fn get(dialect: Dialect) -> Vec<Rule> {
    match dialect {
        Dialect::Fg => rules::get(),
        Dialect::Pm | Dialect::Gc | Dialect::Sw => Vec::new(),
    }
}
