//! Rule compilation and evaluation.
//!
//! This module holds the *static* side of prediction: rule books split by
//! layer, built once per dialect, plus the evaluation of guards and rewrites.
//!
//! ## Invariants
//!
//! - Rules keep their declaration order inside each layer. Later rules see the
//!   output of earlier ones.
//! - A table rewrite applies its first matching row and stops.
//! - Guards on a text field never match an empty field.

use once_cell::sync::Lazy;

use crate::mc::Category;
use crate::rules::helpers::{swap_prefix, swap_suffix};
use crate::{Dialect, Guard, Layer, PerDialect, Rewrite, Rule};

/// Rules of one dialect grouped by layer.
#[derive(Debug, Default)]
pub(crate) struct RuleBook {
    pub vernacular: Vec<Rule>,
    pub recent: Vec<Rule>,
}

impl RuleBook {
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut book = RuleBook::default();
        for rule in rules {
            match rule.layer {
                Layer::Vernacular => book.vernacular.push(rule),
                Layer::Recent => book.recent.push(rule),
                Layer::Default => log::warn!("rule `{}` has no stratum layer; ignored", rule.name),
            }
        }
        book
    }

    /// Rules of `layer` in application order; empty for the default layer.
    pub fn layer(&self, layer: Layer) -> &[Rule] {
        match layer {
            Layer::Default => &[],
            Layer::Vernacular => &self.vernacular,
            Layer::Recent => &self.recent,
        }
    }

    pub fn len(&self) -> usize {
        self.vernacular.len() + self.recent.len()
    }
}

static RULE_BOOKS: Lazy<PerDialect<RuleBook>> =
    Lazy::new(|| PerDialect::from_fn(|dialect| RuleBook::new(crate::rules::reflex::get(dialect))));

/// The process-wide rule book of `dialect`.
pub(crate) fn rule_book(dialect: Dialect) -> &'static RuleBook {
    &RULE_BOOKS[dialect]
}

fn field_in(field: &str, allowed: &str) -> bool {
    !field.is_empty() && allowed.contains(field)
}

impl Guard {
    pub(crate) fn holds(&self, cat: &Category) -> bool {
        let class = &cat.final_class;
        match *self {
            Guard::AnyInitial(set) => cat.has_any(set),
            Guard::OnlyInitials(set) => cat.only(set),
            Guard::NoInitial(set) => !cat.has_any(set),
            Guard::RhymeGroup(allowed) => field_in(&class.rhyme_group, allowed),
            Guard::Rhyme(allowed) => field_in(&class.rhyme, allowed),
            Guard::Grade(allowed) => field_in(&class.grade, allowed),
            Guard::Rounding(allowed) => field_in(&class.rounding, allowed),
            Guard::Predicate(test) => test(cat),
        }
    }
}

impl Rewrite {
    /// Rewritten pronunciation, or `None` when no row or case applies.
    pub(crate) fn apply(&self, cat: &Category, pron: &str) -> Option<String> {
        match *self {
            Rewrite::Prefix(rows) => rows.iter().find_map(|(from, to)| swap_prefix(pron, from, to)),
            Rewrite::Suffix(rows) => rows.iter().find_map(|(from, to)| swap_suffix(pron, from, to)),
            Rewrite::Exact(rows) => rows.iter().find(|(from, _)| *from == pron).map(|(_, to)| to.to_string()),
            Rewrite::Custom(rewrite) => rewrite(cat, pron),
        }
    }
}

impl Rule {
    pub(crate) fn matches(&self, cat: &Category) -> bool {
        self.guards.iter().all(|guard| guard.holds(cat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::FinalClass;
    use crate::Initials;

    fn category(initials: &str, full_final: &str) -> Category {
        Category::new(Initials::parse(initials), FinalClass::parse(full_final))
    }

    #[test]
    fn guards_never_match_empty_fields() {
        let cat = category("見", "通東三");
        assert!(Guard::Grade("三四").holds(&cat));
        assert!(!Guard::Rounding("開合").holds(&cat));
        assert!(Guard::NoInitial(initials!("幫")).holds(&cat));
        assert!(Guard::OnlyInitials(initials!("見溪")).holds(&cat));
    }

    #[test]
    fn table_rewrites_stop_at_first_row() {
        let cat = Category::default();
        let rows = Rewrite::Suffix(&[("n", "m"), ("an", "ang")]);
        assert_eq!(rows.apply(&cat, "tan").as_deref(), Some("tam"));
        assert_eq!(Rewrite::Exact(&[("a", "b")]).apply(&cat, "aa"), None);
    }

    #[test]
    fn books_split_by_layer() {
        let fg = rule_book(Dialect::Fg);
        assert!(!fg.vernacular.is_empty());
        assert!(!fg.recent.is_empty());
        assert!(fg.layer(Layer::Default).is_empty());
        assert_eq!(rule_book(Dialect::Pm).len(), 0);
    }
}
