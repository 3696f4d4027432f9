use std::collections::BTreeMap;
use std::time::Instant;

use super::compiled_rules::{RuleBook, rule_book};
use super::metrics::{ReflexRun, RuleTrace};
use crate::mc::{Catalog, Category, McEntry};
use crate::rules::helpers::swap_prefix;
use crate::{Dialect, Layer};

/// Devoicing of romanized stop and affricate onsets.
const VOICING: [(&str, &str); 5] = [("p", "b"), ("t", "d"), ("c", "z"), ("q", "j"), ("k", "g")];

/// Switches of [`Predictor::get_reflexes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReflexOptions {
    /// Merge voiceless and voiced onsets before prediction.
    pub ignore_voicing: bool,
    /// Drop tones from all three readings.
    pub ignore_tone: bool,
}

/// Readings of one category in each layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reflexes {
    pub default: String,
    pub vernacular: String,
    pub recent: String,
}

impl Reflexes {
    pub fn get(&self, layer: Layer) -> &str {
        match layer {
            Layer::Default => &self.default,
            Layer::Vernacular => &self.vernacular,
            Layer::Recent => &self.recent,
        }
    }

    /// `[default, vernacular, recent]`.
    pub fn into_array(self) -> [String; 3] {
        [self.default, self.vernacular, self.recent]
    }
}

/// Stratum predictor of one dialect.
///
/// Prediction is a pure function of its inputs. No applicable rule is not an
/// error: the pronunciation passes through.
#[derive(Debug, Clone, Copy)]
pub struct Predictor {
    dialect: Dialect,
    book: &'static RuleBook,
}

impl Predictor {
    pub fn for_dialect(dialect: Dialect) -> Self {
        Predictor { dialect, book: rule_book(dialect) }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Number of rules in both layers.
    pub fn rule_count(&self) -> usize {
        self.book.len()
    }

    /// Apply the rules of `layer` to a toneless pronunciation.
    pub fn predict_stratum(&self, category: &Category, pronunciation: &str, layer: Layer) -> String {
        self.run(category, pronunciation, layer, None).0
    }

    /// Same as [`predict_stratum`](Self::predict_stratum), recording fired rules.
    pub fn predict_with_trace(&self, category: &Category, pronunciation: &str, layer: Layer) -> ReflexRun {
        let start = Instant::now();
        let mut traces = Vec::new();
        let (output, rules_matched) = self.run(category, pronunciation, layer, Some(&mut traces));
        ReflexRun {
            layer,
            input: pronunciation.to_string(),
            output,
            traces,
            rules_matched,
            duration: start.elapsed(),
        }
    }

    fn run(
        &self,
        category: &Category,
        pronunciation: &str,
        layer: Layer,
        mut traces: Option<&mut Vec<RuleTrace>>,
    ) -> (String, usize) {
        let mut current = pronunciation.to_string();
        let mut matched = 0;
        for rule in self.book.layer(layer) {
            if !rule.matches(category) {
                continue;
            }
            matched += 1;
            let Some(next) = rule.rewrite.apply(category, &current) else {
                continue;
            };
            if next == current {
                continue;
            }
            log::trace!("{} {:?} rule `{}`: {current} → {next}", self.dialect, layer, rule.name);
            if let Some(traces) = traces.as_deref_mut() {
                traces.push(RuleTrace { rule: rule.name, layer, before: current.clone(), after: next.clone() });
            }
            current = next;
        }
        (current, matched)
    }

    /// Split off the tone of a baseline reflex: its last character when that
    /// is a digit. Only one digit is taken.
    pub fn split_tone(pronunciation: &str) -> (&str, &str) {
        match pronunciation.char_indices().last() {
            Some((at, last)) if last.is_ascii_digit() => pronunciation.split_at(at),
            _ => (pronunciation, ""),
        }
    }

    /// Readings of a category in every layer, from its baseline reflex with an
    /// optional trailing tone digit.
    pub fn get_reflexes(&self, category: &Category, pronunciation: &str, options: ReflexOptions) -> Reflexes {
        let (body, tone) = Self::split_tone(pronunciation);
        let (mut body, mut tone) = (body.to_string(), tone.to_string());

        if options.ignore_voicing {
            if let Some(voiced) = VOICING.iter().find_map(|(from, to)| swap_prefix(&body, from, to)) {
                body = voiced;
            }
            // Aspirated-only categories keep a voiceless onset.
            if category.only(initials!("透定")) {
                if let Some(rest) = body.strip_prefix('d') {
                    body = format!("t{rest}");
                }
            }
        }

        let mut vernacular_tone = tone.clone();
        if options.ignore_tone {
            tone.clear();
            vernacular_tone.clear();
        } else if self.dialect == Dialect::Fg && tone == "7" && category.has_any(initials!("明泥來娘日疑云以")) {
            // Sonorant onsets take the lower entering tone in the vernacular layer.
            vernacular_tone = "8".to_string();
        }

        Reflexes {
            vernacular: self.predict_stratum(category, &body, Layer::Vernacular) + &vernacular_tone,
            recent: self.predict_stratum(category, &body, Layer::Recent) + &tone,
            default: body + &tone,
        }
    }

    /// Readings of a catalog entry from its recorded baseline reflex.
    pub fn reflexes_of(&self, entry: &McEntry) -> Option<Reflexes> {
        let baseline = entry.reflex(self.dialect)?;
        Some(self.get_reflexes(&entry.info.category(), baseline, ReflexOptions::default()))
    }
}

/// Derived stratum readings of every catalog entry that differ from its
/// default reflex, keyed by catalog index.
pub fn derive_strata(catalog: &Catalog, dialect: Dialect) -> BTreeMap<usize, Vec<(String, String)>> {
    let predictor = Predictor::for_dialect(dialect);
    let mut strata = BTreeMap::new();
    for (index, entry) in catalog.iter() {
        let Some(reflexes) = predictor.reflexes_of(entry) else {
            continue;
        };
        let derived: Vec<(String, String)> = [Layer::Vernacular, Layer::Recent]
            .into_iter()
            .filter(|&layer| reflexes.get(layer) != reflexes.default)
            .map(|layer| (layer.label().to_string(), reflexes.get(layer).to_string()))
            .collect();
        if !derived.is_empty() {
            strata.insert(index, derived);
        }
    }
    strata
}
