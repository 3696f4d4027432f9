use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use super::convert::respell;
use crate::{Dialect, Error, Notation, Part, Result, Syllable};

/// Value of a syllable part. Compound parts keep their fields apart so they
/// can be compared field by field and never need re-splitting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartValue {
    Simple(String),
    /// Fields in storage order: `[nucleus, coda]` or `[medial, nucleus, coda]`.
    Compound(Vec<String>),
}

impl PartValue {
    pub fn extract(syllable: &Syllable, part: Part) -> PartValue {
        if part.is_compound() {
            PartValue::Compound(part.components().iter().map(|&p| syllable.get(p).to_string()).collect())
        } else {
            PartValue::Simple(syllable.get(part).to_string())
        }
    }

    pub fn fields(&self) -> &[String] {
        match self {
            PartValue::Simple(value) => std::slice::from_ref(value),
            PartValue::Compound(fields) => fields,
        }
    }

    /// Concatenated text of all fields.
    pub fn joined(&self) -> String {
        self.fields().concat()
    }
}

/// Label of a part value: one string, or one per dialect code with an
/// `other` fallback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PartLabel {
    Plain(String),
    PerDialect(HashMap<String, String>),
}

/// Decoded `parts` table: notation key → part label → value → label.
pub type PartLabels = HashMap<String, HashMap<String, HashMap<String, PartLabel>>>;

/// Closed category list of every simple part, keyed by part label.
pub type PartCategories = HashMap<String, Vec<String>>;

/// Comparison priority of the fields of a final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalOrdering([Part; 3]);

impl FinalOrdering {
    /// Fails unless `order` is a permutation of medial, nucleus and coda.
    pub fn new(order: [Part; 3]) -> Result<Self> {
        let expected = [Part::Medial, Part::Nucleus, Part::Coda];
        if expected.iter().all(|part| order.contains(part)) {
            Ok(FinalOrdering(order))
        } else {
            Err(Error::Misuse(format!("final ordering {order:?} is not a permutation of medial, nucleus, coda")))
        }
    }

    pub fn parts(&self) -> &[Part; 3] {
        &self.0
    }

    fn position(&self, part: Part) -> usize {
        self.0.iter().position(|&p| p == part).unwrap_or(self.0.len())
    }
}

impl Default for FinalOrdering {
    fn default() -> Self {
        FinalOrdering([Part::Nucleus, Part::Medial, Part::Coda])
    }
}

/// Ranks of part values in their dialect's category lists.
#[derive(Debug, Clone, Default)]
pub(crate) struct Categories {
    lists: HashMap<Part, Vec<String>>,
}

impl Categories {
    pub(crate) fn new(raw: PartCategories) -> Self {
        let lists = raw.into_iter().filter_map(|(label, values)| Some((Part::from_label(&label)?, values))).collect();
        Categories { lists }
    }

    /// Position of `value` in the list of `part`; unknown values rank last.
    pub(crate) fn rank(&self, part: Part, value: &str) -> usize {
        self.lists.get(&part).and_then(|list| list.iter().position(|v| v == value)).unwrap_or(usize::MAX)
    }

    pub(crate) fn list(&self, part: Part) -> &[String] {
        self.lists.get(&part).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Total order over the values of one part.
#[derive(Debug, Clone)]
pub struct PartComparator<'a> {
    part: Part,
    /// `(storage position, part)` pairs in comparison priority.
    fields: Vec<(usize, Part)>,
    categories: &'a Categories,
}

impl PartComparator<'_> {
    pub fn part(&self) -> Part {
        self.part
    }

    pub fn compare(&self, a: &PartValue, b: &PartValue) -> Ordering {
        if self.part == Part::Tone {
            let number = |v: &PartValue| v.joined().parse::<u32>().unwrap_or(u32::MAX);
            return number(a).cmp(&number(b)).then_with(|| a.joined().cmp(&b.joined()));
        }

        let (a, b) = (a.fields(), b.fields());
        for &(position, part) in &self.fields {
            let (x, y) = (a.get(position).map_or("", String::as_str), b.get(position).map_or("", String::as_str));
            let ordering = self.categories.rank(part, x).cmp(&self.categories.rank(part, y)).then_with(|| x.cmp(y));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Display labels and orderings of syllable parts for one dialect.
#[derive(Debug, Clone)]
pub struct PartsCodec {
    dialect: Dialect,
    labels: Arc<PartLabels>,
    categories: Categories,
    tone_names: HashMap<String, String>,
}

impl PartsCodec {
    pub fn new(
        dialect: Dialect,
        labels: Arc<PartLabels>,
        categories: PartCategories,
        tone_names: HashMap<String, String>,
    ) -> Self {
        PartsCodec { dialect, labels, categories: Categories::new(categories), tone_names }
    }

    pub(crate) fn categories(&self) -> &Categories {
        &self.categories
    }

    /// Closed category list of a simple part.
    pub fn category_list(&self, part: Part) -> &[String] {
        self.categories.list(part)
    }

    fn label(&self, value: &str, part: Part, notation: Notation) -> String {
        let found = self.labels.get(notation.key()).and_then(|parts| parts.get(part.label())).and_then(|v| v.get(value));
        let label = match found {
            Some(PartLabel::Plain(label)) => Some(label),
            Some(PartLabel::PerDialect(labels)) => labels.get(self.dialect.code()).or_else(|| labels.get("other")),
            None => None,
        };
        match label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => value.to_string(),
        }
    }

    /// Display text of a part value, e.g. `"1 陰平"` for a tone or the gloss of
    /// a final.
    pub fn show(&self, value: &PartValue, part: Part, notation: Notation) -> String {
        match (part, value) {
            (Part::Tone, _) => {
                let tone = value.joined();
                match self.tone_names.get(&tone) {
                    Some(name) => format!("{tone} {name}"),
                    None => tone,
                }
            }
            (Part::Final, PartValue::Compound(fields)) if fields.len() == 3 => {
                let medial = self.label(&fields[0], Part::Medial, notation);
                let mut rhyme = self.label(&fields[1..].concat(), Part::Rhyme, notation);
                let pm_pinyin = self.dialect == Dialect::Pm && notation == Notation::Pinyin;
                if !fields[0].is_empty() || pm_pinyin {
                    rhyme = strip_gloss(&rhyme).to_string();
                }
                if let Some(spelling) = respell(self.dialect, notation, &format!("{medial}{rhyme}")) {
                    return spelling.to_string();
                }
                if medial == "無" { rhyme } else { format!("{medial}{rhyme}") }
            }
            _ => self.label(&value.joined(), part, notation),
        }
    }

    /// Comparator over the values of `part`. Compound parts compare their
    /// fields in the priority given by `ordering`.
    pub fn comparator(&self, part: Part, ordering: &FinalOrdering) -> PartComparator<'_> {
        let mut fields: Vec<(usize, Part)> = part.components().iter().copied().enumerate().collect();
        if part.is_compound() {
            fields.sort_by_key(|&(_, p)| ordering.position(p));
        }
        PartComparator { part, fields, categories: &self.categories }
    }
}

/// Drop a trailing gloss written as ` (…)` or ` […]`.
fn strip_gloss(label: &str) -> &str {
    [" (", " ["].iter().filter_map(|sep| label.find(sep)).min().map_or(label, |end| &label[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Arc<PartLabels> {
        Arc::new(
            serde_json::from_str(
                r#"{
                "pinyin": {
                    "介音": {"": "無", "i": "i", "u": "u"},
                    "韻": {"an": "an (寒)", "en": "en", "ei": "ei", "ou": "ou"},
                    "聲母": {"h": {"FG": "h [x]", "other": "h"}}
                },
                "ipaRaw": {
                    "介音": {"": "無", "j": "j"},
                    "韻": {"an": "an [寒]"}
                }
            }"#,
            )
            .unwrap(),
        )
    }

    fn categories() -> PartCategories {
        serde_json::from_str(
            r#"{"聲母": ["p", "t", "k"], "介音": ["", "i", "u"], "韻腹": ["a", "e", "o"], "韻尾": ["", "n", "i"]}"#,
        )
        .unwrap()
    }

    fn codec(dialect: Dialect) -> PartsCodec {
        let tones = [("1".to_string(), "陰平".to_string())].into_iter().collect();
        PartsCodec::new(dialect, labels(), categories(), tones)
    }

    fn syllable(initial: &str, medial: &str, nucleus: &str, coda: &str, tone: &str) -> Syllable {
        Syllable {
            initial: initial.into(),
            medial: medial.into(),
            nucleus: nucleus.into(),
            coda: coda.into(),
            tone: tone.into(),
        }
    }

    #[test]
    fn extract_keeps_compound_fields_apart() {
        let s = syllable("k", "u", "a", "n", "1");
        assert_eq!(PartValue::extract(&s, Part::Initial), PartValue::Simple("k".into()));
        assert_eq!(PartValue::extract(&s, Part::Rhyme), PartValue::Compound(vec!["a".into(), "n".into()]));
        // "a"+"n" and "an"+"" are different finals even though they concatenate alike.
        let other = syllable("k", "u", "an", "", "1");
        assert_ne!(PartValue::extract(&s, Part::Final), PartValue::extract(&other, Part::Final));
    }

    #[test]
    fn show_tone_and_per_dialect_labels() {
        let fg = codec(Dialect::Fg);
        assert_eq!(fg.show(&PartValue::Simple("1".into()), Part::Tone, Notation::Pinyin), "1 陰平");
        assert_eq!(fg.show(&PartValue::Simple("h".into()), Part::Initial, Notation::Pinyin), "h [x]");
        assert_eq!(codec(Dialect::Gc).show(&PartValue::Simple("h".into()), Part::Initial, Notation::Pinyin), "h");
        assert_eq!(fg.show(&PartValue::Simple("z".into()), Part::Initial, Notation::Pinyin), "z");
    }

    #[test]
    fn show_final_elides_empty_medial_and_strips_gloss() {
        let fg = codec(Dialect::Fg);
        let bare = PartValue::Compound(vec!["".into(), "a".into(), "n".into()]);
        assert_eq!(fg.show(&bare, Part::Final, Notation::Pinyin), "an (寒)");

        let rounded = PartValue::Compound(vec!["u".into(), "a".into(), "n".into()]);
        assert_eq!(fg.show(&rounded, Part::Final, Notation::Pinyin), "uan");
        assert_eq!(fg.show(&rounded, Part::Final, Notation::IpaRaw), "uan");
    }

    #[test]
    fn show_final_applies_mandarin_respelling() {
        let pm = codec(Dialect::Pm);
        let uen = PartValue::Compound(vec!["u".into(), "e".into(), "n".into()]);
        assert_eq!(pm.show(&uen, Part::Final, Notation::Pinyin), "un");
        let iou = PartValue::Compound(vec!["i".into(), "o".into(), "u".into()]);
        assert_eq!(pm.show(&iou, Part::Final, Notation::Pinyin), "iu");
        let an = PartValue::Compound(vec!["".into(), "a".into(), "n".into()]);
        assert_eq!(pm.show(&an, Part::Final, Notation::Pinyin), "an");
    }

    #[test]
    fn comparator_follows_category_lists() {
        let fg = codec(Dialect::Fg);
        let cmp = fg.comparator(Part::Initial, &FinalOrdering::default());
        let mut values: Vec<PartValue> = ["k", "p", "x", "t"].iter().map(|v| PartValue::Simple(v.to_string())).collect();
        values.sort_by(|a, b| cmp.compare(a, b));
        let sorted: Vec<String> = values.iter().map(PartValue::joined).collect();
        assert_eq!(sorted, ["p", "t", "k", "x"]);
    }

    #[test]
    fn final_ordering_changes_compound_priority() {
        let fg = codec(Dialect::Fg);
        let ia = PartValue::Compound(vec!["i".into(), "a".into(), "".into()]);
        let ue = PartValue::Compound(vec!["u".into(), "e".into(), "".into()]);

        let nucleus_first = fg.comparator(Part::Final, &FinalOrdering::default());
        assert_eq!(nucleus_first.compare(&ia, &ue), Ordering::Less);

        let ordering = FinalOrdering::new([Part::Coda, Part::Medial, Part::Nucleus]).unwrap();
        let ue_first = fg.comparator(Part::Final, &ordering);
        assert_eq!(ue_first.compare(&ue, &ia), Ordering::Greater);
        let oa = PartValue::Compound(vec!["".into(), "o".into(), "".into()]);
        assert_eq!(ue_first.compare(&oa, &ia), Ordering::Less);
    }

    #[test]
    fn tone_comparator_is_numeric() {
        let fg = codec(Dialect::Fg);
        let cmp = fg.comparator(Part::Tone, &FinalOrdering::default());
        assert_eq!(cmp.compare(&PartValue::Simple("10".into()), &PartValue::Simple("9".into())), Ordering::Greater);
    }

    #[test]
    fn final_ordering_must_be_a_permutation() {
        let err = FinalOrdering::new([Part::Medial, Part::Medial, Part::Coda]).unwrap_err();
        assert!(matches!(err, Error::Misuse(_)));
    }
}
