use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::info::McInfo;
use crate::{Dialect, IndexedTable, PerDialect};

/// A small-rhyme (小韻) entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McEntry {
    /// Number of characters in the small rhyme; used as a frequency weight.
    pub char_count: u32,
    pub info: McInfo,
    /// Expected baseline reflex per dialect, romanized with ordinal tone.
    pub reflexes: PerDialect<Option<String>>,
}

impl McEntry {
    pub fn reflex(&self, dialect: Dialect) -> Option<&str> {
        self.reflexes[dialect].as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMcEntry {
    #[serde(rename = "字數", default)]
    char_count: u32,
    #[serde(rename = "MC")]
    info: McInfo,
    #[serde(default)]
    reflex: HashMap<String, Option<String>>,
}

impl From<RawMcEntry> for McEntry {
    fn from(raw: RawMcEntry) -> Self {
        // Reflex maps also carry systems this crate has no rule tables for.
        let reflexes = PerDialect::from_fn(|dialect| raw.reflex.get(dialect.code()).cloned().flatten());
        McEntry { char_count: raw.char_count, info: raw.info, reflexes }
    }
}

/// The MC catalog, keyed by small-rhyme number (小韻號).
#[derive(Debug, Clone)]
pub struct Catalog {
    table: IndexedTable<McEntry>,
}

impl Catalog {
    pub fn new(entries: impl IntoIterator<Item = (usize, McEntry)>) -> Self {
        Catalog { table: IndexedTable::new(entries) }
    }

    /// Build from the decoded `MC` table; keys that are not integers are skipped.
    pub(crate) fn from_raw(raw: BTreeMap<String, RawMcEntry>) -> Self {
        Catalog::new(raw.into_iter().filter_map(|(key, entry)| match key.trim().parse::<usize>() {
            Ok(index) => Some((index, McEntry::from(entry))),
            Err(_) => {
                log::warn!("skipping MC entry with non-numeric index `{key}`");
                None
            }
        }))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn entry_at(&self, index: usize) -> Option<&McEntry> {
        self.table.entry_at(index)
    }

    /// Catalog index of an entry borrowed from this catalog.
    pub fn index_of(&self, entry: &McEntry) -> Option<usize> {
        self.table.index_of(entry)
    }

    pub fn select(&self, filter: impl Fn(&McEntry) -> bool) -> Vec<&McEntry> {
        self.table.select(filter)
    }

    pub fn select_indices(&self, filter: impl Fn(&McEntry) -> bool) -> Vec<usize> {
        self.table.select_indices(filter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &McEntry)> {
        self.table.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "3": {"字數": 2, "MC": {"字": "東", "反切": "德紅切", "聲母": "端", "清濁": "全清", "音": "舌", "組": "端",
              "攝": "通", "韻系": "東", "等": "一", "呼": null, "重紐": null, "聲調": "平"},
              "reflex": {"FG": "tung1", "PM": "dong1", "MH": "tung"}},
        "1": {"字數": 5, "MC": {"字": "灘", "反切": "他干切", "聲母": "透", "清濁": "次清", "音": "舌", "組": "端",
              "攝": "山", "韻系": "寒", "等": "一", "呼": "開", "重紐": null, "聲調": "平"},
              "reflex": {"FG": "tan1", "GC": null}}
    }"#;

    fn catalog() -> Catalog {
        let raw: BTreeMap<String, RawMcEntry> = serde_json::from_str(SAMPLE).unwrap();
        Catalog::from_raw(raw)
    }

    #[test]
    fn decodes_entries_and_known_dialects() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 2);

        let dong = catalog.entry_at(3).unwrap();
        assert_eq!(dong.info.character, "東");
        assert_eq!(dong.info.rounding, "");
        assert_eq!(dong.reflex(Dialect::Fg), Some("tung1"));
        assert_eq!(dong.reflex(Dialect::Sw), None);
        assert_eq!(catalog.entry_at(1).unwrap().reflex(Dialect::Gc), None);
    }

    #[test]
    fn select_preserves_catalog_order_and_indices() {
        let catalog = catalog();
        assert_eq!(catalog.select_indices(|_| true), vec![1, 3]);

        let dental = catalog.select(|entry| entry.info.group == "端");
        assert_eq!(dental.len(), 2);
        assert_eq!(catalog.index_of(dental[1]), Some(3));
    }

    #[test]
    fn index_of_rejects_copies() {
        let catalog = catalog();
        let copy = catalog.entry_at(3).unwrap().clone();
        assert_eq!(catalog.index_of(&copy), None);
    }
}
