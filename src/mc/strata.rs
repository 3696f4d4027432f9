use std::collections::{BTreeMap, HashMap};

use super::catalog::{Catalog, McEntry};
use crate::{Dialect, Error, PerDialect, Result};

/// Decoded `strata` table: dialect → catalog index → `[label, pronunciation]` pairs.
pub(crate) type RawStrata = BTreeMap<String, BTreeMap<String, Vec<(String, Option<String>)>>>;

/// Historical-layer overrides of one dialect, keyed by catalog index.
#[derive(Debug, Clone, Default)]
pub struct StrataTable {
    overrides: HashMap<usize, Vec<(String, String)>>,
}

impl StrataTable {
    pub fn new(overrides: HashMap<usize, Vec<(String, String)>>) -> Self {
        StrataTable { overrides }
    }

    pub(crate) fn from_raw(mut raw: RawStrata) -> PerDialect<StrataTable> {
        PerDialect::from_fn(|dialect| {
            let rows = raw.remove(dialect.code()).unwrap_or_default();
            let overrides = rows
                .into_iter()
                .filter_map(|(key, pairs)| {
                    let index = key.trim().parse::<usize>().ok()?;
                    let pairs = pairs.into_iter().filter_map(|(label, pron)| Some((label, pron?))).collect();
                    Some((index, pairs))
                })
                .collect();
            StrataTable { overrides }
        })
    }

    /// Stratum overrides recorded for a catalog index, in table order.
    pub fn strata(&self, index: usize) -> &[(String, String)] {
        self.overrides.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// All readings of a catalog entry: the default reflex under the empty
    /// label, then each stratum override. Empty pronunciations are dropped; a
    /// repeated label replaces the earlier pronunciation in place.
    pub fn reflex_map(&self, catalog: &Catalog, index: usize, dialect: Dialect) -> Result<Vec<(String, String)>> {
        let entry = catalog.entry_at(index).ok_or_else(|| Error::not_found("MC entry", index.to_string()))?;
        Ok(self.merge(entry, index, dialect))
    }

    /// Same as [`reflex_map`](Self::reflex_map) for an entry borrowed from `catalog`.
    pub fn reflex_map_of(&self, catalog: &Catalog, entry: &McEntry, dialect: Dialect) -> Result<Vec<(String, String)>> {
        let index = catalog.index_of(entry).ok_or_else(|| Error::not_found("MC entry", entry.info.character.clone()))?;
        Ok(self.merge(entry, index, dialect))
    }

    fn merge(&self, entry: &McEntry, index: usize, dialect: Dialect) -> Vec<(String, String)> {
        let default = entry.reflex(dialect).map(|pron| (String::new(), pron.to_string()));
        let mut out: Vec<(String, String)> = Vec::new();
        for (label, pron) in default.into_iter().chain(self.strata(index).iter().cloned()) {
            if pron.is_empty() {
                continue;
            }
            match out.iter_mut().find(|(existing, _)| *existing == label) {
                Some(slot) => slot.1 = pron,
                None => out.push((label, pron)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::RawMcEntry;

    fn catalog() -> Catalog {
        let raw: BTreeMap<String, RawMcEntry> = serde_json::from_str(
            r#"{"10": {"字數": 1, "MC": {"字": "塔", "聲母": "透", "清濁": "次清", "音": "舌", "組": "端",
                 "攝": "咸", "韻系": "談", "等": "一", "呼": "開", "聲調": "入"},
                 "reflex": {"FG": "hat7", "PM": "ta3"}}}"#,
        )
        .unwrap();
        Catalog::from_raw(raw)
    }

    #[test]
    fn reflex_map_puts_default_first() {
        let raw: RawStrata =
            serde_json::from_str(r#"{"FG": {"10": [["白", "hap7"], ["新", ""], ["文", null]]}}"#).unwrap();
        let strata = StrataTable::from_raw(raw);
        let catalog = catalog();

        let map = strata[Dialect::Fg].reflex_map(&catalog, 10, Dialect::Fg).unwrap();
        assert_eq!(map, vec![("".to_string(), "hat7".to_string()), ("白".to_string(), "hap7".to_string())]);

        let pm = strata[Dialect::Pm].reflex_map(&catalog, 10, Dialect::Pm).unwrap();
        assert_eq!(pm, vec![("".to_string(), "ta3".to_string())]);
    }

    #[test]
    fn missing_index_is_not_found() {
        let strata = StrataTable::default();
        let err = strata.reflex_map(&catalog(), 99, Dialect::Fg).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn repeated_label_overrides_in_place() {
        let mut overrides = HashMap::new();
        overrides.insert(10, vec![("".to_string(), "tat7".to_string())]);
        let strata = StrataTable::new(overrides);
        let catalog = catalog();
        let entry = catalog.entry_at(10).unwrap();

        let map = strata.reflex_map_of(&catalog, entry, Dialect::Fg).unwrap();
        assert_eq!(map, vec![("".to_string(), "tat7".to_string())]);
    }
}
