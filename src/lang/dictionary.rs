use serde::Deserialize;

use crate::mc::{Catalog, McEntry, McInfo};
use crate::{Dialect, IndexedTable, Predictor};

/// One row of a `<DIALECT>` dictionary table.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawDictionaryEntry {
    #[serde(rename = "字頭", default)]
    headword: Option<String>,
    #[serde(rename = "記錄讀音", default)]
    recorded: Option<String>,
    #[serde(rename = "層", default)]
    layer: Option<String>,
    #[serde(rename = "訓作", default)]
    read_as: Option<String>,
    #[serde(rename = "釋義", default)]
    definition: Option<String>,
    #[serde(rename = "小韻號", default)]
    mc_index: Option<usize>,
}

/// A dialect word form. Pronunciations are romanized with ordinal tones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub dialect: Dialect,
    pub headword: Option<String>,
    /// Attested pronunciation.
    pub recorded: Option<String>,
    /// Reflex of the linked small rhyme, matched to the entry's stratum.
    pub derived: Option<String>,
    /// Stratum label, e.g. 白, 文, 新.
    pub layer: Option<String>,
    /// 訓讀 character the word is written with.
    pub read_as: Option<String>,
    pub definition: Option<String>,
    pub mc_index: Option<usize>,
    /// Classification of the linked small rhyme.
    pub mc: Option<McInfo>,
}

impl DictionaryEntry {
    /// The recorded pronunciation, else the derived one.
    pub fn pronunciation(&self) -> Option<&str> {
        self.recorded.as_deref().or(self.derived.as_deref())
    }

    pub(crate) fn from_raw(raw: RawDictionaryEntry, dialect: Dialect, catalog: &Catalog) -> Self {
        let mc_entry = raw.mc_index.and_then(|index| catalog.entry_at(index));
        let derived = mc_entry.and_then(|entry| {
            derive_reflex(entry, dialect, raw.layer.as_deref().unwrap_or(""), raw.recorded.as_deref())
        });
        DictionaryEntry {
            dialect,
            headword: raw.headword,
            recorded: raw.recorded,
            derived,
            layer: raw.layer,
            read_as: raw.read_as,
            definition: raw.definition.map(|text| text.replacen('~', "～", 1)),
            mc_index: raw.mc_index,
            mc: mc_entry.map(|entry| entry.info.clone()),
        }
    }
}

/// Reflex of `entry` for a dictionary row. FG rows pick the predicted reading
/// of their stratum; a literary row keeps its recorded reading when that is
/// the predicted recent one.
fn derive_reflex(entry: &McEntry, dialect: Dialect, layer: &str, recorded: Option<&str>) -> Option<String> {
    let baseline = entry.reflex(dialect).map(String::from);
    if dialect != Dialect::Fg || layer.is_empty() {
        return baseline;
    }
    let Some(predicted) = Predictor::for_dialect(dialect).reflexes_of(entry) else {
        return baseline;
    };
    let [default, vernacular, recent] = predicted.into_array();
    if layer.contains('文') && recorded == Some(recent.as_str()) {
        return Some(recent);
    }
    Some(if layer.contains('新') || layer == "官" {
        recent
    } else if layer.contains('白') {
        vernacular
    } else {
        default
    })
}

/// The immutable dictionary of one dialect, keyed by row number.
#[derive(Debug, Clone)]
pub struct Dictionary {
    dialect: Dialect,
    table: IndexedTable<DictionaryEntry>,
}

impl Dictionary {
    pub fn new(dialect: Dialect, entries: Vec<DictionaryEntry>) -> Self {
        Dictionary { dialect, table: IndexedTable::from_rows(entries) }
    }

    pub(crate) fn from_raw(dialect: Dialect, rows: Vec<RawDictionaryEntry>, catalog: &Catalog) -> Self {
        let entries = rows.into_iter().map(|row| DictionaryEntry::from_raw(row, dialect, catalog)).collect();
        Dictionary::new(dialect, entries)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn entry_at(&self, index: usize) -> Option<&DictionaryEntry> {
        self.table.entry_at(index)
    }

    /// Row number of an entry borrowed from this dictionary.
    pub fn index_of(&self, entry: &DictionaryEntry) -> Option<usize> {
        self.table.index_of(entry)
    }

    pub fn select(&self, filter: impl Fn(&DictionaryEntry) -> bool) -> Vec<&DictionaryEntry> {
        self.table.select(filter)
    }

    pub fn select_indices(&self, filter: impl Fn(&DictionaryEntry) -> bool) -> Vec<usize> {
        self.table.select_indices(filter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &DictionaryEntry)> {
        self.table.iter()
    }
}
