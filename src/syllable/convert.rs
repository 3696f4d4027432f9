use std::borrow::Cow;
use std::collections::HashMap;

use serde::Deserialize;

use crate::{Dialect, Error, Notation, Result};

/// One aligned row of a conversion table: the same syllable body written in
/// every notation, plus its segmentation when the table provides one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRow")]
pub struct NotationRow {
    /// `[initial, medial, nucleus, coda]`.
    pub segments: Option<[String; 4]>,
    /// Spellings indexed by [`Notation`].
    pub spellings: [String; 3],
}

#[derive(Deserialize)]
struct RawRow {
    #[serde(default)]
    tuple: Option<[String; 4]>,
    pinyin: String,
    #[serde(rename = "ipaRaw")]
    ipa_raw: String,
    #[serde(rename = "ipaStrict")]
    ipa_strict: String,
}

impl From<RawRow> for NotationRow {
    fn from(raw: RawRow) -> Self {
        NotationRow { segments: raw.tuple, spellings: [raw.pinyin, raw.ipa_raw, raw.ipa_strict] }
    }
}

impl NotationRow {
    pub fn new(pinyin: &str, ipa_raw: &str, ipa_strict: &str) -> Self {
        NotationRow { segments: None, spellings: [pinyin.into(), ipa_raw.into(), ipa_strict.into()] }
    }

    pub fn with_segments(mut self, segments: [&str; 4]) -> Self {
        self.segments = Some(segments.map(String::from));
        self
    }

    pub fn spelling(&self, notation: Notation) -> &str {
        &self.spellings[notation.column()]
    }
}

/// Bidirectional lookup between the notations of one dialect.
///
/// Every column has a strict reverse index: values are compared exactly (no
/// normalization) and a value occurring twice in a column rejects the table.
#[derive(Debug, Clone)]
pub struct Converter {
    dialect: Dialect,
    rows: Vec<NotationRow>,
    columns: [HashMap<String, usize>; 3],
    segments: Option<HashMap<[String; 4], usize>>,
}

impl Converter {
    pub fn new(dialect: Dialect, rows: Vec<NotationRow>) -> Result<Self> {
        let mut columns: [HashMap<String, usize>; 3] = Default::default();
        for notation in Notation::ALL {
            let index = &mut columns[notation.column()];
            for (row, entry) in rows.iter().enumerate() {
                let value = entry.spelling(notation);
                if let Some(&first) = index.get(value) {
                    return Err(Error::DuplicateValue {
                        dialect: dialect.code(),
                        column: notation.key(),
                        value: value.to_string(),
                        first,
                        second: row,
                    });
                }
                index.insert(value.to_string(), row);
            }
        }

        let segments = if !rows.is_empty() && rows.iter().all(|row| row.segments.is_some()) {
            let mut index = HashMap::with_capacity(rows.len());
            for (row, segments) in rows.iter().enumerate().filter_map(|(i, r)| Some((i, r.segments.as_ref()?))) {
                if let Some(&first) = index.get(segments) {
                    return Err(Error::DuplicateValue {
                        dialect: dialect.code(),
                        column: "tuple",
                        value: segments.concat(),
                        first,
                        second: row,
                    });
                }
                index.insert(segments.clone(), row);
            }
            Some(index)
        } else {
            None
        };

        Ok(Converter { dialect, rows, columns, segments })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn rows(&self) -> &[NotationRow] {
        &self.rows
    }

    fn row_of(&self, value: &str, from: Notation) -> Result<&NotationRow> {
        let column = &self.columns[from.column()];
        column
            .get(value)
            .or_else(|| column.get(&respell_body(self.dialect, from, value, Direction::Expand)?))
            .map(|&row| &self.rows[row])
            .ok_or_else(|| Error::NotFound { what: from.key(), value: format!("{}:{value}", self.dialect) })
    }

    /// Respell `value` from one notation into another. A value missing from the
    /// `from` column is an error; callers choose the fallback.
    ///
    /// Mandarin romanization output is written with its contracted finals
    /// (`guen` → `gun`); contracted input is accepted as well.
    pub fn convert(&self, value: &str, from: Notation, to: Notation) -> Result<Cow<'_, str>> {
        let spelling = self.row_of(value, from)?.spelling(to);
        Ok(match respell_body(self.dialect, to, spelling, Direction::Contract) {
            Some(respelled) => Cow::Owned(respelled),
            None => Cow::Borrowed(spelling),
        })
    }

    /// Segmentation of `value`.
    pub fn segments(&self, value: &str, from: Notation) -> Result<&[String; 4]> {
        self.row_of(value, from)?
            .segments
            .as_ref()
            .ok_or_else(|| Error::not_found("segmentation", format!("{}:{value}", self.dialect)))
    }

    /// Spelling of a segmentation in `to`.
    pub fn spell(&self, segments: &[String; 4], to: Notation) -> Result<&str> {
        self.segments
            .as_ref()
            .and_then(|index| index.get(segments))
            .map(|&row| self.rows[row].spelling(to))
            .ok_or_else(|| Error::not_found("segmentation", format!("{}:{}", self.dialect, segments.concat())))
    }
}

/// Mandarin romanization writes these finals contracted after an initial.
const CONTRACTED_FINALS: [(&str, &str); 3] = [("uen", "un"), ("uei", "ui"), ("iou", "iu")];

#[derive(Clone, Copy)]
enum Direction {
    Contract,
    Expand,
}

/// Spelling conventions of Mandarin romanization for medial + rhyme strings
/// that the phonemic analysis keeps apart (`uen` is written `un`).
pub(crate) fn respell(dialect: Dialect, notation: Notation, text: &str) -> Option<&'static str> {
    if dialect != Dialect::Pm || notation != Notation::Pinyin {
        return None;
    }
    CONTRACTED_FINALS.iter().find(|(full, _)| *full == text).map(|&(_, short)| short)
}

/// A whole syllable body with its final contracted or expanded. Zero-initial
/// bodies (`wen`, `you`) are never touched.
fn respell_body(dialect: Dialect, notation: Notation, body: &str, direction: Direction) -> Option<String> {
    if dialect != Dialect::Pm || notation != Notation::Pinyin {
        return None;
    }
    CONTRACTED_FINALS.iter().find_map(|&(full, short)| {
        let (from, to) = match direction {
            Direction::Contract => (full, short),
            Direction::Expand => (short, full),
        };
        let initial = body.strip_suffix(from)?;
        (!initial.is_empty()).then(|| format!("{initial}{to}"))
    })
}
