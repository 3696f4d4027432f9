//! Tone codec.
//!
//! Tones are stored in data with an ordinal label (`"1"`, `"7"`, ...) and are
//! written in one of four notations. Parsing finds the tone marker in a
//! syllable string, strips it and returns the ordinal; rendering goes the
//! other way.
//!
//! ## Marker matching
//!
//! Every non-empty representation of every tone becomes a marker. Markers are
//! tried longest first (so `˥˥` wins over `˥`), then in table order. The last
//! occurrence of the first marker found is stripped. Matching happens on NFD
//! text so precomposed vowels (`á`) expose their combining tone mark.
//!
//! Every marker belongs to exactly one tone of its dialect, so a parsed tone
//! always renders back to the same marker.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::{Dialect, Error, Notation, Result, ToneNotation};

/// Representations of one tone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToneInfo {
    /// Traditional tone name, e.g. 陰平.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub diacritic: Option<String>,
    /// Chao tone letters, e.g. `˧˨`.
    #[serde(default)]
    pub letter: Option<String>,
    /// Superscript tone numbers, e.g. `³²`.
    #[serde(default)]
    pub number: Option<String>,
}

/// Tone table of a dialect, keyed by ordinal label.
pub type ToneTable = BTreeMap<String, ToneInfo>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Ordinal,
    Diacritic,
    Letter,
    Number,
}

impl MarkerKind {
    fn column(self) -> &'static str {
        match self {
            MarkerKind::Ordinal => "ordinal tone",
            MarkerKind::Diacritic => "diacritic tone",
            MarkerKind::Letter => "letter tone",
            MarkerKind::Number => "number tone",
        }
    }
}

#[derive(Debug, Clone)]
struct Marker {
    text: String,
    tone: usize,
}

/// Per-dialect tone parser and renderer.
#[derive(Debug, Clone)]
pub struct ToneCodec {
    dialect: Dialect,
    tones: Vec<(String, ToneInfo)>,
    markers: Vec<Marker>,
}

/// Codas after which GC level tones are read as entering tones.
const STOP_CODAS: [&str; 6] = ["p", "p̚", "t", "t̚", "k", "k̚"];
/// (level, entering) tone pairs of GC.
const CHECKED_TONE_PAIRS: [(&str, &str); 3] = [("1", "7"), ("3", "8"), ("6", "9")];

/// Vowels in diacritic pivot priority.
const NUCLEUS_PRIORITY: &str = "aoêeüuiy";
const SYLLABIC_NASALS: [&str; 3] = ["m", "n", "ng"];

impl ToneCodec {
    /// Fails with [`Error::DuplicateValue`] when two tones share any marker
    /// (ordinal, diacritic, letter or number), since parsing could not tell
    /// them apart.
    pub fn new(dialect: Dialect, table: ToneTable) -> Result<Self> {
        let mut tones: Vec<(String, ToneInfo)> = table.into_iter().collect();
        tones.sort_by(|(a, _), (b, _)| ordinal_key(a).cmp(&ordinal_key(b)));

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut markers = Vec::new();

        for (tone, (ordinal, info)) in tones.iter().enumerate() {
            let candidates = [
                (Some(ordinal.as_str()), MarkerKind::Ordinal),
                (info.diacritic.as_deref(), MarkerKind::Diacritic),
                (info.letter.as_deref(), MarkerKind::Letter),
                (info.number.as_deref(), MarkerKind::Number),
            ];
            for (text, kind) in candidates {
                let Some(text) = text.filter(|t| !t.is_empty()) else {
                    continue;
                };
                let text: String = text.nfd().collect();
                match seen.get(&text) {
                    Some(&other) if other == tone => {}
                    Some(&other) => {
                        return Err(Error::DuplicateValue {
                            dialect: dialect.code(),
                            column: kind.column(),
                            value: text,
                            first: other,
                            second: tone,
                        });
                    }
                    None => {
                        seen.insert(text.clone(), tone);
                        markers.push(Marker { text, tone });
                    }
                }
            }
        }

        // Longest first; the sort is stable so table order breaks ties.
        markers.sort_by(|a, b| b.text.chars().count().cmp(&a.text.chars().count()));

        Ok(ToneCodec { dialect, tones, markers })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn info(&self, ordinal: &str) -> Option<&ToneInfo> {
        self.tones.iter().find(|(o, _)| o == ordinal).map(|(_, info)| info)
    }

    /// Ordinal labels in table order.
    pub fn ordinals(&self) -> impl Iterator<Item = &str> {
        self.tones.iter().map(|(o, _)| o.as_str())
    }

    /// Split `raw` into its toneless stem and ordinal tone (empty when no
    /// marker is found).
    pub fn parse(&self, raw: &str) -> (String, String) {
        let value: String = raw.nfd().collect();
        for marker in &self.markers {
            if let Some(position) = value.rfind(marker.text.as_str()) {
                let mut stem = value.clone();
                stem.replace_range(position..position + marker.text.len(), "");
                let tone = self.remap(&stem, &self.tones[marker.tone].0);
                return (stem.nfc().collect(), tone);
            }
        }
        (value.nfc().collect(), String::new())
    }

    /// Dialect-specific ordinal remapping after extraction.
    fn remap(&self, stem: &str, ordinal: &str) -> String {
        match self.dialect {
            Dialect::Gc if STOP_CODAS.iter().any(|coda| stem.ends_with(coda)) => CHECKED_TONE_PAIRS
                .iter()
                .find(|(level, _)| *level == ordinal)
                .map(|(_, entering)| entering.to_string())
                .unwrap_or_else(|| ordinal.to_string()),
            _ => ordinal.to_string(),
        }
    }

    /// Write `stem` with `tone` in `notation`. `target` is the segment notation
    /// of `stem`; diacritics are only defined for the romanized notation.
    pub fn render(&self, stem: &str, tone: &str, notation: ToneNotation, target: Notation) -> Result<String> {
        if notation == ToneNotation::Diacritic && target != Notation::Pinyin {
            return Err(Error::Misuse(format!("diacritic tone notation is only defined for pinyin, not {}", target.key())));
        }
        if tone.is_empty() {
            return Ok(stem.to_string());
        }

        let info = self.info(tone);
        let mark = match notation {
            ToneNotation::Ordinal => None,
            ToneNotation::Letter => info.and_then(|i| i.letter.as_deref()),
            ToneNotation::Number => info.and_then(|i| i.number.as_deref()),
            ToneNotation::Diacritic => {
                let diacritic = info
                    .and_then(|i| i.diacritic.as_deref())
                    .ok_or_else(|| Error::not_found("diacritic tone", format!("{}{tone}", self.dialect)))?;
                return Ok(place_diacritic(stem, diacritic));
            }
        };

        Ok(format!("{stem}{}", mark.unwrap_or(tone)))
    }
}

fn ordinal_key(ordinal: &str) -> (u32, &str) {
    (ordinal.parse().unwrap_or(u32::MAX), ordinal)
}

/// Put a combining tone mark on the pivot vowel of a romanized stem.
///
/// The pivot is the last vowel, moved one step back when the previous vowel
/// ranks higher in [`NUCLEUS_PRIORITY`] (`ao` → `a`), except for `ui` where
/// the mark stays on `i`. Syllabic nasals carry the mark on their first
/// letter; a stem with no vowel does too.
fn place_diacritic(stem: &str, diacritic: &str) -> String {
    let stem: String = stem.nfc().collect();
    let chars: Vec<char> = stem.chars().collect();
    let rank = |c: char| NUCLEUS_PRIORITY.chars().position(|n| n == c);

    let pivot = if SYLLABIC_NASALS.contains(&stem.as_str()) {
        0
    } else {
        match chars.iter().rposition(|&c| rank(c).is_some()) {
            Some(position) if position > 0 => {
                let (previous, current) = (chars[position - 1], chars[position]);
                match (rank(previous), rank(current)) {
                    (Some(p), Some(c)) if p < c && !(previous == 'u' && current == 'i') => position - 1,
                    _ => position,
                }
            }
            Some(position) => position,
            None => 0,
        }
    };

    let head: String = chars.iter().take(pivot + 1).collect();
    let tail: String = chars.iter().skip(pivot + 1).collect();
    format!("{head}{diacritic}{tail}").nfc().collect()
}

/// Superscript form of tone numbers (`45` → `⁴⁵`, `ʔ` → `ˀ`).
pub(crate) fn superscript(number: &str) -> String {
    number
        .chars()
        .map(|c| match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            'ʔ' => 'ˀ',
            other => other,
        })
        .collect()
}
