extern crate self as phonoreflex;

use std::ops::{Index, IndexMut};

#[macro_use]
mod macros;
mod api;
mod data;
mod engine;
mod error;
mod lang;
mod mc;
mod rules;
mod syllable;
mod table;

pub use api::{DisplayOptions, Phonology, display};
pub use data::{DataSource, DataVersion, DirSource, MemorySource, PhonologyStore};
pub use engine::{Predictor, ReflexOptions, ReflexRun, Reflexes, RuleTrace, derive_strata};
pub use error::{Error, Result};
pub use lang::{Dictionary, DictionaryEntry, DistributionCell, Inventory, Relator};
pub use mc::{Catalog, Category, FinalClass, FinalStyle, Initials, McEntry, McField, McInfo, McInfoStyle, StrataTable};
pub use rules::simulate::{ProtoSettings, VariantSettings, simulate_proto, simulate_variant_post, simulate_variant_pre};
pub use syllable::{
    Converter, FinalOrdering, NotationRow, PartComparator, PartValue, PartsCodec, SyllableCodec, ToneCodec, ToneInfo,
    ToneTable, separate,
};
pub use table::IndexedTable;

// --- Dialects ---------------------------------------------------------------

/// The closed set of supported modern dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dialect {
    /// 撫州話 (Fuzhou Gan).
    Fg,
    /// 普通話 (Standard Mandarin).
    Pm,
    /// 廣州話 (Guangzhou Cantonese).
    Gc,
    /// 上海話 (Shanghai Wu).
    Sw,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [Dialect::Fg, Dialect::Pm, Dialect::Gc, Dialect::Sw];

    /// Stable dialect code used by data tables.
    pub fn code(self) -> &'static str {
        match self {
            Dialect::Fg => "FG",
            Dialect::Pm => "PM",
            Dialect::Gc => "GC",
            Dialect::Sw => "SW",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Fg => "撫州話",
            Dialect::Pm => "普通話",
            Dialect::Gc => "廣州話",
            Dialect::Sw => "上海話",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Dialect::ALL.into_iter().find(|d| d.code().eq_ignore_ascii_case(code))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One value per dialect, indexed by [`Dialect`].
///
/// Records are assembled once at load time; dispatch is an array index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerDialect<T>([T; 4]);

impl<T> PerDialect<T> {
    pub fn from_fn(f: impl FnMut(Dialect) -> T) -> Self {
        PerDialect(Dialect::ALL.map(f))
    }

    pub fn try_from_fn<E>(mut f: impl FnMut(Dialect) -> Result<T, E>) -> Result<Self, E> {
        let [a, b, c, d] = Dialect::ALL;
        Ok(PerDialect([f(a)?, f(b)?, f(c)?, f(d)?]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dialect, &T)> {
        Dialect::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Dialect> for PerDialect<T> {
    type Output = T;

    fn index(&self, dialect: Dialect) -> &T {
        &self.0[dialect.index()]
    }
}

impl<T> IndexMut<Dialect> for PerDialect<T> {
    fn index_mut(&mut self, dialect: Dialect) -> &mut T {
        &mut self.0[dialect.index()]
    }
}

// --- Notations --------------------------------------------------------------

/// Parallel spelling systems for the segments of a syllable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    /// Romanization (e.g. `qiah`).
    Pinyin,
    /// Broad phonetic (e.g. `tɕʰjaʔ`).
    IpaRaw,
    /// Narrow phonetic (e.g. `t͡ɕʰjaʔ̚`).
    IpaStrict,
}

impl Notation {
    pub const ALL: [Notation; 3] = [Notation::Pinyin, Notation::IpaRaw, Notation::IpaStrict];

    pub fn key(self) -> &'static str {
        match self {
            Notation::Pinyin => "pinyin",
            Notation::IpaRaw => "ipaRaw",
            Notation::IpaStrict => "ipaStrict",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Notation::ALL.into_iter().find(|n| n.key() == key)
    }

    pub(crate) fn column(self) -> usize {
        self as usize
    }
}

/// Display conventions for a tone value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToneNotation {
    /// `a3`
    Ordinal,
    /// `â`
    Diacritic,
    /// `a˦˥`
    Letter,
    /// `a⁴⁵`
    Number,
}

impl ToneNotation {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ordinal" => Some(ToneNotation::Ordinal),
            "diacritic" => Some(ToneNotation::Diacritic),
            "letter" => Some(ToneNotation::Letter),
            "number" => Some(ToneNotation::Number),
            _ => None,
        }
    }
}

// --- Syllables --------------------------------------------------------------

/// Syllable parts, including the compound rhyme (韻) and final (韻母).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Part {
    Initial,
    Medial,
    Nucleus,
    Coda,
    Tone,
    /// Nucleus + coda.
    Rhyme,
    /// Medial + nucleus + coda.
    Final,
}

impl Part {
    /// Label used as key in the parts tables.
    pub fn label(self) -> &'static str {
        match self {
            Part::Initial => "聲母",
            Part::Medial => "介音",
            Part::Nucleus => "韻腹",
            Part::Coda => "韻尾",
            Part::Tone => "聲調",
            Part::Rhyme => "韻",
            Part::Final => "韻母",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        [Part::Initial, Part::Medial, Part::Nucleus, Part::Coda, Part::Tone, Part::Rhyme, Part::Final]
            .into_iter()
            .find(|p| p.label() == label)
    }

    /// The simple parts a compound part is made of, in storage order.
    pub fn components(self) -> &'static [Part] {
        match self {
            Part::Rhyme => &[Part::Nucleus, Part::Coda],
            Part::Final => &[Part::Medial, Part::Nucleus, Part::Coda],
            Part::Initial => &[Part::Initial],
            Part::Medial => &[Part::Medial],
            Part::Nucleus => &[Part::Nucleus],
            Part::Coda => &[Part::Coda],
            Part::Tone => &[Part::Tone],
        }
    }

    pub fn is_compound(self) -> bool {
        matches!(self, Part::Rhyme | Part::Final)
    }
}

/// A parsed syllable. Empty strings mark absent parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Syllable {
    pub initial: String,
    pub medial: String,
    pub nucleus: String,
    pub coda: String,
    /// Ordinal tone label (e.g. `"3"`), or empty.
    pub tone: String,
}

impl Syllable {
    pub fn from_segments(segments: &[String; 4], tone: impl Into<String>) -> Self {
        let [initial, medial, nucleus, coda] = segments.clone();
        Syllable { initial, medial, nucleus, coda, tone: tone.into() }
    }

    /// Value of a simple part. Compound parts go through [`PartValue::extract`].
    pub fn get(&self, part: Part) -> &str {
        match part {
            Part::Initial => &self.initial,
            Part::Medial => &self.medial,
            Part::Nucleus => &self.nucleus,
            Part::Coda => &self.coda,
            Part::Tone => &self.tone,
            Part::Rhyme | Part::Final => "",
        }
    }

    pub fn segments(&self) -> [&str; 4] {
        [&self.initial, &self.medial, &self.nucleus, &self.coda]
    }

    /// Re-join the fields in fixed order (segments, then ordinal tone).
    pub fn join(&self) -> String {
        let mut out = self.segments().concat();
        out.push_str(&self.tone);
        out
    }
}

// --- Historical layers -------------------------------------------------------

/// Chronological strata of a reflex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// The baseline (literary) reflex.
    Default,
    /// 白讀
    Vernacular,
    /// 新派
    Recent,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Default, Layer::Vernacular, Layer::Recent];

    /// Stratum label used by data tables.
    pub fn label(self) -> &'static str {
        match self {
            Layer::Default => "",
            Layer::Vernacular => "白",
            Layer::Recent => "新",
        }
    }
}

// --- Rules (internal) ---------------------------------------------------------

/// Category guard of a rewrite rule. All guards of a rule must hold.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Guard {
    /// At least one of the category's initials is in the set.
    AnyInitial(Initials),
    /// Every initial of the category is in the set (vacuously true when empty).
    OnlyInitials(Initials),
    /// None of the category's initials is in the set.
    NoInitial(Initials),
    /// 攝 is one of the listed characters.
    RhymeGroup(&'static str),
    /// 韻系 is one of the listed characters.
    Rhyme(&'static str),
    /// 等 is one of the listed characters.
    Grade(&'static str),
    /// 呼 is one of the listed characters.
    Rounding(&'static str),
    /// Arbitrary category test.
    Predicate(fn(&mc::Category) -> bool),
}

/// Pattern rewrite of a rule. Table-driven rewrites apply the first matching
/// row and stop; `None` leaves the pronunciation unchanged.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Rewrite {
    /// Replace a leading `from` with `to`.
    Prefix(&'static [(&'static str, &'static str)]),
    /// Replace a trailing `from` with `to`.
    Suffix(&'static [(&'static str, &'static str)]),
    /// Replace the whole pronunciation when it equals `from`.
    Exact(&'static [(&'static str, &'static str)]),
    /// Anything the tables cannot express.
    Custom(fn(&mc::Category, &str) -> Option<String>),
}

/// An ordered, guarded rewrite rule of a reflex layer.
#[derive(Debug, Clone)]
pub(crate) struct Rule {
    pub name: &'static str,
    pub layer: Layer,
    pub guards: Vec<Guard>,
    pub rewrite: Rewrite,
}
