use std::cmp::Ordering;

use super::convert::Converter;
use super::parts::{Categories, FinalOrdering};
use super::tone::ToneCodec;
use crate::{Dialect, Error, Notation, Part, Result, Syllable, ToneNotation};

/// Parse, show and sort whole syllables of one dialect.
#[derive(Debug, Clone)]
pub struct SyllableCodec {
    tones: ToneCodec,
    converter: Converter,
    categories: Categories,
}

impl SyllableCodec {
    pub(crate) fn new(tones: ToneCodec, converter: Converter, categories: Categories) -> Self {
        SyllableCodec { tones, converter, categories }
    }

    pub fn dialect(&self) -> Dialect {
        self.converter.dialect()
    }

    pub fn tones(&self) -> &ToneCodec {
        &self.tones
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn parse(&self, value: &str, notation: Notation) -> Result<Syllable> {
        let (stem, tone) = self.tones.parse(value);
        let segments = self.converter.segments(&stem, notation)?;
        Ok(Syllable::from_segments(segments, tone))
    }

    /// Spell a parsed syllable in `notation` with an ordinal tone; the inverse
    /// of [`parse`](Self::parse).
    pub fn join(&self, syllable: &Syllable, notation: Notation) -> Result<String> {
        let segments = [&syllable.initial, &syllable.medial, &syllable.nucleus, &syllable.coda].map(String::clone);
        let spelling = self.converter.spell(&segments, notation)?;
        Ok(format!("{spelling}{}", syllable.tone))
    }

    /// Write `value` (given in `from`) in notation `to` with tones in
    /// `tone_notation`.
    ///
    /// A body missing from the conversion table is kept as written; tone
    /// rendering still applies.
    pub fn show(&self, value: &str, to: Notation, tone_notation: ToneNotation, from: Notation) -> Result<String> {
        if tone_notation == ToneNotation::Diacritic && to != Notation::Pinyin {
            return Err(Error::Misuse(format!("diacritic tone notation is only defined for pinyin, not {}", to.key())));
        }

        let (stem, tone) = self.tones.parse(value);
        let body = if to == from {
            stem
        } else {
            match self.converter.convert(&stem, from, to) {
                Ok(converted) => converted.into_owned(),
                Err(err) => {
                    log::warn!("{}: showing `{stem}` unconverted: {err}", self.dialect());
                    stem
                }
            }
        };

        self.tones.render(&body, &tone, tone_notation, to)
    }

    /// Sort key: rank of the initial, ranks of the final fields in `ordering`,
    /// then the tone number.
    pub fn sort_key(&self, value: &str, notation: Notation, ordering: &FinalOrdering) -> Result<Vec<usize>> {
        let syllable = self.parse(value, notation)?;
        let mut key = Vec::with_capacity(5);
        key.push(self.categories.rank(Part::Initial, &syllable.initial));
        key.extend(ordering.parts().iter().map(|&part| self.categories.rank(part, syllable.get(part))));
        key.push(syllable.tone.parse().unwrap_or(usize::MAX));
        Ok(key)
    }

    /// Total order over syllable strings. Values that do not parse sort after
    /// all others, by their text.
    pub fn comparer(&self, notation: Notation, ordering: FinalOrdering) -> impl Fn(&str, &str) -> Ordering + '_ {
        move |a: &str, b: &str| {
            let (ka, kb) = (self.sort_key(a, notation, &ordering).ok(), self.sort_key(b, notation, &ordering).ok());
            match (ka, kb) {
                (Some(ka), Some(kb)) => ka.cmp(&kb).then_with(|| a.cmp(b)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.cmp(b),
            }
        }
    }
}
