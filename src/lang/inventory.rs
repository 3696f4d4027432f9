use std::collections::HashSet;

use super::dictionary::Dictionary;
use crate::{Notation, Part, PartValue, Syllable, SyllableCodec};

/// Phonological inventory of a dialect: the syllables its dictionary attests.
#[derive(Debug, Clone)]
pub struct Inventory {
    syllables: Vec<Syllable>,
}

impl Inventory {
    /// Parse every distinct pronunciation of `dictionary`. Pronunciations the
    /// codec cannot parse are skipped.
    pub fn new(dictionary: &Dictionary, codec: &SyllableCodec) -> Self {
        let mut seen = HashSet::new();
        let mut syllables = Vec::new();
        for (_, entry) in dictionary.iter() {
            let Some(pronunciation) = entry.pronunciation() else {
                continue;
            };
            if !seen.insert(pronunciation) {
                continue;
            }
            match codec.parse(pronunciation, Notation::Pinyin) {
                Ok(syllable) => syllables.push(syllable),
                Err(err) => log::debug!("{} inventory skips `{pronunciation}`: {err}", dictionary.dialect()),
            }
        }
        Inventory { syllables }
    }

    pub fn syllables(&self) -> &[Syllable] {
        &self.syllables
    }

    /// Distinct values of `part`, in order of first appearance.
    pub fn values(&self, part: Part) -> Vec<PartValue> {
        let mut seen = HashSet::new();
        self.syllables
            .iter()
            .map(|syllable| PartValue::extract(syllable, part))
            .filter(|value| seen.insert(value.clone()))
            .collect()
    }
}
