use std::collections::BTreeMap;

use crate::engine;
use crate::mc::{Catalog, McInfo, StrataTable};
use crate::{
    DataVersion, Dialect, Dictionary, Inventory, Notation, PartsCodec, PerDialect, ProtoSettings, Result,
    SyllableCodec, ToneNotation, VariantSettings, simulate_proto, simulate_variant_post, simulate_variant_pre,
};

/// Loaded phonology data: per-dialect codecs, the MC catalog and its strata.
///
/// Built once by [`PhonologyStore::load`](crate::PhonologyStore::load) and
/// immutable afterwards.
#[derive(Debug)]
pub struct Phonology {
    version: Option<DataVersion>,
    syllables: PerDialect<SyllableCodec>,
    parts: PerDialect<PartsCodec>,
    catalog: Catalog,
    strata: PerDialect<StrataTable>,
}

impl Phonology {
    pub(crate) fn new(
        version: Option<DataVersion>,
        syllables: PerDialect<SyllableCodec>,
        parts: PerDialect<PartsCodec>,
        catalog: Catalog,
        strata: PerDialect<StrataTable>,
    ) -> Self {
        Phonology { version, syllables, parts, catalog, strata }
    }

    pub fn version(&self) -> Option<DataVersion> {
        self.version
    }

    pub fn syllable(&self, dialect: Dialect) -> &SyllableCodec {
        &self.syllables[dialect]
    }

    pub fn parts(&self, dialect: Dialect) -> &PartsCodec {
        &self.parts[dialect]
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn strata(&self, dialect: Dialect) -> &StrataTable {
        &self.strata[dialect]
    }

    /// Readings of catalog entry `index` in `dialect`, default first.
    pub fn reflex_map(&self, index: usize, dialect: Dialect) -> Result<Vec<(String, String)>> {
        self.strata[dialect].reflex_map(&self.catalog, index, dialect)
    }

    /// Predicted stratum readings that differ from the default reflex.
    pub fn derive_strata(&self, dialect: Dialect) -> BTreeMap<usize, Vec<(String, String)>> {
        engine::derive_strata(&self.catalog, dialect)
    }

    pub fn inventory(&self, dictionary: &Dictionary) -> Inventory {
        Inventory::new(dictionary, self.syllable(dictionary.dialect()))
    }

    /// [`display`] with the codec of `dialect`.
    pub fn display(
        &self,
        dialect: Dialect,
        pronunciation: &str,
        notation: Notation,
        source: Notation,
        mc: Option<&McInfo>,
        options: &DisplayOptions,
    ) -> String {
        display(self.syllable(dialect), pronunciation, notation, source, mc, options)
    }
}

/// Presentation preferences for [`display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Tone notation of romanized output in dialects with tone diacritics.
    pub pinyin_tone_notation: ToneNotation,
    /// Tone notation of phonetic output.
    pub ipa_tone_notation: ToneNotation,
    /// Overrides both of the above.
    pub tone_notation: Option<ToneNotation>,
    pub variant: bool,
    pub variant_settings: VariantSettings,
    pub proto: bool,
    pub proto_settings: ProtoSettings,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            pinyin_tone_notation: ToneNotation::Diacritic,
            ipa_tone_notation: ToneNotation::Letter,
            tone_notation: None,
            variant: true,
            variant_settings: VariantSettings::default(),
            proto: false,
            proto_settings: ProtoSettings::default(),
        }
    }
}

impl DisplayOptions {
    fn tone_notation_for(&self, dialect: Dialect, notation: Notation) -> ToneNotation {
        if let Some(explicit) = self.tone_notation {
            return explicit;
        }
        match notation {
            Notation::Pinyin if !self.proto => match dialect {
                Dialect::Fg | Dialect::Pm => self.pinyin_tone_notation,
                _ => ToneNotation::Ordinal,
            },
            _ => self.ipa_tone_notation,
        }
    }
}

/// Render `pronunciation` (written in `source`) in `notation`.
///
/// FG readings go through the variant and proto simulators: the variant
/// pre-pass works on the romanization, the post-pass on phonetic output, and
/// proto forms are always phonetic. Other dialects are only converted.
///
/// Never fails: on any error the input is returned as given.
pub fn display(
    codec: &SyllableCodec,
    pronunciation: &str,
    notation: Notation,
    source: Notation,
    mc: Option<&McInfo>,
    options: &DisplayOptions,
) -> String {
    match try_display(codec, pronunciation, notation, source, mc, options) {
        Ok(shown) => shown,
        Err(err) => {
            log::warn!("showing {} `{pronunciation}` as {}: {err}", codec.dialect(), notation.key());
            pronunciation.to_string()
        }
    }
}

fn try_display(
    codec: &SyllableCodec,
    pronunciation: &str,
    notation: Notation,
    source: Notation,
    mc: Option<&McInfo>,
    options: &DisplayOptions,
) -> Result<String> {
    let tone_notation = options.tone_notation_for(codec.dialect(), notation);
    if codec.dialect() != Dialect::Fg {
        return codec.show(pronunciation, notation, tone_notation, source);
    }

    let mut shown = codec.show(pronunciation, Notation::Pinyin, ToneNotation::Ordinal, source)?;
    if options.variant {
        shown = simulate_variant_pre(&shown, mc, &options.variant_settings);
    }

    let notation = match notation {
        Notation::IpaRaw => Notation::IpaRaw,
        _ if options.proto => Notation::IpaStrict,
        other => other,
    };
    shown = codec.show(&shown, notation, tone_notation, Notation::Pinyin)?;

    if options.variant && notation != Notation::Pinyin {
        shown = simulate_variant_post(&shown, mc, &options.variant_settings);
    }
    if options.proto {
        shown = simulate_proto(&shown, mc, &options.proto_settings);
    }
    Ok(shown)
}
