use unicode_normalization::UnicodeNormalization;

use crate::{Dialect, Notation};

const VOWELS: &str = "iyɨʉɯuɪʏʊeøɘɵɤoəɛœɜɞʌɔæɐaɶɑɒɿʅɚɥʮʯ";
const TONE_CHARS: &str = "0123456789⁰¹²³⁴⁵⁶⁷⁸⁹˥˦˧˨˩";

fn starts_final(c: char, position: usize, notation: Notation, dialect: Dialect) -> bool {
    let pinyin = notation == Notation::Pinyin;
    if c == 'y' && pinyin && (dialect == Dialect::Pm || (dialect == Dialect::Sw && position == 0)) {
        // Pinyin `y` is a spelling of the medial in these romanizations.
        return false;
    }
    VOWELS.contains(c) || (!pinyin && (c == 'j' || c == 'w')) || (pinyin && c == 'w' && dialect == Dialect::Gc)
}

/// Split a syllable string into initial, final and tone text, without any
/// table lookup.
///
/// The final starts at the first vowel (glides `j`/`w` count in IPA; in
/// Cantonese romanization `w` does too) and the tone at the first tone digit
/// or tone letter after it.
pub fn separate(value: &str, notation: Notation, dialect: Dialect) -> (String, String, Option<String>) {
    let chars: Vec<char> = value.nfd().collect();

    let start = chars
        .iter()
        .enumerate()
        .position(|(i, &c)| starts_final(c, i, notation, dialect))
        .unwrap_or(chars.len());
    let tone = chars[start..].iter().position(|&c| TONE_CHARS.contains(c)).map_or(chars.len(), |p| start + p);

    let text = |range: &[char]| range.iter().collect::<String>().nfc().collect::<String>();
    let tone_text = (tone < chars.len()).then(|| text(&chars[tone..]));
    (text(&chars[..start]), text(&chars[start..tone]), tone_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::separate as split;

    #[test]
    fn splits_at_first_vowel_and_tone() {
        assert_eq!(split("tan1", Notation::Pinyin, Dialect::Fg), ("t".into(), "an".into(), Some("1".into())));
        assert_eq!(split("tʰan˧˨", Notation::IpaRaw, Dialect::Fg), ("tʰ".into(), "an".into(), Some("˧˨".into())));
        assert_eq!(split("ng", Notation::Pinyin, Dialect::Fg), ("ng".into(), "".into(), None));
    }

    #[test]
    fn glides_count_as_vowels_in_ipa_only() {
        assert_eq!(split("tɕʰjaʔ", Notation::IpaRaw, Dialect::Fg).0, "tɕʰ");
        assert_eq!(split("wa1", Notation::Pinyin, Dialect::Fg).0, "w");
        assert_eq!(split("wa1", Notation::Pinyin, Dialect::Gc).0, "");
    }

    #[test]
    fn pinyin_y_depends_on_dialect() {
        assert_eq!(split("yan2", Notation::Pinyin, Dialect::Pm), ("y".into(), "an".into(), Some("2".into())));
        assert_eq!(split("yan2", Notation::Pinyin, Dialect::Fg).0, "");
        assert_eq!(split("yu1", Notation::Pinyin, Dialect::Sw).0, "y");
        assert_eq!(split("ny1", Notation::Pinyin, Dialect::Sw).0, "n");
    }

    #[test]
    fn composed_vowels_are_recomposed_in_output() {
        assert_eq!(split("xüe2", Notation::Pinyin, Dialect::Pm).1, "üe");
        assert_eq!(split("tán", Notation::Pinyin, Dialect::Pm).1, "án");
    }
}
