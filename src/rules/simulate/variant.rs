use unicode_normalization::UnicodeNormalization;

use crate::mc::McInfo;
use crate::rules::helpers::replace_first;

/// Regional variants to show. Each flag names the variant pronunciation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantSettings {
    /// ɥon: `yon`/`yot` read with a front vowel.
    pub yon: bool,
    /// jau: `iau` read `ieu`.
    pub jau: bool,
    /// jo: `io` read `yo`.
    pub jo: bool,
    /// kɛ: velars before `e` palatalized.
    pub ke: bool,
    /// tsɛ: dental sibilants before `e` palatalized in 魚虞.
    pub tse: bool,
    /// y: 魚虞 `i` read `y`.
    pub y: bool,
    /// ən: `ɛn` centralized outside 咸山.
    pub schwa_n: bool,
    /// fɿn: `un`/`ut` after labials read with `ɨ`.
    pub labial_apical: bool,
}

fn yu_rhyme(mc: Option<&McInfo>) -> bool {
    mc.is_some_and(|mc| mc.rhyme == "魚" || mc.rhyme == "虞")
}

fn respell(pron: &str, re: &regex::Regex, with: &str) -> String {
    re.replace(pron, with).into_owned()
}

/// Variant respelling of a romanized reading with ordinal tone.
pub fn simulate_variant_pre(pronunciation: &str, mc: Option<&McInfo>, settings: &VariantSettings) -> String {
    let mut pron = pronunciation.to_string();

    if settings.yon {
        pron = respell(&pron, regex!(r"yo([nt])(\d?)$"), "ye${1}${2}");
    }
    if settings.jau {
        pron = respell(&pron, regex!(r"iau(\d?)$"), "ieu${1}");
    }
    if settings.jo {
        pron = respell(&pron, regex!(r"io(\d?)$"), "yo${1}");
    }
    if settings.ke {
        pron = respell(&pron, regex!(r"ge(\d?)$"), "jie${1}");
        pron = respell(&pron, regex!(r"ke(\d?)$"), "qie${1}");
    }
    if settings.tse && yu_rhyme(mc) {
        pron = respell(&pron, regex!(r"ze(\d?)$"), "jie${1}");
        pron = respell(&pron, regex!(r"ce(\d?)$"), "qie${1}");
        pron = respell(&pron, regex!(r"se(\d?)$"), "xie${1}");
    }
    if settings.y && yu_rhyme(mc) {
        pron = respell(&pron, regex!(r"i(\d?)$"), "y${1}");
    }

    if pron != pronunciation {
        log::trace!("variant pre-pass: {pronunciation} → {pron}");
    }
    pron
}

/// Variant respelling of a phonetic reading.
pub fn simulate_variant_post(pronunciation: &str, mc: Option<&McInfo>, settings: &VariantSettings) -> String {
    let mut pron = pronunciation.to_string();
    let labial = pron.starts_with(['p', 'm', 'f']);

    if settings.schwa_n && !labial && mc.is_some_and(|mc| mc.rhyme_group != "咸" && mc.rhyme_group != "山") {
        pron = replace_first(&pron, "ɛn", "ən").unwrap_or(pron);
    }
    if settings.labial_apical && labial {
        let decomposed: String = pron.nfd().collect();
        pron = replace_first(&decomposed, "ut", "ɨt").unwrap_or(decomposed).nfc().collect();
        pron = replace_first(&pron, "un", "ɨn").unwrap_or(pron);
    }

    if pron != pronunciation {
        log::trace!("variant post-pass: {pronunciation} → {pron}");
    }
    pron
}
