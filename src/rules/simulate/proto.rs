use crate::mc::McInfo;
use crate::rules::helpers::{replace_first, swap_prefix, swap_suffix, tail};

/// Proto-form rewrites to apply. Field names follow the sound change they
/// reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtoSettings {
    /// 閉口韻尾: restore labial codas in 深咸.
    pub closed_coda: bool,
    /// 尖團: keep dental sibilants apart from palatals.
    pub sharp_round: bool,
    /// 陽去: split the yang departing tone from the yang level.
    pub yang_qu: bool,
    /// 泥來: keep 泥 apart from 來.
    pub n_l: bool,
    /// 疑影: drop the velar nasal of 影.
    pub ng_zero: bool,
    /// 前後鼻音: velar codas in 梗曾.
    pub front_back_nasal: bool,
}

impl Default for ProtoSettings {
    fn default() -> Self {
        ProtoSettings {
            closed_coda: true,
            sharp_round: true,
            yang_qu: true,
            n_l: true,
            ng_zero: true,
            front_back_nasal: false,
        }
    }
}

struct Step {
    name: &'static str,
    /// `None` for steps that always run.
    enabled: Option<fn(&ProtoSettings) -> bool>,
    applies: fn(&McInfo, &str) -> bool,
    rewrite: fn(&str) -> Option<String>,
}

const CLOSED_CODAS: [(&str, &str); 3] = [("n", "m"), ("t", "p"), ("t̚", "p̚")];
const SHARP_INITIALS: [(&str, &str); 3] = [("tɕ", "ts"), ("t͡ɕ", "t͡s"), ("ɕ", "s")];
const YANG_QU_TONES: [(&str, &str); 2] = [("²²", "¹¹"), ("˨", "˩")];

fn labial_onset(pron: &str) -> bool {
    pron.starts_with(['p', 'm', 'f'])
}

fn listed(field: &str, allowed: &str) -> bool {
    !field.is_empty() && allowed.contains(field)
}

static STEPS: [Step; 7] = [
    Step {
        name: "閉口韻尾",
        enabled: Some(|s| s.closed_coda),
        applies: |mc, pron| listed(&mc.rhyme_group, "深咸") && !labial_onset(pron),
        rewrite: |pron| {
            let onset: String = pron.chars().take(1).collect();
            let rest = tail(pron, 1);
            CLOSED_CODAS.iter().find_map(|(new, proto)| replace_first(rest, new, proto)).map(|rest| onset + &rest)
        },
    },
    Step {
        name: "尖團",
        enabled: Some(|s| s.sharp_round),
        applies: |mc, pron| !mc.group.is_empty() && !"見影".contains(mc.group.as_str()) && pron.contains('i'),
        rewrite: |pron| SHARP_INITIALS.iter().find_map(|(new, proto)| swap_prefix(pron, new, proto)),
    },
    Step {
        name: "陽去",
        enabled: Some(|s| s.yang_qu),
        applies: |mc, _| mc.voicing.contains('濁') && listed(&mc.tone, "上去"),
        rewrite: |pron| YANG_QU_TONES.iter().find_map(|(new, proto)| swap_suffix(pron, new, proto)),
    },
    Step {
        name: "泥來",
        enabled: Some(|s| s.n_l),
        applies: |mc, _| mc.initial == "泥",
        rewrite: |pron| swap_prefix(pron, "l", "n"),
    },
    Step {
        name: "疑影",
        enabled: Some(|s| s.ng_zero),
        applies: |mc, _| mc.initial == "影",
        rewrite: |pron| pron.strip_prefix('ŋ').map(String::from),
    },
    Step {
        name: "前後鼻音",
        enabled: Some(|s| s.front_back_nasal),
        applies: |mc, _| listed(&mc.rhyme_group, "梗曾"),
        rewrite: |pron| {
            let out = replace_first(pron, "ɛn", "ɛŋ").unwrap_or_else(|| pron.to_string());
            Some(replace_first(&out, "in", "iŋ").unwrap_or(out))
        },
    },
    Step {
        name: "日止遇 → ɵ",
        enabled: None,
        applies: |mc, _| mc.initial == "日" && listed(&mc.rhyme_group, "止遇"),
        rewrite: |pron| Some(format!("ɵ{}", tail(pron, 1))),
    },
];

/// Rewrite a phonetic reading into its proto-form. Without a classification
/// the reading is returned unchanged.
pub fn simulate_proto(pronunciation: &str, mc: Option<&McInfo>, settings: &ProtoSettings) -> String {
    let Some(mc) = mc else {
        return pronunciation.to_string();
    };
    let mut current = pronunciation.to_string();
    for step in &STEPS {
        if step.enabled.is_some_and(|enabled| !enabled(settings)) || !(step.applies)(mc, &current) {
            continue;
        }
        if let Some(next) = (step.rewrite)(&current) {
            log::trace!("proto `{}`: {current} → {next}", step.name);
            current = next;
        }
    }
    current
}
