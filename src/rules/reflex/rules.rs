use crate::mc::Category;
use crate::rules::helpers::{drop_last, replace_first, swap_prefix, swap_suffix, tail};
use crate::rules::reflex::predicates::{only_yi, outside_tong, xie_one_merges};
use crate::{Guard, Rule};

/// 梗攝 vernacular finals.
const GENG_FINALS: [(&str, &str); 6] =
    [("en", "ang"), ("eh", "ah"), ("in", "iang"), ("ih", "iah"), ("iung", "iang"), ("iuh", "iah")];

/// 知三 and 章 initials.
const ZHI_ZHANG: &str = "知徹澄章昌常書船";

// --- Vernacular layer (白) ----------------------------------------------------

/// Aspirated and voiced dental stops lenite to `h` before non-high vowels.
fn rule_dental_lenition() -> Rule {
    rule! {
        name: "透定 → h",
        layer: Vernacular,
        guard: [Guard::AnyInitial(initials!("透定"))],
        rewrite: |_cat: &Category, pron: &str| -> Option<String> {
            let second = pron.chars().nth(1)?;
            (!"iu".contains(second) || pron.ends_with("ui")).then(|| format!("h{}", tail(pron, 1)))
        },
    }
}

/// 匣 `f` is a rounded glide outside 通攝.
fn rule_xia_rounded() -> Rule {
    rule! {
        name: "匣 f → u",
        layer: Vernacular,
        guard: [Guard::AnyInitial(initials!("匣")), Guard::Predicate(outside_tong)],
        rewrite: |_cat: &Category, pron: &str| -> Option<String> {
            let out = swap_prefix(pron, "f", "u")?;
            Some(swap_prefix(&out, "uu", "u").unwrap_or(out))
        },
    }
}

fn rule_xia_geng_closed() -> Rule {
    rule! {
        name: "匣梗合 x 脫落",
        layer: Vernacular,
        guard: [
            Guard::AnyInitial(initials!("匣")),
            Guard::RhymeGroup("梗"),
            Guard::Rounding("合"),
        ],
        rewrite: |_cat: &Category, pron: &str| -> Option<String> {
            pron.strip_prefix('x').map(String::from)
        },
    }
}

fn rule_ri_vernacular() -> Rule {
    rule! {
        name: "日 白讀",
        layer: Vernacular,
        guard: [Guard::AnyInitial(initials!("日"))],
        rewrite: exact!(
            ("leu", "niau"),
            ("len", "nien"),
            ("let", "niet"),
            ("ien", "nien"),
            ("iet", "niet"),
            ("long", "niong"),
            ("loh", "nioh"),
            ("iung", "niung"),
            ("iuh", "niuh"),
        ),
    }
}

/// 梗攝 vernacular `a` finals; 知三章 lose the medial.
fn rule_geng_vernacular() -> Rule {
    rule! {
        name: "梗 白讀",
        layer: Vernacular,
        guard: [Guard::RhymeGroup("梗")],
        rewrite: |cat: &Category, pron: &str| -> Option<String> {
            let (key, mut value) = GENG_FINALS.iter().copied().find(|(key, _)| pron.ends_with(key))?;
            let mut stem = drop_last(pron, key.chars().count()).to_string();
            if cat.only(initials!(ZHI_ZHANG)) && value.starts_with('i') {
                value = tail(value, 1);
                if let Some(rest) = stem.strip_prefix('x') {
                    stem = format!("s{rest}");
                }
            }
            let out = format!("{stem}{value}");
            Some(swap_prefix(&out, "ngi", "ni").unwrap_or(out))
        },
    }
}

fn rule_yu_vernacular() -> Rule {
    rule! {
        name: "魚 白讀",
        layer: Vernacular,
        guard: [Guard::Rhyme("魚")],
        rewrite: |cat: &Category, pron: &str| -> Option<String> {
            let mut out = pron.to_string();
            if ["ni", "di", "i"].contains(&pron) {
                out.push('e');
            }
            if let Some(head) = out.strip_suffix('u') {
                out = format!("{head}e");
            }
            let dental = cat.has_any(initials!("精清從心邪"));
            let onset = [("ji", "z", "g"), ("qi", "c", "k"), ("xi", "s", "h")]
                .iter()
                .find(|(key, _, _)| out.starts_with(key))
                .map(|&(_, dental_onset, velar_onset)| if dental { dental_onset } else { velar_onset });
            if let Some(onset) = onset {
                out = format!("{onset}e");
            }
            Some(out)
        },
    }
}

fn rule_yi_mo() -> Rule {
    rule! {
        name: "疑模 → ng",
        layer: Vernacular,
        guard: [Guard::AnyInitial(initials!("疑")), Guard::Rhyme("模")],
        rewrite: |_cat: &Category, _pron: &str| -> Option<String> { Some("ng".to_string()) },
    }
}

fn rule_xie_one() -> Rule {
    rule! {
        name: "蟹一 → oi",
        layer: Vernacular,
        guard: [Guard::RhymeGroup("蟹"), Guard::Grade("一"), Guard::Predicate(xie_one_merges)],
        rewrite: |_cat: &Category, pron: &str| -> Option<String> {
            let head = drop_last(pron, if pron.ends_with("ui") { 2 } else { 1 });
            Some(if head.is_empty() { "uoi".to_string() } else { format!("{head}oi") })
        },
    }
}

// --- Recent layer (新) --------------------------------------------------------

fn rule_zhi_zhang_initials() -> Rule {
    rule! {
        name: "知三章 聲母",
        layer: Recent,
        guard: [Guard::AnyInitial(initials!(ZHI_ZHANG))],
        rewrite: prefix!(("d", "z"), ("t", "c"), ("x", "s")),
    }
}

fn rule_ri_yu() -> Rule {
    rule! {
        name: "日遇 e → lu",
        layer: Recent,
        guard: [Guard::AnyInitial(initials!("日")), Guard::RhymeGroup("遇")],
        rewrite: exact!(("e", "lu")),
    }
}

fn rule_ri_recent() -> Rule {
    rule! {
        name: "日 新派",
        layer: Recent,
        guard: [Guard::AnyInitial(initials!("日"))],
        rewrite: exact!(
            ("in", "len"),
            ("iu", "leu"),
            ("ien", "lan"),
            ("iet", "let"),
            ("iung", "lung"),
            ("iuh", "luh"),
            ("nia", "le"),
            ("nin", "len"),
            ("nit", "lit"),
            ("nyon", "lon"),
            ("nyot", "lot"),
            ("leu", "lau"),
            ("len", "lan"),
        ),
    }
}

fn rule_zhi_zhang_xiao() -> Rule {
    rule! {
        name: "知三章 效 eu → au",
        layer: Recent,
        guard: [Guard::AnyInitial(initials!(ZHI_ZHANG)), Guard::RhymeGroup("效")],
        rewrite: suffix!(("eu", "au")),
    }
}

fn rule_zhi_zhang_iu() -> Rule {
    rule! {
        name: "知三章 iu → eu",
        layer: Recent,
        guard: [Guard::AnyInitial(initials!(ZHI_ZHANG))],
        rewrite: suffix!(("iu", "eu")),
    }
}

fn rule_zhi_zhang_en() -> Rule {
    rule! {
        name: "知三章 en → an",
        layer: Recent,
        guard: [Guard::AnyInitial(initials!(ZHI_ZHANG))],
        rewrite: suffix!(("en", "an")),
    }
}

fn rule_zhi_zhang_in() -> Rule {
    rule! {
        name: "知三章 in → en",
        layer: Recent,
        guard: [Guard::AnyInitial(initials!(ZHI_ZHANG))],
        rewrite: suffix!(("in", "en")),
    }
}

/// 疑 before front vowels loses its nasal onset.
fn rule_yi_front() -> Rule {
    rule! {
        name: "疑細 n 脫落",
        layer: Recent,
        guard: [Guard::AnyInitial(initials!("疑"))],
        rewrite: |_cat: &Category, pron: &str| -> Option<String> {
            (pron.starts_with('n') && !pron.starts_with("ng")).then(|| tail(pron, 1).to_string())
        },
    }
}

fn rule_ma_three() -> Rule {
    rule! {
        name: "麻三 → e",
        layer: Recent,
        guard: [Guard::Rhyme("麻"), Guard::Grade("三")],
        rewrite: |_cat: &Category, pron: &str| -> Option<String> { Some(format!("{}e", drop_last(pron, 1))) },
    }
}

fn rule_tong_three_lateral() -> Rule {
    rule! {
        name: "通三 ni/di → l",
        layer: Recent,
        guard: [Guard::RhymeGroup("通"), Guard::Grade("三")],
        rewrite: |cat: &Category, pron: &str| -> Option<String> {
            if only_yi(cat) {
                return None;
            }
            ["ni", "di"].iter().find_map(|key| swap_prefix(pron, key, "l"))
        },
    }
}

fn rule_tong_three_affricate() -> Rule {
    rule! {
        name: "通三 ji/qi 去齶化",
        layer: Recent,
        guard: [Guard::RhymeGroup("通"), Guard::Grade("三")],
        rewrite: |cat: &Category, pron: &str| -> Option<String> {
            let dental = cat.has_any(initials!("精清從"));
            [("ji", "z", "g"), ("qi", "c", "k")].iter().find_map(|&(key, dental_onset, velar_onset)| {
                swap_prefix(pron, key, if dental { dental_onset } else { velar_onset })
            })
        },
    }
}

fn rule_tong_three_sibilant() -> Rule {
    rule! {
        name: "通三 心邪 xi → s",
        layer: Recent,
        guard: [Guard::RhymeGroup("通"), Guard::Grade("三"), Guard::AnyInitial(initials!("心邪"))],
        rewrite: prefix!(("xi", "s")),
    }
}

fn rule_geng_zeng_labial() -> Rule {
    rule! {
        name: "梗曾一二 幫組",
        layer: Recent,
        guard: [Guard::RhymeGroup("梗曾"), Guard::Grade("一二"), Guard::AnyInitial(initials!("幫滂並明"))],
        rewrite: suffix!(("en", "ung"), ("eh", "oh")),
    }
}

fn rule_geng_zeng_laryngeal() -> Rule {
    rule! {
        name: "梗曾一二 曉匣",
        layer: Recent,
        guard: [Guard::RhymeGroup("梗曾"), Guard::Grade("一二"), Guard::AnyInitial(initials!("曉匣"))],
        rewrite: exact!(("hen", "xin")),
    }
}

fn rule_geng_zeng_zero() -> Rule {
    rule! {
        name: "梗曾一二 疑影",
        layer: Recent,
        guard: [Guard::RhymeGroup("梗曾"), Guard::Grade("一二"), Guard::AnyInitial(initials!("疑影"))],
        rewrite: exact!(("ngen", "in"), ("ngeh", "ngoh")),
    }
}

fn rule_geng_zeng_closed_velar() -> Rule {
    rule! {
        name: "梗曾一二合 牙喉",
        layer: Recent,
        guard: [
            Guard::RhymeGroup("梗曾"),
            Guard::Grade("一二"),
            Guard::Rounding("合"),
            Guard::AnyInitial(initials!("見溪羣疑曉匣")),
        ],
        rewrite: |_cat: &Category, pron: &str| -> Option<String> {
            let out = swap_suffix(pron, "en", "ung")?;
            Some(replace_first(&out, "uu", "u").unwrap_or(out))
        },
    }
}

fn rule_geng_three_closed() -> Rule {
    rule! {
        name: "梗三四合 iung → in",
        layer: Recent,
        guard: [Guard::RhymeGroup("梗"), Guard::Grade("三四"), Guard::Rounding("合")],
        rewrite: suffix!(("iung", "in")),
    }
}

fn rule_zhuang_zhi_closed() -> Rule {
    rule! {
        name: "莊組止合 ai → oi",
        layer: Recent,
        guard: [
            Guard::AnyInitial(initials!("莊初崇生俟")),
            Guard::RhymeGroup("止"),
            Guard::Rounding("合"),
        ],
        rewrite: suffix!(("ai", "oi")),
    }
}

fn rule_lai_dyn() -> Rule {
    rule! {
        name: "來 dyn → lun",
        layer: Recent,
        guard: [Guard::AnyInitial(initials!("來"))],
        rewrite: exact!(("dyn", "lun")),
    }
}

/// Rules of both layers, each layer in application order.
pub fn get() -> Vec<Rule> {
    vec![
        rule_dental_lenition(),
        rule_xia_rounded(),
        rule_xia_geng_closed(),
        rule_ri_vernacular(),
        rule_geng_vernacular(),
        rule_yu_vernacular(),
        rule_yi_mo(),
        rule_xie_one(),
        rule_zhi_zhang_initials(),
        rule_ri_yu(),
        rule_ri_recent(),
        rule_zhi_zhang_xiao(),
        rule_zhi_zhang_iu(),
        rule_zhi_zhang_en(),
        rule_zhi_zhang_in(),
        rule_yi_front(),
        rule_ma_three(),
        rule_tong_three_lateral(),
        rule_tong_three_affricate(),
        rule_tong_three_sibilant(),
        rule_geng_zeng_labial(),
        rule_geng_zeng_laryngeal(),
        rule_geng_zeng_zero(),
        rule_geng_zeng_closed_velar(),
        rule_geng_three_closed(),
        rule_zhuang_zhi_closed(),
        rule_lai_dyn(),
    ]
}
