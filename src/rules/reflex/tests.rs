use crate::mc::{Catalog, Category, FinalClass, RawMcEntry};
use crate::{Dialect, Initials, Layer, Predictor, ReflexOptions, derive_strata};

fn cat(initials: &str, full_final: &str) -> Category {
    Category::new(Initials::parse(initials), FinalClass::parse(full_final))
}

fn check(layer: Layer, cases: &[(&str, &str, &str, &str)]) {
    let fg = Predictor::for_dialect(Dialect::Fg);
    for &(initials, full_final, input, expected) in cases {
        let got = fg.predict_stratum(&cat(initials, full_final), input, layer);
        assert_eq!(got, expected, "{layer:?} {initials} {full_final} {input}");
    }
}

#[test]
fn vernacular_examples() {
    // (initials, final, baseline, expected)
    let cases = [
        ("透", "山寒一開", "tan", "han"),
        ("定", "止脂三合", "tui", "hui"),
        ("透", "止脂三開", "ti", "ti"),
        ("匣", "假麻二合", "fa", "ua"),
        ("匣", "遇模一合", "fu", "u"),
        ("匣", "通東一", "fung", "fung"),
        ("匣", "梗庚二合", "xuang", "uang"),
        ("日", "臻眞三開", "len", "nien"),
        ("幫", "梗庚二開", "pen", "pang"),
        ("章", "梗清三開", "zin", "zang"),
        ("書", "梗清三開", "xin", "sang"),
        ("疑", "梗庚三開", "ngin", "niang"),
        ("泥", "遇魚三開", "ni", "nie"),
        ("見", "遇魚三開", "jiu", "ge"),
        ("心", "遇魚三開", "xiu", "se"),
        ("疑", "遇模一合", "u", "ng"),
        ("幫", "蟹灰一合", "pui", "poi"),
        ("見", "蟹灰一合", "kui", "kui"),
        ("影", "蟹灰一合", "ui", "uoi"),
    ];
    check(Layer::Vernacular, &cases);
}

#[test]
fn recent_examples() {
    let cases = [
        ("知", "臻眞三開", "tin", "cen"),
        ("章", "效宵三開", "deu", "zau"),
        ("章", "流尤三開", "diu", "zeu"),
        ("日", "臻眞三開", "in", "len"),
        ("日", "山仙三開", "ien", "lan"),
        ("日", "遇虞三合", "e", "lu"),
        ("疑", "假麻三開", "nia", "ie"),
        ("疑", "果歌一開", "ngo", "ngo"),
        ("精", "假麻三開", "jia", "jie"),
        ("泥", "通鍾三", "niung", "lung"),
        ("精", "通鍾三", "jiung", "zung"),
        ("見", "通鍾三", "jiung", "gung"),
        ("心", "通鍾三", "xiung", "sung"),
        ("幫", "曾登一開", "pen", "pung"),
        ("明", "梗耕二開", "meh", "moh"),
        ("曉", "梗庚二開", "hen", "xin"),
        ("影", "梗耕二開", "ngen", "in"),
        ("見", "梗庚二合", "kuen", "kung"),
        ("曉", "梗清三合", "xiung", "xin"),
        ("生", "止脂三合", "sai", "soi"),
        ("來", "山仙三合", "dyn", "lun"),
    ];
    check(Layer::Recent, &cases);
}

#[test]
fn unmatched_categories_pass_through() {
    let fg = Predictor::for_dialect(Dialect::Fg);
    let plain = cat("端", "通東一");
    for layer in Layer::ALL {
        assert_eq!(fg.predict_stratum(&plain, "tung", layer), "tung");
    }
    assert_eq!(fg.predict_stratum(&Category::default(), "a", Layer::Vernacular), "a");

    let pm = Predictor::for_dialect(Dialect::Pm);
    assert_eq!(pm.rule_count(), 0);
    assert_eq!(pm.predict_stratum(&cat("透", "山寒一開"), "tan", Layer::Vernacular), "tan");
}

#[test]
fn reflexes_reattach_tone() {
    let fg = Predictor::for_dialect(Dialect::Fg);
    let reflexes = fg.get_reflexes(&cat("透", "山寒一開"), "tan1", ReflexOptions::default());
    assert_eq!(reflexes.into_array(), ["tan1", "han1", "tan1"]);

    // Already lenited baselines stay put with their tone.
    let reflexes = fg.get_reflexes(&cat("透", "山寒一開"), "han1", ReflexOptions::default());
    assert!(reflexes.vernacular.starts_with('h'));
    assert!(reflexes.vernacular.ends_with('1'));
}

#[test]
fn only_the_last_digit_is_a_tone() {
    assert_eq!(Predictor::split_tone("tan1"), ("tan", "1"));
    assert_eq!(Predictor::split_tone("tan12"), ("tan1", "2"));
    assert_eq!(Predictor::split_tone("tan"), ("tan", ""));
    assert_eq!(Predictor::split_tone(""), ("", ""));

    // Traced layers run on the same body the readings are built from.
    let fg = Predictor::for_dialect(Dialect::Fg);
    let category = cat("透", "山寒一開");
    let reflexes = fg.get_reflexes(&category, "tan12", ReflexOptions::default());
    assert_eq!(reflexes.default, "tan12");
    let (body, tone) = Predictor::split_tone("tan12");
    for layer in [Layer::Vernacular, Layer::Recent] {
        let run = fg.predict_with_trace(&category, body, layer);
        assert_eq!(format!("{}{tone}", run.output), reflexes.get(layer));
    }
}

#[test]
fn sonorant_entering_tone_shifts_in_vernacular_only() {
    let fg = Predictor::for_dialect(Dialect::Fg);
    let reflexes = fg.get_reflexes(&cat("明", "山末一合"), "mot7", ReflexOptions::default());
    assert_eq!(reflexes.get(Layer::Default), "mot7");
    assert_eq!(reflexes.get(Layer::Vernacular), "mot8");
    assert_eq!(reflexes.get(Layer::Recent), "mot7");

    let voiceless = fg.get_reflexes(&cat("幫", "山末一合"), "pot7", ReflexOptions::default());
    assert_eq!(voiceless.vernacular, "pot7");
}

#[test]
fn voicing_and_tone_can_be_ignored() {
    let fg = Predictor::for_dialect(Dialect::Fg);
    let options = ReflexOptions { ignore_voicing: true, ignore_tone: true };

    let labial = fg.get_reflexes(&cat("幫", "山寒一開"), "pan1", options);
    assert_eq!(labial.default, "ban");

    // Aspirated-only categories keep a voiceless onset.
    let aspirated = fg.get_reflexes(&cat("透", "山寒一開"), "tan1", options);
    assert_eq!(aspirated.into_array(), ["tan", "han", "tan"]);
}

#[test]
fn prediction_is_deterministic() {
    let fg = Predictor::for_dialect(Dialect::Fg);
    let category = cat("章", "梗清三開");
    let first = fg.get_reflexes(&category, "zin2", ReflexOptions::default());
    for _ in 0..10 {
        assert_eq!(fg.get_reflexes(&category, "zin2", ReflexOptions::default()), first);
    }
}

#[test]
fn trace_lists_fired_rules_in_order() {
    let fg = Predictor::for_dialect(Dialect::Fg);
    let run = fg.predict_with_trace(&cat("知", "臻眞三開"), "tin", Layer::Recent);
    assert_eq!(run.output, "cen");
    assert_eq!(run.fired().collect::<Vec<_>>(), ["知三章 聲母", "知三章 in → en"]);
    assert_eq!(run.traces[0].after, "cin");
    assert!(run.rules_matched >= run.traces.len());
}

#[test]
fn derived_strata_skip_unchanged_readings() {
    let raw: std::collections::BTreeMap<String, RawMcEntry> = serde_json::from_str(
        r#"{
            "1": {"字數": 3, "MC": {"字": "灘", "聲母": "透", "攝": "山", "韻系": "寒", "等": "一", "呼": "開", "聲調": "平"},
                  "reflex": {"FG": "tan1"}},
            "2": {"字數": 1, "MC": {"字": "東", "聲母": "端", "攝": "通", "韻系": "東", "等": "一", "聲調": "平"},
                  "reflex": {"FG": "tung1"}},
            "3": {"字數": 1, "MC": {"字": "真", "聲母": "章", "攝": "臻", "韻系": "眞", "等": "三", "呼": "開", "聲調": "平"},
                  "reflex": {"FG": "tin1"}}
        }"#,
    )
    .unwrap();
    let catalog = Catalog::from_raw(raw);
    let strata = derive_strata(&catalog, Dialect::Fg);

    assert_eq!(strata.get(&1), Some(&vec![("白".to_string(), "han1".to_string())]));
    assert_eq!(strata.get(&2), None);
    assert_eq!(strata.get(&3), Some(&vec![("新".to_string(), "cen1".to_string())]));
}
