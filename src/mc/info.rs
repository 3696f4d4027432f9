//! Phonological classification of a Middle Chinese small rhyme.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer};

bitflags::bitflags! {
    /// A set of MC initials (聲母), used as a category guard.
    ///
    /// Categories may carry more than one initial (merged cells), so guards
    /// test set intersection or inclusion rather than equality.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Initials: u64 {
        const 幫 = 1 << 0;
        const 滂 = 1 << 1;
        const 並 = 1 << 2;
        const 明 = 1 << 3;
        const 端 = 1 << 4;
        const 透 = 1 << 5;
        const 定 = 1 << 6;
        const 泥 = 1 << 7;
        const 知 = 1 << 8;
        const 徹 = 1 << 9;
        const 澄 = 1 << 10;
        const 娘 = 1 << 11;
        const 精 = 1 << 12;
        const 清 = 1 << 13;
        const 從 = 1 << 14;
        const 心 = 1 << 15;
        const 邪 = 1 << 16;
        const 莊 = 1 << 17;
        const 初 = 1 << 18;
        const 崇 = 1 << 19;
        const 生 = 1 << 20;
        const 俟 = 1 << 21;
        const 章 = 1 << 22;
        const 昌 = 1 << 23;
        const 常 = 1 << 24;
        const 書 = 1 << 25;
        const 船 = 1 << 26;
        const 日 = 1 << 27;
        const 見 = 1 << 28;
        const 溪 = 1 << 29;
        const 羣 = 1 << 30;
        const 疑 = 1 << 31;
        const 影 = 1 << 32;
        const 曉 = 1 << 33;
        const 匣 = 1 << 34;
        const 云 = 1 << 35;
        const 以 = 1 << 36;
        const 來 = 1 << 37;
    }
}

const INITIAL_CHARS: &str = "幫滂並明端透定泥知徹澄娘精清從心邪莊初崇生俟章昌常書船日見溪羣疑影曉匣云以來";

impl Initials {
    /// Set of the MC initials named in `chars`; other characters are ignored.
    pub fn parse(chars: &str) -> Self {
        chars.chars().filter_map(Self::from_char).fold(Initials::empty(), |acc, flag| acc | flag)
    }

    pub fn from_char(c: char) -> Option<Self> {
        INITIAL_CHARS.chars().position(|known| known == c).map(|bit| Initials::from_bits_retain(1 << bit))
    }

    /// The initials of the set, in traditional order.
    pub fn to_chars(self) -> String {
        INITIAL_CHARS.chars().enumerate().filter(|(bit, _)| self.bits() & (1 << bit) != 0).map(|(_, c)| c).collect()
    }
}

/// Final class of a category: 攝, 韻系, 等, 呼.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FinalClass {
    pub rhyme_group: String,
    pub rhyme: String,
    pub grade: String,
    pub rounding: String,
}

impl FinalClass {
    /// Parse a full final written as 攝 + 韻系 + 等 (+ 呼), e.g. `山寒一開`.
    pub fn parse(full_final: &str) -> Self {
        let mut chars = full_final.chars().map(String::from);
        FinalClass {
            rhyme_group: chars.next().unwrap_or_default(),
            rhyme: chars.next().unwrap_or_default(),
            grade: chars.next().unwrap_or_default(),
            rounding: chars.next().unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for FinalClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}{}", self.rhyme_group, self.rhyme, self.grade, self.rounding)
    }
}

/// The classification a reflex rule is guarded on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    pub initials: Initials,
    pub final_class: FinalClass,
}

impl Category {
    pub fn new(initials: Initials, final_class: FinalClass) -> Self {
        Category { initials, final_class }
    }

    pub(crate) fn has_any(&self, set: Initials) -> bool {
        self.initials.intersects(set)
    }

    pub(crate) fn only(&self, set: Initials) -> bool {
        set.contains(self.initials)
    }
}

/// Historical classification of a small rhyme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct McInfo {
    /// Representative character.
    #[serde(rename = "字", default, deserialize_with = "null_as_empty")]
    pub character: String,
    /// Spelling formula, e.g. 德紅切.
    #[serde(rename = "反切", default)]
    pub fanqie: Option<String>,
    #[serde(rename = "聲母", default, deserialize_with = "null_as_empty")]
    pub initial: String,
    /// 全清, 次清, 全濁, 次濁.
    #[serde(rename = "清濁", default, deserialize_with = "null_as_empty")]
    pub voicing: String,
    /// Place class (音), e.g. 舌.
    #[serde(rename = "音", default, deserialize_with = "null_as_empty")]
    pub place: String,
    /// Initial group (組), e.g. 端.
    #[serde(rename = "組", default, deserialize_with = "null_as_empty")]
    pub group: String,
    #[serde(rename = "攝", default, deserialize_with = "null_as_empty")]
    pub rhyme_group: String,
    #[serde(rename = "韻系", default, deserialize_with = "null_as_empty")]
    pub rhyme: String,
    #[serde(rename = "等", default, deserialize_with = "null_as_empty")]
    pub grade: String,
    /// 開, 合 or empty.
    #[serde(rename = "呼", default, deserialize_with = "null_as_empty")]
    pub rounding: String,
    /// 重紐 A/B.
    #[serde(rename = "重紐", default)]
    pub chongniu: Option<String>,
    #[serde(rename = "聲調", default, deserialize_with = "null_as_empty")]
    pub tone: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields of [`McInfo`] that a description can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum McField {
    Initial,
    RhymeGroup,
    Rhyme,
    Grade,
    Rounding,
    Chongniu,
    Tone,
}

const RHYME_GROUPS: &str = "通江止遇蟹臻山效果假宕梗曾流深咸";
const GRADES: &str = "一二三四";
const ROUNDINGS: &str = "開合";
const TONES: &str = "平上去入";
const CHONGNIU: &str = "AB";

/// Rhyme systems (韻系) in rhyme-book order with their rhyme heads (韻目) per
/// tone, 平上去入. Empty where the system has no rhyme in that tone.
const RHYME_HEADS: &[(&str, [&str; 4])] = &[
    ("東", ["東", "董", "送", "屋"]),
    ("冬", ["冬", "", "宋", "沃"]),
    ("鍾", ["鍾", "腫", "用", "燭"]),
    ("江", ["江", "講", "絳", "覺"]),
    ("支", ["支", "紙", "寘", ""]),
    ("脂", ["脂", "旨", "至", ""]),
    ("之", ["之", "止", "志", ""]),
    ("微", ["微", "尾", "未", ""]),
    ("魚", ["魚", "語", "御", ""]),
    ("虞", ["虞", "麌", "遇", ""]),
    ("模", ["模", "姥", "暮", ""]),
    ("齊", ["齊", "薺", "霽", ""]),
    ("祭", ["", "", "祭", ""]),
    ("泰", ["", "", "泰", ""]),
    ("佳", ["佳", "蟹", "卦", ""]),
    ("皆", ["皆", "駭", "怪", ""]),
    ("夬", ["", "", "夬", ""]),
    ("灰", ["灰", "賄", "隊", ""]),
    ("咍", ["咍", "海", "代", ""]),
    ("廢", ["", "", "廢", ""]),
    ("眞", ["眞", "軫", "震", "質"]),
    ("諄", ["諄", "準", "稕", "術"]),
    ("臻", ["臻", "", "", "櫛"]),
    ("文", ["文", "吻", "問", "物"]),
    ("殷", ["殷", "隱", "焮", "迄"]),
    ("元", ["元", "阮", "願", "月"]),
    ("魂", ["魂", "混", "慁", "沒"]),
    ("痕", ["痕", "很", "恨", ""]),
    ("寒", ["寒", "旱", "翰", "曷"]),
    ("桓", ["桓", "緩", "換", "末"]),
    ("刪", ["刪", "潸", "諫", "黠"]),
    ("山", ["山", "產", "襉", "鎋"]),
    ("先", ["先", "銑", "霰", "屑"]),
    ("仙", ["仙", "獮", "線", "薛"]),
    ("蕭", ["蕭", "篠", "嘯", ""]),
    ("宵", ["宵", "小", "笑", ""]),
    ("肴", ["肴", "巧", "效", ""]),
    ("豪", ["豪", "晧", "号", ""]),
    ("歌", ["歌", "哿", "箇", ""]),
    ("戈", ["戈", "果", "過", ""]),
    ("麻", ["麻", "馬", "禡", ""]),
    ("陽", ["陽", "養", "漾", "藥"]),
    ("唐", ["唐", "蕩", "宕", "鐸"]),
    ("庚", ["庚", "梗", "映", "陌"]),
    ("耕", ["耕", "耿", "諍", "麥"]),
    ("清", ["清", "靜", "勁", "昔"]),
    ("青", ["青", "迥", "徑", "錫"]),
    ("蒸", ["蒸", "拯", "證", "職"]),
    ("登", ["登", "等", "嶝", "德"]),
    ("尤", ["尤", "有", "宥", ""]),
    ("侯", ["侯", "厚", "候", ""]),
    ("幽", ["幽", "黝", "幼", ""]),
    ("侵", ["侵", "寑", "沁", "緝"]),
    ("覃", ["覃", "感", "勘", "合"]),
    ("談", ["談", "敢", "闞", "盍"]),
    ("鹽", ["鹽", "琰", "豔", "葉"]),
    ("添", ["添", "忝", "㮇", "怗"]),
    ("咸", ["咸", "豏", "陷", "洽"]),
    ("銜", ["銜", "檻", "鑑", "狎"]),
    ("嚴", ["嚴", "儼", "釅", "業"]),
    ("凡", ["凡", "范", "梵", "乏"]),
];

fn rhyme_heads(rhyme: &str) -> Option<&'static [&'static str; 4]> {
    RHYME_HEADS.iter().find(|(name, _)| *name == rhyme).map(|(_, heads)| heads)
}

fn char_rank(list: &str, value: &str) -> Option<usize> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => list.chars().position(|known| known == c),
        _ => None,
    }
}

impl McField {
    /// Position of `value` in the traditional order of this field. Unknown
    /// values rank last.
    pub fn rank(self, value: &str) -> usize {
        let rank = match self {
            McField::Initial => char_rank(INITIAL_CHARS, value),
            McField::RhymeGroup => char_rank(RHYME_GROUPS, value),
            McField::Rhyme => RHYME_HEADS.iter().position(|(name, _)| *name == value),
            McField::Grade => char_rank(GRADES, value),
            McField::Rounding => char_rank(ROUNDINGS, value),
            McField::Chongniu => char_rank(CHONGNIU, value),
            McField::Tone => char_rank(TONES, value),
        };
        rank.unwrap_or(usize::MAX)
    }
}

/// How the rhyme of a classification is named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FinalStyle {
    /// The rhyme system, named after its level-tone rhyme: 東 for 董 and 屋.
    #[default]
    System,
    /// The rhyme system, with checked syllables named after the checked
    /// rhyme: 東 for 董, 屋 for 屋.
    SystemChecked,
    /// The rhyme head of the syllable's own tone: 董 in the rising tone.
    Head,
}

/// How [`McInfo::describe`] lays out a classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McInfoStyle {
    pub ordering: Vec<McField>,
    pub show_rhyme_group: bool,
    pub show_tone: bool,
    pub final_style: FinalStyle,
}

impl Default for McInfoStyle {
    fn default() -> Self {
        McInfoStyle {
            ordering: vec![
                McField::Initial,
                McField::RhymeGroup,
                McField::Rhyme,
                McField::Grade,
                McField::Rounding,
                McField::Chongniu,
                McField::Tone,
            ],
            show_rhyme_group: true,
            show_tone: true,
            final_style: FinalStyle::System,
        }
    }
}

impl McInfo {
    pub fn initials(&self) -> Initials {
        Initials::parse(&self.initial)
    }

    pub fn final_class(&self) -> FinalClass {
        FinalClass {
            rhyme_group: self.rhyme_group.clone(),
            rhyme: self.rhyme.clone(),
            grade: self.grade.clone(),
            rounding: self.rounding.clone(),
        }
    }

    /// 攝 + 韻系 + 等 + 呼, e.g. `通東一開`.
    pub fn full_final(&self) -> String {
        self.final_class().to_string()
    }

    pub fn category(&self) -> Category {
        Category::new(self.initials(), self.final_class())
    }

    pub fn field(&self, field: McField) -> &str {
        match field {
            McField::Initial => &self.initial,
            McField::RhymeGroup => &self.rhyme_group,
            McField::Rhyme => &self.rhyme,
            McField::Grade => &self.grade,
            McField::Rounding => &self.rounding,
            McField::Chongniu => self.chongniu.as_deref().unwrap_or(""),
            McField::Tone => &self.tone,
        }
    }

    /// Compact description such as `端通東一平`.
    pub fn describe(&self, style: &McInfoStyle) -> String {
        style
            .ordering
            .iter()
            .filter(|field| match field {
                McField::RhymeGroup => style.show_rhyme_group,
                McField::Tone => style.show_tone,
                _ => true,
            })
            .map(|&field| if field == McField::Rhyme { self.show_final(style.final_style) } else { self.field(field) })
            .collect()
    }

    /// Name of the rhyme in `style`. Systems missing from the rhyme book, or
    /// without a rhyme in the requested tone, show the system name.
    pub fn show_final(&self, style: FinalStyle) -> &str {
        let Some(heads) = rhyme_heads(&self.rhyme) else {
            return &self.rhyme;
        };
        let head = match style {
            FinalStyle::System => None,
            FinalStyle::SystemChecked if self.tone == "入" => Some(heads[3]),
            FinalStyle::SystemChecked => heads.iter().copied().find(|head| !head.is_empty()),
            FinalStyle::Head => char_rank(TONES, &self.tone).map(|tone| heads[tone]),
        };
        match head {
            Some(head) if !head.is_empty() => head,
            _ => &self.rhyme,
        }
    }

    /// Total order over classifications: the fields in `priority` first, then
    /// initial, rhyme group, rhyme, grade, rounding and tone. Each field
    /// compares by its traditional order and then by text.
    pub fn comparer(priority: &[McField]) -> impl Fn(&McInfo, &McInfo) -> Ordering + use<> {
        let mut fields = priority.to_vec();
        for field in
            [McField::Initial, McField::RhymeGroup, McField::Rhyme, McField::Grade, McField::Rounding, McField::Tone]
        {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        move |a: &McInfo, b: &McInfo| {
            fields
                .iter()
                .map(|&field| {
                    let (x, y) = (a.field(field), b.field(field));
                    field.rank(x).cmp(&field.rank(y)).then_with(|| x.cmp(y))
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dong() -> McInfo {
        McInfo {
            character: "東".into(),
            fanqie: Some("德紅切".into()),
            initial: "端".into(),
            voicing: "全清".into(),
            place: "舌".into(),
            group: "端".into(),
            rhyme_group: "通".into(),
            rhyme: "東".into(),
            grade: "一".into(),
            rounding: "".into(),
            chongniu: None,
            tone: "平".into(),
        }
    }

    #[test]
    fn initials_parse_ignores_unknown_characters() {
        let set = Initials::parse("透定x");
        assert_eq!(set, Initials::透 | Initials::定);
        assert_eq!(set.to_chars(), "透定");
        assert_eq!(Initials::parse(""), Initials::empty());
    }

    #[test]
    fn only_is_vacuous_for_empty_categories() {
        let empty = Category::default();
        assert!(empty.only(Initials::透));
        assert!(!empty.has_any(Initials::透));
    }

    #[test]
    fn describe_follows_style() {
        let info = dong();
        assert_eq!(info.describe(&McInfoStyle::default()), "端通東一平");

        let style = McInfoStyle { show_rhyme_group: false, show_tone: false, ..McInfoStyle::default() };
        assert_eq!(info.describe(&style), "端東一");
        assert_eq!(info.full_final(), "通東一");
    }

    #[test]
    fn final_styles_name_the_rhyme() {
        let mut info = dong();
        let style = |final_style| McInfoStyle { final_style, ..McInfoStyle::default() };

        info.tone = "入".into();
        assert_eq!(info.describe(&style(FinalStyle::System)), "端通東一入");
        assert_eq!(info.describe(&style(FinalStyle::SystemChecked)), "端通屋一入");
        assert_eq!(info.describe(&style(FinalStyle::Head)), "端通屋一入");

        info.tone = "上".into();
        assert_eq!(info.show_final(FinalStyle::SystemChecked), "東");
        assert_eq!(info.show_final(FinalStyle::Head), "董");

        // 祭 has only a departing-tone rhyme; 冬 has no rising-tone one.
        let ji = McInfo { rhyme: "祭".into(), tone: "去".into(), ..dong() };
        assert_eq!(ji.show_final(FinalStyle::SystemChecked), "祭");
        let dong_rising = McInfo { rhyme: "冬".into(), tone: "上".into(), ..dong() };
        assert_eq!(dong_rising.show_final(FinalStyle::Head), "冬");
        let unknown = McInfo { rhyme: "x".into(), ..dong() };
        assert_eq!(unknown.show_final(FinalStyle::Head), "x");
    }

    #[test]
    fn comparer_follows_traditional_order() {
        let info = |initial: &str, rhyme_group: &str, rhyme: &str, grade: &str, tone: &str| McInfo {
            initial: initial.into(),
            rhyme_group: rhyme_group.into(),
            rhyme: rhyme.into(),
            grade: grade.into(),
            tone: tone.into(),
            ..dong()
        };
        let mut entries = vec![
            info("見", "通", "東", "一", "平"),
            info("端", "山", "寒", "一", "平"),
            info("端", "通", "東", "一", "入"),
            info("端", "通", "東", "一", "平"),
            info("幫", "咸", "談", "一", "上"),
        ];

        let by_initial = McInfo::comparer(&[]);
        let mut sorted = entries.clone();
        sorted.sort_by(|a, b| by_initial(a, b));
        let described: Vec<String> = sorted.iter().map(|i| i.describe(&McInfoStyle::default())).collect();
        assert_eq!(described, ["幫咸談一上", "端通東一平", "端通東一入", "端山寒一平", "見通東一平"]);

        let by_tone = McInfo::comparer(&[McField::Tone, McField::RhymeGroup]);
        entries.sort_by(|a, b| by_tone(a, b));
        let described: Vec<String> = entries.iter().map(|i| i.describe(&McInfoStyle::default())).collect();
        assert_eq!(described, ["端通東一平", "見通東一平", "端山寒一平", "幫咸談一上", "端通東一入"]);
    }

    #[test]
    fn unknown_values_rank_last() {
        assert_eq!(McField::Grade.rank("三"), 2);
        assert_eq!(McField::Rhyme.rank("東"), 0);
        assert_eq!(McField::Tone.rank(""), usize::MAX);
        assert_eq!(McField::Initial.rank("透定"), usize::MAX);
    }

    #[test]
    fn final_class_parses_full_final() {
        let class = FinalClass::parse("山寒一開");
        assert_eq!(class.rhyme_group, "山");
        assert_eq!(class.rhyme, "寒");
        assert_eq!(class.grade, "一");
        assert_eq!(class.rounding, "開");
        assert_eq!(FinalClass::parse("通東三").rounding, "");
    }
}
