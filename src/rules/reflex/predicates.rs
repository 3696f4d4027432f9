use crate::mc::Category;

/// 攝 is not 通.
pub fn outside_tong(cat: &Category) -> bool {
    cat.final_class.rhyme_group != "通"
}

/// Grade-one 蟹 finals that merge into `oi` in the vernacular layer: closed
/// finals outside the velars, and every labial-initial final.
pub fn xie_one_merges(cat: &Category) -> bool {
    (cat.final_class.rounding == "合" && !cat.has_any(initials!("見溪羣疑"))) || cat.has_any(initials!("幫滂並明"))
}

/// The category's only initial is 疑.
pub fn only_yi(cat: &Category) -> bool {
    cat.initials == initials!("疑")
}
