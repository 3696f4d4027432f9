/// `s` without its first `n` characters.
pub fn tail(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or("", |(i, _)| &s[i..])
}

/// `s` without its last `n` characters.
pub fn drop_last(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if n >= count {
        return "";
    }
    s.char_indices().nth(count - n).map_or(s, |(i, _)| &s[..i])
}

/// Replace the first occurrence of `from`; `None` when absent.
pub fn replace_first(s: &str, from: &str, to: &str) -> Option<String> {
    s.find(from).map(|_| s.replacen(from, to, 1))
}

/// Replace a leading `from` with `to`; `None` when `s` does not start with it.
pub fn swap_prefix(s: &str, from: &str, to: &str) -> Option<String> {
    s.strip_prefix(from).map(|rest| format!("{to}{rest}"))
}

/// Replace a trailing `from` with `to`; `None` when `s` does not end with it.
pub fn swap_suffix(s: &str, from: &str, to: &str) -> Option<String> {
    s.strip_suffix(from).map(|head| format!("{head}{to}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_count_characters_not_bytes() {
        assert_eq!(tail("ŋan", 1), "an");
        assert_eq!(tail("a", 3), "");
        assert_eq!(drop_last("tɕʰa", 2), "tɕ");
        assert_eq!(drop_last("ui", 5), "");
    }

    #[test]
    fn swaps_report_misses() {
        assert_eq!(swap_prefix("xin", "x", "s").as_deref(), Some("sin"));
        assert_eq!(swap_suffix("tin", "en", "an"), None);
        assert_eq!(replace_first("pɛnɛn", "ɛn", "ɛŋ").as_deref(), Some("pɛŋɛn"));
        assert_eq!(replace_first("pa", "ɛn", "ɛŋ"), None);
    }
}
