use chrono::{Datelike, NaiveDate};

/// Release date of a data set, written `YYYY 年 M 月 D 日`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DataVersion(NaiveDate);

impl DataVersion {
    pub fn new(date: NaiveDate) -> Self {
        DataVersion(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Find the first `YYYY 年 M 月 D 日` date in `text`. Spaces around the
    /// unit characters are optional.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = regex!(r"(\d{4})\s*年\s*(\d{1,2})\s*月\s*(\d{1,2})\s*日").captures(text.trim())?;
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(DataVersion)
    }
}

impl std::fmt::Display for DataVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} 年 {} 月 {} 日", self.0.year(), self.0.month(), self.0.day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chinese_dates() {
        let version = DataVersion::parse("  2024 年 3 月 9 日\n").unwrap();
        assert_eq!(version.date(), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(version.to_string(), "2024 年 3 月 9 日");

        let compact = DataVersion::parse("更新於2023年12月31日").unwrap();
        assert_eq!(compact.to_string(), "2023 年 12 月 31 日");
        assert!(compact < version);
    }

    #[test]
    fn rejects_invalid_dates() {
        assert_eq!(DataVersion::parse("2024 年 2 月 30 日"), None);
        assert_eq!(DataVersion::parse("2024-03-09"), None);
        assert_eq!(DataVersion::parse(""), None);
    }
}
