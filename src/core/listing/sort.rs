//! Deterministic ordering of normalized records
//!
//! The registry gives no ordering guarantee, so listings are re-sorted
//! locally. All sorts are stable.

use crate::domain::PointOfInterest;
use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Sort key requested by the caller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently modified first; unknown timestamps last
    Latest,
    /// Title, case and width insensitive; empty titles last
    Name,
    /// Any other key: keep the registry's order
    #[default]
    AsFetched,
}

impl SortKey {
    /// Parses a key name; unknown names mean [`SortKey::AsFetched`]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "latest" => SortKey::Latest,
            "name" => SortKey::Name,
            _ => SortKey::AsFetched,
        }
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Latest => f.write_str("latest"),
            SortKey::Name => f.write_str("name"),
            SortKey::AsFetched => f.write_str("as-fetched"),
        }
    }
}

/// Orders records by `key`
///
/// ```
/// use tourmark::core::listing::{sort_records, SortKey};
/// use tourmark::domain::{PoiId, PointOfInterest};
///
/// let records = vec![
///     PointOfInterest::new(PoiId::new("1").unwrap(), "a").with_last_modified("20240101000000"),
///     PointOfInterest::new(PoiId::new("2").unwrap(), "b").with_last_modified(""),
///     PointOfInterest::new(PoiId::new("3").unwrap(), "c").with_last_modified("20240301000000"),
/// ];
/// let ids: Vec<String> = sort_records(records, &SortKey::Latest)
///     .into_iter()
///     .map(|r| r.id.into_inner())
///     .collect();
/// assert_eq!(ids, ["3", "1", "2"]);
/// ```
pub fn sort_records(records: Vec<PointOfInterest>, key: &SortKey) -> Vec<PointOfInterest> {
    match key {
        SortKey::Latest => sort_decorated(records, |r| {
            match r.last_modified.as_deref().and_then(parse_modified_time) {
                Some(at) => (0u8, Some(Reverse(at))),
                None => (1u8, None),
            }
        }),
        SortKey::Name => sort_decorated(records, |r| {
            let key = collation_key(&r.title);
            (key.is_empty(), key)
        }),
        SortKey::AsFetched => records,
    }
}

/// Sorts by a key computed once per record; stable
fn sort_decorated<K, F>(records: Vec<PointOfInterest>, key_fn: F) -> Vec<PointOfInterest>
where
    K: Ord,
    F: Fn(&PointOfInterest) -> K,
{
    let mut keyed: Vec<(K, PointOfInterest)> =
        records.into_iter().map(|r| (key_fn(&r), r)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, r)| r).collect()
}

/// Parses a fixed-width `YYYYMMDDHHmmss` timestamp
///
/// Anything that is not exactly fourteen ASCII digits forming a real calendar
/// instant yields `None`.
pub fn parse_modified_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.len() != 14 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let field = |range: std::ops::Range<usize>| text[range].parse::<u32>().ok();
    let year = i32::try_from(field(0..4)?).ok()?;

    NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?)?.and_hms_opt(
        field(8..10)?,
        field(10..12)?,
        field(12..14)?,
    )
}

/// Folds a title into its comparison form
///
/// The title is decomposed with NFKD, which maps fullwidth forms and the
/// ideographic space onto their ASCII counterparts and splits accented
/// letters into base letter plus combining mark. Marks are dropped, the rest
/// is lowercased and trimmed, so `Éclair` sorts with `eclair` rather than
/// after `z`. Hangul syllables decompose into jamo in syllable order.
pub fn collation_key(title: &str) -> String {
    title
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PoiId;
    use test_case::test_case;

    fn record(id: &str, title: &str, modified: &str) -> PointOfInterest {
        PointOfInterest::new(PoiId::new(id).unwrap(), title).with_last_modified(modified)
    }

    fn ids(records: Vec<PointOfInterest>) -> Vec<String> {
        records.into_iter().map(|r| r.id.into_inner()).collect()
    }

    #[test]
    fn test_latest_puts_invalid_last() {
        let records = vec![
            record("jan", "", "20240101000000"),
            record("blank", "", ""),
            record("mar", "", "20240301000000"),
        ];
        assert_eq!(
            ids(sort_records(records, &SortKey::Latest)),
            vec!["mar", "jan", "blank"]
        );
    }

    #[test]
    fn test_latest_is_stable_for_ties_and_invalid() {
        let mut missing = record("missing", "", "");
        missing.last_modified = None;
        let records = vec![
            record("bad", "", "2024-03-01"),
            record("tie-a", "", "20240301120000"),
            missing,
            record("tie-b", "", "20240301120000"),
            record("impossible", "", "20240231000000"),
        ];
        assert_eq!(
            ids(sort_records(records, &SortKey::Latest)),
            vec!["tie-a", "tie-b", "bad", "missing", "impossible"]
        );
    }

    #[test]
    fn test_name_ignores_case_unlike_code_points() {
        // Code-point order puts 'B' (0x42) before 'a' (0x61)
        let records = vec![record("b", "Banana", ""), record("a", "apple", "")];
        assert_eq!(ids(sort_records(records, &SortKey::Name)), vec!["a", "b"]);
    }

    #[test]
    fn test_name_folds_fullwidth() {
        // Fullwidth 'Ａ' (U+FF21) sorts after every ASCII letter by code point
        let records = vec![
            record("full", "Ａｒｔ　Ｍｕｓｅｕｍ", ""),
            record("ascii", "Bridge", ""),
        ];
        assert_eq!(
            ids(sort_records(records, &SortKey::Name)),
            vec!["full", "ascii"]
        );
    }

    #[test]
    fn test_name_sorts_accented_letters_with_their_base() {
        // Code-point order puts 'É' (U+00C9) after every ASCII letter
        let records = vec![
            record("z", "Zoo Land", ""),
            record("e", "Éclair Café", ""),
            record("a", "Apple Farm", ""),
        ];
        assert_eq!(
            ids(sort_records(records, &SortKey::Name)),
            vec!["a", "e", "z"]
        );
    }

    #[test_case("Ｍｕｓｅｕｍ", "museum" ; "fullwidth")]
    #[test_case("Crème Brûlée", "creme brulee" ; "accents")]
    #[test_case("\u{3000}Seoul ", "seoul" ; "ideographic space")]
    fn test_collation_key(title: &str, expected: &str) {
        assert_eq!(collation_key(title), expected);
    }

    #[test]
    fn test_name_keeps_hangul_syllable_order() {
        let records = vec![
            record("gak", "각", ""),
            record("ga-na", "가나", ""),
            record("ga", "가", ""),
        ];
        assert_eq!(
            ids(sort_records(records, &SortKey::Name)),
            vec!["ga", "ga-na", "gak"]
        );
    }

    #[test]
    fn test_name_empty_titles_last_and_stable() {
        let records = vec![
            record("empty-1", "", ""),
            record("gyeongbok", "경복궁", ""),
            record("empty-2", "  ", ""),
            record("dup-1", "광장시장", ""),
            record("dup-2", "광장시장", ""),
        ];
        assert_eq!(
            ids(sort_records(records, &SortKey::Name)),
            vec!["gyeongbok", "dup-1", "dup-2", "empty-1", "empty-2"]
        );
    }

    #[test_case("popular" ; "unknown key")]
    #[test_case("" ; "empty key")]
    fn test_unknown_key_passes_through(key: &str) {
        let records = vec![record("2", "b", ""), record("1", "a", "")];
        assert_eq!(
            ids(sort_records(records, &SortKey::parse(key))),
            vec!["2", "1"]
        );
    }

    #[test_case("20240301123045", Some((2024, 3, 1, 12, 30, 45)) ; "valid")]
    #[test_case("20240229000000", Some((2024, 2, 29, 0, 0, 0)) ; "leap day")]
    #[test_case("20230229000000", None ; "not a leap year")]
    #[test_case("20241301000000", None ; "month out of range")]
    #[test_case("20240301246000", None ; "hour out of range")]
    #[test_case("2024030112304", None ; "too short")]
    #[test_case("2024-03-01 12:30", None ; "wrong format")]
    #[test_case("", None ; "empty")]
    fn test_parse_modified_time(input: &str, expected: Option<(i32, u32, u32, u32, u32, u32)>) {
        let expected = expected.map(|(y, mo, d, h, mi, s)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, s)
                .unwrap()
        });
        assert_eq!(parse_modified_time(input), expected);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("LATEST"), SortKey::Latest);
        assert_eq!(SortKey::parse(" name "), SortKey::Name);
        assert_eq!(SortKey::parse("distance"), SortKey::AsFetched);
        assert_eq!("name".parse::<SortKey>().unwrap(), SortKey::Name);
    }
}
