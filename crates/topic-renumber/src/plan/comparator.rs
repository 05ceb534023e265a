//! Ordering of records within a partition.
//!
//! The order is composed from rules evaluated in sequence; the first rule
//! that does not tie decides. The default comparator reproduces the ordering
//! the application applies when it renumbers after a delete:
//!
//! 1. [`TimestampRule`]: earlier `createdAt` first, but timestamps less than
//!    one second apart tie.
//! 2. [`LegacySequenceRule`]: ascending pre-migration topic number.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Ordering;

use crate::record::Record;

/// Timestamps closer than this (in microseconds) compare as equal.
pub const TIE_TOLERANCE_MICROS: i64 = 1_000_000;

/// One step of the record ordering.
pub trait OrderingRule: Send + Sync {
    /// Compare two records. `Equal` means "no opinion, ask the next rule".
    fn compare(&self, a: &Record, b: &Record) -> Ordering;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Orders by `createdAt` when both sides parse, with a one second tie window.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampRule;

impl OrderingRule for TimestampRule {
    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let (Some(a_time), Some(b_time)) = (
            a.usable_created_at().and_then(parse_timestamp),
            b.usable_created_at().and_then(parse_timestamp),
        ) else {
            return Ordering::Equal;
        };

        match (a_time - b_time).num_microseconds() {
            Some(delta) if delta.abs() < TIE_TOLERANCE_MICROS => Ordering::Equal,
            _ => a_time.cmp(&b_time),
        }
    }

    fn name(&self) -> &'static str {
        "created_at"
    }
}

/// Orders by the legacy topic number; blank or non-numeric counts as 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacySequenceRule;

impl OrderingRule for LegacySequenceRule {
    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        a.legacy_sequence().cmp(&b.legacy_sequence())
    }

    fn name(&self) -> &'static str {
        "legacy_sequence"
    }
}

/// Record comparator composed of ordering rules.
pub struct RecordComparator {
    rules: Vec<Box<dyn OrderingRule>>,
}

impl RecordComparator {
    /// Build a comparator from explicit rules.
    pub fn with_rules(rules: Vec<Box<dyn OrderingRule>>) -> Self {
        Self { rules }
    }

    /// Three-way comparison, short-circuiting on the first non-tie.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        self.rules
            .iter()
            .map(|rule| rule.compare(a, b))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// Names of the rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Stable sort of `records` under this comparator.
    pub fn sort<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        stable_sort_by(records, |a, b| self.compare(a, b))
    }
}

impl Default for RecordComparator {
    fn default() -> Self {
        Self::with_rules(vec![Box::new(TimestampRule), Box::new(LegacySequenceRule)])
    }
}

impl std::fmt::Debug for RecordComparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordComparator")
            .field("rules", &self.rule_names())
            .finish()
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (`Z` or numeric offset), naive date-times (read as UTC,
/// `T` or space separated) and bare dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Bottom-up merge sort returning references in sorted order.
///
/// Equal elements keep their input order. Unlike `slice::sort_by` this never
/// panics when `compare` is not transitive, which the tie window allows.
pub fn stable_sort_by<T, F>(items: &[T], mut compare: F) -> Vec<&T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    let mut current: Vec<&T> = items.iter().collect();
    let mut merged: Vec<&T> = Vec::with_capacity(len);
    let mut width = 1;

    while width < len {
        merged.clear();
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut left, mut right) = (start, mid);

            while left < mid && right < end {
                // Take from the right run only when strictly smaller.
                if compare(current[right], current[left]) == Ordering::Less {
                    merged.push(current[right]);
                    right += 1;
                } else {
                    merged.push(current[left]);
                    left += 1;
                }
            }
            merged.extend_from_slice(&current[left..mid]);
            merged.extend_from_slice(&current[right..end]);
            start = end;
        }
        std::mem::swap(&mut current, &mut merged);
        width *= 2;
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn rec(id: &str, created_at: Option<&str>, seq: &str) -> Record {
        let mut r = Record::new(id).with_sequence(seq);
        r.created_at = created_at.map(String::from);
        r
    }

    #[test]
    fn test_earlier_timestamp_first() {
        let cmp = RecordComparator::default();
        let a = rec("a", Some("2024-01-01T00:00:00Z"), "9");
        let b = rec("b", Some("2024-01-02T00:00:00Z"), "1");
        assert_eq!(cmp.compare(&a, &b), Ordering::Less);
        assert_eq!(cmp.compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_sub_second_difference_falls_back_to_sequence() {
        let cmp = RecordComparator::default();
        let a = rec("a", Some("2024-01-01T00:00:00.900Z"), "1");
        let b = rec("b", Some("2024-01-01T00:00:00.000Z"), "2");
        // b is earlier, but within the tie window, so legacy order wins.
        assert_eq!(cmp.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_exactly_one_second_is_not_a_tie() {
        let cmp = RecordComparator::default();
        let a = rec("a", Some("2024-01-01T00:00:01Z"), "1");
        let b = rec("b", Some("2024-01-01T00:00:00Z"), "2");
        assert_eq!(cmp.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_offsets_are_normalized() {
        let cmp = RecordComparator::default();
        let a = rec("a", Some("2024-01-01T03:00:00+03:00"), "2");
        let b = rec("b", Some("2024-01-01T00:00:00Z"), "1");
        // Same instant: tie on time, fall back to sequence.
        assert_eq!(cmp.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_missing_or_unparseable_timestamp_uses_sequence() {
        let cmp = RecordComparator::default();
        let a = rec("a", None, "3");
        let b = rec("b", Some("2020-01-01T00:00:00Z"), "1");
        assert_eq!(cmp.compare(&a, &b), Ordering::Greater);

        let c = rec("c", Some("not a date"), "1");
        let d = rec("d", Some("2020-01-01T00:00:00Z"), "2");
        assert_eq!(cmp.compare(&c, &d), Ordering::Less);
    }

    #[test]
    fn test_blank_sequence_counts_as_zero() {
        let cmp = RecordComparator::default();
        let a = rec("a", None, "");
        let b = rec("b", None, "1");
        assert_eq!(cmp.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2023-01-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2023-01-01T00:00:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-01-01T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-01-01 00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-01-01"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_sort_is_stable_for_full_ties() {
        let cmp = RecordComparator::default();
        let records = vec![rec("x", None, "1"), rec("y", None, "1"), rec("z", None, "1")];
        let ids: Vec<&str> = cmp.sort(&records).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_stable_sort_by_handles_non_transitive_compare() {
        // Rock-paper-scissors: must terminate and return every element.
        let items = vec![0u8, 1, 2, 0, 1, 2];
        let sorted = stable_sort_by(&items, |a, b| match (a, b) {
            (0, 1) | (1, 2) | (2, 0) => Ordering::Less,
            (1, 0) | (2, 1) | (0, 2) => Ordering::Greater,
            _ => Ordering::Equal,
        });
        assert_eq!(sorted.len(), items.len());
    }

    #[test]
    fn test_rule_names() {
        let cmp = RecordComparator::default();
        assert_eq!(cmp.rule_names(), vec!["created_at", "legacy_sequence"]);
    }

    // Post-backfill records always carry a timestamp.
    fn arb_record() -> impl Strategy<Value = Record> {
        (
            0i64..100_000,
            prop::option::of(0u32..50),
            "[a-z]{1,6}",
        )
            .prop_map(|(secs, seq, id)| {
                let mut r = Record::new(id);
                r.created_at = Some(
                    (Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                        + chrono::Duration::seconds(secs))
                    .to_rfc3339(),
                );
                r.sequence_number = seq.map(|s| s.to_string());
                r
            })
    }

    proptest! {
        #[test]
        fn prop_compare_is_reflexive_and_antisymmetric(a in arb_record(), b in arb_record()) {
            let cmp = RecordComparator::default();
            prop_assert_eq!(cmp.compare(&a, &a), Ordering::Equal);
            prop_assert_eq!(cmp.compare(&a, &b), cmp.compare(&b, &a).reverse());
        }

        #[test]
        fn prop_whole_second_timestamps_are_transitive(
            a in arb_record(), b in arb_record(), c in arb_record()
        ) {
            // Whole-second timestamps never fall inside the tie window unless
            // identical, so the order is a total preorder.
            let cmp = RecordComparator::default();
            if cmp.compare(&a, &b) != Ordering::Greater
                && cmp.compare(&b, &c) != Ordering::Greater
            {
                prop_assert_ne!(cmp.compare(&a, &c), Ordering::Greater);
            }
        }

        #[test]
        fn prop_sort_matches_std_sort_when_total(
            records in prop::collection::vec(arb_record(), 0..40)
        ) {
            let cmp = RecordComparator::default();
            let ours: Vec<&Record> = cmp.sort(&records);
            let mut std_sorted: Vec<&Record> = records.iter().collect();
            std_sorted.sort_by(|a, b| cmp.compare(a, b));
            prop_assert_eq!(ours, std_sorted);
        }
    }
}
