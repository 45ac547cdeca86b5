//! Home page statistics.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::dates::parse_date;
use crate::schema::{Experience, MemoRecord, MemoStatus};

/// Tags that describe the memo kind rather than the sector.
pub const NON_SECTOR_TAGS: [&str; 4] = ["RX", "Distressed", "Special Sits", "Lessons"];

const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0;

/// Whole years between the earliest parsable `start` and `now`.
///
/// Empty input, no parsable dates or a future start give 0.
pub fn years_of_experience(experience: &[Experience], now: DateTime<Utc>) -> u32 {
    let Some(earliest) = experience.iter().filter_map(|e| parse_date(&e.start)).min() else {
        return 0;
    };

    let elapsed = (now - earliest).num_seconds();
    if elapsed <= 0 {
        return 0;
    }
    (elapsed as f64 / SECONDS_PER_YEAR).floor() as u32
}

/// Distinct sector tags in first-seen order.
pub fn unique_sectors<'a, I>(memos: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a MemoRecord>,
{
    let mut seen = HashSet::new();
    let mut sectors = Vec::new();
    for memo in memos {
        for tag in &memo.tags {
            let tag = tag.as_str();
            if NON_SECTOR_TAGS.contains(&tag) {
                continue;
            }
            if seen.insert(tag) {
                sectors.push(tag);
            }
        }
    }
    sectors
}

pub fn sector_count<'a, I>(memos: I) -> usize
where
    I: IntoIterator<Item = &'a MemoRecord>,
{
    unique_sectors(memos).len()
}

/// Number of Public memos.
pub fn published_count(memos: &[MemoRecord]) -> usize {
    memos
        .iter()
        .filter(|m| m.status == MemoStatus::Public)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn job(start: &str) -> Experience {
        Experience {
            start: start.to_string(),
            ..Default::default()
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_years_empty() {
        assert_eq!(years_of_experience(&[], at(2025, 1, 1)), 0);
    }

    #[test]
    fn test_years_uses_earliest_start() {
        let jobs = vec![job("2021-06-01"), job("2018-09-01"), job("2023-01-15")];
        assert_eq!(years_of_experience(&jobs, at(2025, 9, 1)), 7);
        assert_eq!(years_of_experience(&jobs, at(2025, 8, 31)), 6);
    }

    #[test]
    fn test_years_floor() {
        let jobs = vec![job("2020-01-01")];
        assert_eq!(years_of_experience(&jobs, at(2020, 12, 31)), 0);
        assert_eq!(years_of_experience(&jobs, at(2024, 1, 2)), 4);
    }

    #[test]
    fn test_years_skips_bad_dates() {
        let jobs = vec![job("garbage"), job("2019-07")];
        assert_eq!(years_of_experience(&jobs, at(2024, 7, 2)), 5);
        assert_eq!(years_of_experience(&[job("")], at(2024, 1, 1)), 0);
    }

    #[test]
    fn test_years_future_start() {
        assert_eq!(years_of_experience(&[job("2030-01-01")], at(2024, 1, 1)), 0);
    }

    #[test]
    fn test_sectors_exclude_stopwords() {
        let memos = vec![
            MemoRecord::new("a", "A").with_tag("RX").with_tag("Retail"),
            MemoRecord::new("b", "B").with_tag("Distressed").with_tag("Energy"),
            MemoRecord::new("c", "C")
                .with_tag("Retail")
                .with_tag("Special Sits")
                .with_tag("Lessons"),
        ];
        assert_eq!(unique_sectors(&memos), vec!["Retail", "Energy"]);
        assert_eq!(sector_count(&memos), 2);
    }

    #[test]
    fn test_sectors_are_case_sensitive() {
        let memos = vec![MemoRecord::new("a", "A").with_tag("rx").with_tag("retail").with_tag("Retail")];
        assert_eq!(sector_count(&memos), 3);
    }

    #[test]
    fn test_published_count() {
        let memos = vec![
            MemoRecord::new("a", "A"),
            MemoRecord::new("b", "B").with_status(MemoStatus::Private),
        ];
        assert_eq!(published_count(&memos), 1);
    }
}
