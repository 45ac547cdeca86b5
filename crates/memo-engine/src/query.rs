//! Memo Query Engine.
//!
//! Pure functions over a borrowed memo slice. Steps run in a fixed order:
//! visibility, search, type, year, then a stable newest-first sort.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::schema::{MemoRecord, MemoStatus};

/// Sentinel shown first in every facet list.
pub const ALL: &str = "All";

fn is_all(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(ALL)
}

/// Memo type selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl FromStr for TypeFilter {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if is_all(raw) || raw.is_empty() {
            Ok(TypeFilter::All)
        } else {
            Ok(TypeFilter::Only(raw.to_string()))
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str(ALL),
            TypeFilter::Only(t) => f.write_str(t),
        }
    }
}

/// Year selection, compared against the memo's analysis year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

/// A year filter that is neither the sentinel nor an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid year filter '{0}': expected a year or \"All\"")]
pub struct InvalidYear(pub String);

impl FromStr for YearFilter {
    type Err = InvalidYear;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if is_all(raw) {
            return Ok(YearFilter::All);
        }
        raw.trim()
            .parse::<i32>()
            .map(YearFilter::Year)
            .map_err(|_| InvalidYear(raw.to_string()))
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => f.write_str(ALL),
            YearFilter::Year(y) => write!(f, "{}", y),
        }
    }
}

impl Serialize for TypeFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `"All"` or the bare year number.
impl Serialize for YearFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            YearFilter::All => serializer.serialize_str(ALL),
            YearFilter::Year(y) => serializer.serialize_i32(*y),
        }
    }
}

/// One user interaction's filter state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Empty matches everything
    pub search_term: String,
    pub memo_type: TypeFilter,
    pub year: YearFilter,
}

impl FilterSpec {
    /// The "show everything" spec.
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_type(mut self, memo_type: TypeFilter) -> Self {
        self.memo_type = memo_type;
        self
    }

    pub fn with_year(mut self, year: YearFilter) -> Self {
        self.year = year;
        self
    }

    fn matches(&self, memo: &MemoRecord, needle: &str) -> bool {
        let matches_search = needle.is_empty() || matches_search(memo, needle);
        let matches_type = match &self.memo_type {
            TypeFilter::All => true,
            TypeFilter::Only(t) => memo.memo_type == *t,
        };
        let matches_year = match self.year {
            YearFilter::All => true,
            YearFilter::Year(y) => memo.analysis_year() == Some(y),
        };
        matches_search && matches_type && matches_year
    }
}

/// Case-insensitive substring match over title, company, thesis and tags.
/// `needle` must already be lowercased.
fn matches_search(memo: &MemoRecord, needle: &str) -> bool {
    memo.title.to_lowercase().contains(needle)
        || memo.company.to_lowercase().contains(needle)
        || memo.thesis_one_liner.to_lowercase().contains(needle)
        || memo.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// Records the caller may see: Public always, Private only when unlocked.
pub fn visible(all: &[MemoRecord], unlocked: bool) -> Vec<&MemoRecord> {
    all.iter().filter(|m| m.is_visible(unlocked)).collect()
}

/// Newest first. Unparsable dates sort after every dated record.
fn newest_first(a: &MemoRecord, b: &MemoRecord) -> Ordering {
    match (a.published_at(), b.published_at()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort by `date_published`, newest first.
pub fn sort_newest_first(memos: &mut [&MemoRecord]) {
    memos.sort_by(|a, b| newest_first(a, b));
}

/// Run a query: visibility, search, type and year filters, then sort.
pub fn query<'a>(all: &'a [MemoRecord], unlocked: bool, spec: &FilterSpec) -> Vec<&'a MemoRecord> {
    query_with_counts(all, unlocked, spec).memos
}

/// Query result plus the size of the visible set it was drawn from.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome<'a> {
    pub memos: Vec<&'a MemoRecord>,
    pub visible_total: usize,
}

pub fn query_with_counts<'a>(
    all: &'a [MemoRecord],
    unlocked: bool,
    spec: &FilterSpec,
) -> QueryOutcome<'a> {
    let visible = visible(all, unlocked);
    let visible_total = visible.len();

    let needle = spec.search_term.to_lowercase();
    let mut memos: Vec<&MemoRecord> = visible
        .into_iter()
        .filter(|m| spec.matches(m, &needle))
        .collect();
    sort_newest_first(&mut memos);

    QueryOutcome {
        memos,
        visible_total,
    }
}

/// Filter-control options derived from a visible memo set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// `All` then distinct types in first-seen order
    pub memo_types: Vec<TypeFilter>,
    /// `All` then distinct analysis years, newest first
    pub years: Vec<YearFilter>,
}

impl Facets {
    pub fn derive(visible: &[&MemoRecord]) -> Self {
        let mut memo_types = vec![TypeFilter::All];
        for memo in visible {
            if memo.memo_type.is_empty() {
                continue;
            }
            let candidate = TypeFilter::Only(memo.memo_type.clone());
            if !memo_types.contains(&candidate) {
                memo_types.push(candidate);
            }
        }

        let distinct: BTreeSet<i32> = visible.iter().filter_map(|m| m.analysis_year()).collect();
        let mut years = vec![YearFilter::All];
        years.extend(distinct.into_iter().rev().map(YearFilter::Year));

        Self { memo_types, years }
    }
}

/// Facets over what the caller may see.
pub fn facets(all: &[MemoRecord], unlocked: bool) -> Facets {
    Facets::derive(&visible(all, unlocked))
}

/// The `limit` most recent Public memos.
pub fn recent_public(all: &[MemoRecord], limit: usize) -> Vec<&MemoRecord> {
    let mut public: Vec<&MemoRecord> = all
        .iter()
        .filter(|m| m.status == MemoStatus::Public)
        .collect();
    sort_newest_first(&mut public);
    public.truncate(limit);
    public
}

/// At most one memo with the given slug.
pub fn lookup_by_slug<'a>(all: &'a [MemoRecord], slug: &str) -> Option<&'a MemoRecord> {
    all.iter().find(|m| m.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slugs(memos: &[&MemoRecord]) -> Vec<String> {
        memos.iter().map(|m| m.slug.clone()).collect()
    }

    fn scenario() -> Vec<MemoRecord> {
        vec![
            MemoRecord::new("a", "Alpha Corp")
                .with_published("2024-01-10")
                .with_type("RX")
                .with_tag("RX")
                .with_tag("Retail"),
            MemoRecord::new("b", "Beta Co")
                .with_status(MemoStatus::Private)
                .with_published("2024-06-01")
                .with_type("RX")
                .with_tag("RX"),
        ]
    }

    fn library() -> Vec<MemoRecord> {
        vec![
            MemoRecord::new("acme", "Acme Holdings")
                .with_company("Acme Inc")
                .with_thesis("Second lien is the fulcrum")
                .with_type("RX")
                .with_published("2023-03-01")
                .with_analysis_date("2022-11-20")
                .with_tag("Industrials"),
            MemoRecord::new("zeta", "Zeta Retail")
                .with_company("Zeta Stores")
                .with_thesis("Liquidation value exceeds the term loan")
                .with_type("Distressed Credit")
                .with_published("2024-05-15")
                .with_analysis_date("2024-04-01")
                .with_tag("Retail"),
            MemoRecord::new("omega", "Omega Telecom")
                .with_status(MemoStatus::Private)
                .with_company("Omega")
                .with_thesis("Spectrum sale repays the converts")
                .with_type("Special Sits")
                .with_published("2024-09-01")
                .with_analysis_date("2024-08-15")
                .with_tag("TMT"),
            MemoRecord::new("lessons", "What I got wrong")
                .with_type("RX")
                .with_published("2022-12-31")
                .with_analysis_date("2022-12-01")
                .with_tag("Lessons"),
        ]
    }

    #[test]
    fn test_scenario_locked() {
        let input = scenario();
        let result = query(&input, false, &FilterSpec::match_all());
        assert_eq!(slugs(&result), vec!["a"]);
    }

    #[test]
    fn test_scenario_unlocked() {
        let input = scenario();
        let result = query(&input, true, &FilterSpec::match_all());
        assert_eq!(slugs(&result), vec!["b", "a"]);
    }

    #[test]
    fn test_scenario_search() {
        let input = scenario();
        let result = query(&input, true, &FilterSpec::match_all().with_search("beta"));
        assert_eq!(slugs(&result), vec!["b"]);
    }

    #[test]
    fn test_match_all_is_sorted_visible_set() {
        let input = library();
        let result = query(&input, false, &FilterSpec::match_all());
        assert_eq!(slugs(&result), vec!["zeta", "acme", "lessons"]);

        let result = query(&input, true, &FilterSpec::match_all());
        assert_eq!(slugs(&result), vec!["omega", "zeta", "acme", "lessons"]);
    }

    #[test]
    fn test_locked_never_returns_private() {
        let input = library();
        let specs = [
            FilterSpec::match_all(),
            FilterSpec::match_all().with_search("omega"),
            FilterSpec::match_all().with_type(TypeFilter::Only("Special Sits".into())),
            FilterSpec::match_all().with_year(YearFilter::Year(2024)),
        ];
        for spec in &specs {
            let result = query(&input, false, spec);
            assert!(result.iter().all(|m| m.status == MemoStatus::Public), "{:?}", spec);
        }
    }

    #[test]
    fn test_unlocked_private_obeys_filters() {
        let input = library();
        let spec = FilterSpec::match_all().with_type(TypeFilter::Only("RX".into()));
        let result = query(&input, true, &spec);
        assert_eq!(slugs(&result), vec!["acme", "lessons"]);
    }

    #[test]
    fn test_search_fields_case_insensitive() {
        let input = library();
        let search = |term: &str| slugs(&query(&input, true, &FilterSpec::match_all().with_search(term)));

        assert_eq!(search("ACME HOLD"), vec!["acme"]);
        assert_eq!(search("zeta stores"), vec!["zeta"]);
        assert_eq!(search("FULCRUM"), vec!["acme"]);
        assert_eq!(search("tmt"), vec!["omega"]);
        assert_eq!(search("retail"), vec!["zeta"]);
        assert!(search("nonexistent").is_empty());
    }

    #[test]
    fn test_search_completeness() {
        let input = library();
        let term = "e";
        let result = query(&input, true, &FilterSpec::match_all().with_search(term));
        let expected = input
            .iter()
            .filter(|m| matches_search(m, term))
            .count();
        assert_eq!(result.len(), expected);
        assert!(result.iter().all(|m| matches_search(m, term)));
    }

    #[test]
    fn test_search_is_substring_not_tokens() {
        let input = library();
        let result = query(&input, true, &FilterSpec::match_all().with_search("lien is"));
        assert_eq!(slugs(&result), vec!["acme"]);

        let result = query(&input, true, &FilterSpec::match_all().with_search("lien fulcrum"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_year_filter_uses_analysis_date() {
        let input = library();
        let spec = FilterSpec::match_all().with_year(YearFilter::Year(2022));
        // acme was published in 2023 but analysed in 2022
        assert_eq!(slugs(&query(&input, false, &spec)), vec!["acme", "lessons"]);
    }

    #[test]
    fn test_filters_combine() {
        let input = library();
        let spec = FilterSpec::match_all()
            .with_search("w")
            .with_type(TypeFilter::Only("RX".into()))
            .with_year(YearFilter::Year(2022));
        assert_eq!(slugs(&query(&input, true, &spec)), vec!["lessons"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let input = vec![
            MemoRecord::new("first", "First").with_published("2024-02-02"),
            MemoRecord::new("newer", "Newer").with_published("2024-03-03"),
            MemoRecord::new("second", "Second").with_published("2024-02-02"),
            MemoRecord::new("third", "Third").with_published("2024-02-02T00:00:00Z"),
        ];
        let result = query(&input, false, &FilterSpec::match_all());
        assert_eq!(slugs(&result), vec!["newer", "first", "second", "third"]);
    }

    #[test]
    fn test_sort_parses_dates() {
        // String order would rank "offset" above "stamp"
        let input = vec![
            MemoRecord::new("iso", "Iso").with_published("2024-02-01"),
            MemoRecord::new("offset", "Offset").with_published("2024-02-01T01:00:00+05:00"),
            MemoRecord::new("stamp", "Stamp").with_published("2024-01-31T23:00:00Z"),
        ];
        let result = query(&input, false, &FilterSpec::match_all());
        assert_eq!(slugs(&result), vec!["iso", "stamp", "offset"]);
    }

    #[test]
    fn test_missing_dates_still_match_all() {
        let input = vec![
            MemoRecord::new("undated", "Undated").with_type("RX"),
            MemoRecord::new("dated", "Dated")
                .with_type("RX")
                .with_published("2024-01-01")
                .with_analysis_date("2023-12-01"),
            MemoRecord::new("garbled", "Garbled")
                .with_type("RX")
                .with_published("soon")
                .with_analysis_date("someday"),
        ];

        let all = query(&input, false, &FilterSpec::match_all());
        assert_eq!(slugs(&all), vec!["dated", "undated", "garbled"]);

        let by_type = query(
            &input,
            false,
            &FilterSpec::match_all().with_type(TypeFilter::Only("RX".into())),
        );
        assert_eq!(by_type.len(), 3);

        let by_year = query(
            &input,
            false,
            &FilterSpec::match_all().with_year(YearFilter::Year(2023)),
        );
        assert_eq!(slugs(&by_year), vec!["dated"]);
    }

    #[test]
    fn test_empty_input() {
        let input: Vec<MemoRecord> = Vec::new();
        assert!(query(&input, true, &FilterSpec::match_all()).is_empty());

        let facets = facets(&input, true);
        assert_eq!(facets.memo_types, vec![TypeFilter::All]);
        assert_eq!(facets.years, vec![YearFilter::All]);
    }

    #[test]
    fn test_facets() {
        let input = library();

        let locked = facets(&input, false);
        assert_eq!(
            locked.memo_types,
            vec![
                TypeFilter::All,
                TypeFilter::Only("RX".into()),
                TypeFilter::Only("Distressed Credit".into()),
            ]
        );
        assert_eq!(
            locked.years,
            vec![YearFilter::All, YearFilter::Year(2024), YearFilter::Year(2022)]
        );

        let unlocked = facets(&input, true);
        assert_eq!(unlocked.memo_types.len(), 4);
        assert_eq!(unlocked.years[1], YearFilter::Year(2024));
    }

    #[test]
    fn test_year_facets_skip_unparsable_analysis_date() {
        let input = vec![
            MemoRecord::new("good", "Good").with_analysis_date("2021-05-05"),
            MemoRecord::new("bad", "Bad").with_analysis_date("n/a"),
            MemoRecord::new("none", "None"),
        ];
        assert_eq!(
            facets(&input, false).years,
            vec![YearFilter::All, YearFilter::Year(2021)]
        );
    }

    #[test]
    fn test_year_bucket_uses_written_offset() {
        let input = vec![MemoRecord::new("early", "Early").with_analysis_date("2024-01-01T00:30:00+02:00")];
        let spec = FilterSpec::match_all().with_year(YearFilter::Year(2024));

        assert_eq!(slugs(&query(&input, false, &spec)), vec!["early"]);
        assert_eq!(
            facets(&input, false).years,
            vec![YearFilter::All, YearFilter::Year(2024)]
        );
    }

    #[test]
    fn test_query_with_counts() {
        let input = library();
        let outcome = query_with_counts(&input, false, &FilterSpec::match_all().with_search("zeta"));
        assert_eq!(outcome.memos.len(), 1);
        assert_eq!(outcome.visible_total, 3);
    }

    #[test]
    fn test_recent_public() {
        let input = library();
        assert_eq!(slugs(&recent_public(&input, 2)), vec!["zeta", "acme"]);
        assert_eq!(recent_public(&input, 10).len(), 3);
    }

    #[test]
    fn test_lookup_by_slug() {
        let input = library();
        assert_eq!(lookup_by_slug(&input, "zeta").map(|m| m.title.as_str()), Some("Zeta Retail"));
        assert!(lookup_by_slug(&input, "missing").is_none());
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("All".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!("all".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!(
            "RX".parse::<TypeFilter>().unwrap(),
            TypeFilter::Only("RX".into())
        );

        assert_eq!("all".parse::<YearFilter>().unwrap(), YearFilter::All);
        assert_eq!("2024".parse::<YearFilter>().unwrap(), YearFilter::Year(2024));
        assert!("twenty".parse::<YearFilter>().is_err());
    }

    #[test]
    fn test_facet_serialization() {
        let input = scenario();
        let json = serde_json::to_string(&facets(&input, false)).unwrap();
        assert_eq!(json, r#"{"memo_types":["All","RX"],"years":["All"]}"#);
    }
}
