use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// A single commit as seen by the analytics components. Never mutated after ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub added: u64,
    pub removed: u64,
    pub message: String,
    pub files_touched: u32,
    /// Paths touched, when the source reports them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl CommitRecord {
    pub fn net_lines(&self) -> i64 {
        self.added as i64 - self.removed as i64
    }

    pub fn lines_changed(&self) -> u64 {
        self.added + self.removed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::BiWeekly => "bi-weekly",
            Granularity::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub key: String,
    pub added: u64,
    pub removed: u64,
    pub cumulative_lines: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendReport {
    pub granularity: Granularity,
    pub days_span: i64,
    pub buckets: Vec<TimeBucket>,
}

/// Relative intensity of a calendar day against the busiest day of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    None,
    Low,
    Medium,
    High,
    Peak,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub label: String,
    pub commit_count: u32,
    pub level: ActivityLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarReport {
    pub year: i32,
    pub days: Vec<CalendarDay>,
    pub max_count: u32,
    pub leading_offset: u32,
    pub total_commits: u32,
    pub outside_year: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u32,
}

/// Per-keyword commit counts, in keyword priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTally {
    pub counts: Vec<KeywordCount>,
}

impl KeywordTally {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self {
            counts: keywords
                .iter()
                .map(|k| KeywordCount {
                    keyword: k.as_ref().to_string(),
                    count: 0,
                })
                .collect(),
        }
    }

    pub fn get(&self, keyword: &str) -> u32 {
        self.counts
            .iter()
            .find(|c| c.keyword == keyword)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|c| c.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequencyEntry {
    pub text: String,
    pub appearances: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReport {
    pub keywords: KeywordTally,
    pub top_words: Vec<WordFrequencyEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorCount {
    pub author: String,
    pub commits: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTouchCount {
    pub file: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSize {
    pub hash: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub added: u64,
    pub removed: u64,
    pub lines_changed: u64,
}

/// Monday-to-Sunday week with the most commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusiestWeek {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub commits: u32,
    pub added: u64,
    pub removed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    pub year: i32,
    pub top_files: Vec<FileTouchCount>,
    pub biggest_commits: Vec<CommitSize>,
    pub busiest_week: Option<BusiestWeek>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub total_commits: usize,
    pub total_added: u64,
    pub total_removed: u64,
    pub net_lines: i64,
    pub total_contributors: usize,
    pub top_contributors: Vec<ContributorCount>,
    pub first_commit: Option<DateTime<Utc>>,
    pub last_commit: Option<DateTime<Utc>>,
    pub year: i32,
    pub commits_this_year: usize,
    pub has_commits_this_year: bool,
}

/// Envelope written by `--json`; `data` holds the command-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output<T> {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub since: Option<String>,
    pub until: Option<String>,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullReport {
    pub summary: RepoSummary,
    pub trend: Option<TrendReport>,
    pub calendar: CalendarReport,
    pub messages: MessageReport,
    pub files: Vec<DistributionBucket>,
    pub highlights: Highlights,
}

#[derive(Debug, Clone)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new() -> Self {
        Self { since: None, until: None }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        if let Some(since) = self.since {
            if timestamp < &since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if timestamp > &until {
                return false;
            }
        }
        true
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_range_bounds_are_inclusive() {
        let since = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        let range = DateRange::new().with_since(since).with_until(until);

        assert!(range.contains(&since));
        assert!(range.contains(&until));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap()));
        assert!(DateRange::default().contains(&since));
    }

    #[test]
    fn keyword_tally_lookup() {
        let mut tally = KeywordTally::new(&["wtf", "todo"]);
        tally.counts[1].count = 4;
        assert_eq!(tally.get("todo"), 4);
        assert_eq!(tally.get("wtf"), 0);
        assert_eq!(tally.get("missing"), 0);
        assert_eq!(tally.total(), 4);
    }
}
