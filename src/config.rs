//! Tunable thresholds for the analytics components.
//!
//! Every component takes its slice of [`AnalyticsConfig`] explicitly. The
//! defaults reproduce the standard gitback report; a TOML file passed with
//! `--config` can override any section, missing keys fall back to defaults.

use crate::error::{GitbackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_KEYWORDS: [&str; 6] = ["wtf", "fixme", "todo", "hack", "test", "please"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub trend: TrendConfig,
    pub calendar: CalendarConfig,
    pub messages: MessageConfig,
    pub distribution: DistributionConfig,
    pub highlights: HighlightConfig,
}

/// Upper bounds (inclusive, in days) of the commit date span for each granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub daily_max_days: i64,
    pub weekly_max_days: i64,
    pub biweekly_max_days: i64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            daily_max_days: 90,
            weekly_max_days: 365,
            biweekly_max_days: 730,
        }
    }
}

/// Fractions of the busiest day above which a day reaches each activity level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub peak: f64,
    pub high: f64,
    pub medium: f64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            peak: 0.8,
            high: 0.65,
            medium: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Keywords in priority order; a commit counts toward the first one it contains.
    pub keywords: Vec<String>,
    pub top_words_limit: usize,
    pub min_word_len: usize,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            top_words_limit: 20,
            min_word_len: 3,
        }
    }
}

impl MessageConfig {
    /// Messages are lowercased before matching, so keywords must be too.
    pub fn normalize_keywords(&mut self) {
        for keyword in &mut self.keywords {
            *keyword = keyword.trim().to_lowercase();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSpec {
    pub label: String,
    pub min: u32,
    /// Inclusive upper bound; `None` for the open-ended top bucket.
    pub max: Option<u32>,
}

impl BucketSpec {
    fn new(label: &str, min: u32, max: Option<u32>) -> Self {
        Self {
            label: label.to_string(),
            min,
            max,
        }
    }

    pub fn contains(&self, files_touched: u32) -> bool {
        files_touched >= self.min && self.max.map_or(true, |max| files_touched <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    pub buckets: Vec<BucketSpec>,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        // commits touching no files at all are folded into the lowest bucket
        Self {
            buckets: vec![
                BucketSpec::new("1", 0, Some(1)),
                BucketSpec::new("2-15", 2, Some(15)),
                BucketSpec::new("16-30", 16, Some(30)),
                BucketSpec::new("31-70", 31, Some(70)),
                BucketSpec::new("71-200", 71, Some(200)),
                BucketSpec::new("200+", 201, None),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub top_files_limit: usize,
    pub biggest_commits_limit: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            top_files_limit: 100,
            biggest_commits_limit: 5,
        }
    }
}

impl AnalyticsConfig {
    /// Load from `path` when given, defaults otherwise. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)?;
                let mut config: AnalyticsConfig = toml::from_str(&raw)?;
                config.messages.normalize_keywords();
                tracing::debug!(
                    event = "config.loaded",
                    path = %p.display(),
                    "Loaded analytics config"
                );
                config
            }
            None => AnalyticsConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.trend;
        if t.daily_max_days < 0
            || t.daily_max_days > t.weekly_max_days
            || t.weekly_max_days > t.biweekly_max_days
        {
            return Err(GitbackError::Config(format!(
                "trend thresholds must be non-negative and ascending, got {}/{}/{}",
                t.daily_max_days, t.weekly_max_days, t.biweekly_max_days
            )));
        }

        let c = &self.calendar;
        if !(0.0..=1.0).contains(&c.medium) || c.medium > c.high || c.high > c.peak || c.peak > 1.0 {
            return Err(GitbackError::Config(format!(
                "calendar thresholds must satisfy 0 <= medium <= high <= peak <= 1, got {}/{}/{}",
                c.medium, c.high, c.peak
            )));
        }

        if self.messages.keywords.is_empty() {
            return Err(GitbackError::Config("keyword list is empty".to_string()));
        }
        if let Some(bad) = self
            .messages
            .keywords
            .iter()
            .find(|k| k.is_empty() || k.contains(char::is_whitespace) || k.to_lowercase() != **k)
        {
            return Err(GitbackError::Config(format!(
                "keyword {bad:?} must be a single lowercase word"
            )));
        }

        validate_buckets(&self.distribution.buckets)
    }
}

/// Buckets must start at 0, follow each other without gaps or overlaps,
/// and end with a single open-ended bucket.
fn validate_buckets(buckets: &[BucketSpec]) -> Result<()> {
    let mut expected_min = 0u32;
    for (i, bucket) in buckets.iter().enumerate() {
        if bucket.min != expected_min {
            return Err(GitbackError::Config(format!(
                "bucket '{}' starts at {} but {} was expected",
                bucket.label, bucket.min, expected_min
            )));
        }
        match bucket.max {
            Some(max) if max < bucket.min => {
                return Err(GitbackError::Config(format!(
                    "bucket '{}' has max {} below min {}",
                    bucket.label, max, bucket.min
                )));
            }
            Some(max) => expected_min = max.saturating_add(1),
            None if i + 1 == buckets.len() => return Ok(()),
            None => {
                return Err(GitbackError::Config(format!(
                    "open-ended bucket '{}' must be the last one",
                    bucket.label
                )));
            }
        }
    }
    Err(GitbackError::Config(
        "distribution buckets must end with an open-ended bucket".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        AnalyticsConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[messages]\ntop_words_limit = 5\n\n[trend]\ndaily_max_days = 30").unwrap();

        let config = AnalyticsConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.messages.top_words_limit, 5);
        assert_eq!(config.messages.keywords.len(), 6);
        assert_eq!(config.trend.daily_max_days, 30);
        assert_eq!(config.trend.weekly_max_days, 365);
        assert_eq!(config.distribution, DistributionConfig::default());
    }

    #[test]
    fn keywords_from_file_are_lowercased() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[messages]\nkeywords = [\"TODO\", \" Hack \"]").unwrap();

        let config = AnalyticsConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.messages.keywords, vec!["todo".to_string(), "hack".to_string()]);
    }

    #[test]
    fn rejects_uppercase_or_multiword_keywords() {
        let mut config = AnalyticsConfig::default();
        config.messages.keywords[0] = "WTF".to_string();
        assert!(matches!(config.validate(), Err(GitbackError::Config(_))));

        config.messages.keywords[0] = "two words".to_string();
        assert!(config.validate().is_err());

        config.messages.keywords[0] = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_gapped_buckets() {
        let mut config = AnalyticsConfig::default();
        config.distribution.buckets[2].min = 17;
        assert!(matches!(config.validate(), Err(GitbackError::Config(_))));
    }

    #[test]
    fn rejects_bounded_top_bucket() {
        let mut config = AnalyticsConfig::default();
        config.distribution.buckets.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_descending_trend_thresholds() {
        let mut config = AnalyticsConfig::default();
        config.trend.weekly_max_days = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bucket_bounds_are_inclusive() {
        let spec = BucketSpec::new("2-15", 2, Some(15));
        assert!(spec.contains(2));
        assert!(spec.contains(15));
        assert!(!spec.contains(16));
        assert!(BucketSpec::new("200+", 201, None).contains(u32::MAX));
    }
}
