use crate::cli::CommonArgs;
use crate::config::TrendConfig;
use crate::error::{GitbackError, Result};
use crate::model::{CommitRecord, Granularity, TimeBucket, TrendReport};
use crate::util::BucketKey;
use anyhow::Context;
use console::style;
use std::collections::HashMap;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let loaded = crate::source::load(&common)?;
    let report = aggregate(&loaded.commits, &loaded.config.trend)
        .context("Failed to compute line trend")?;

    if json {
        crate::output::print_json(&report, &loaded.source, &common)?;
    } else if ndjson {
        crate::output::print_ndjson(&report.buckets)?;
    } else {
        output_table(&report)?;
    }

    Ok(())
}

/// Granularity is a pure function of the span between the oldest and newest commit.
pub fn select_granularity(days_span: i64, config: &TrendConfig) -> Granularity {
    if days_span <= config.daily_max_days {
        Granularity::Daily
    } else if days_span <= config.weekly_max_days {
        Granularity::Weekly
    } else if days_span <= config.biweekly_max_days {
        Granularity::BiWeekly
    } else {
        Granularity::Monthly
    }
}

/// Bucket commits over time and accumulate net lines in chronological order.
pub fn aggregate(commits: &[CommitRecord], config: &TrendConfig) -> Result<TrendReport> {
    let (min, max) = commits
        .iter()
        .map(|c| c.timestamp)
        .fold(None, |acc, ts| match acc {
            None => Some((ts, ts)),
            Some((lo, hi)) => Some((lo.min(ts), hi.max(ts))),
        })
        .ok_or(GitbackError::NoData)?;

    let days_span = (max - min).num_days();
    let granularity = select_granularity(days_span, config);

    let mut bucket_map: HashMap<BucketKey, (u64, u64)> = HashMap::new();
    for commit in commits {
        let key = BucketKey::for_timestamp(&commit.timestamp, granularity);
        let entry = bucket_map.entry(key).or_insert((0, 0));
        entry.0 += commit.added;
        entry.1 += commit.removed;
    }

    let mut keyed: Vec<_> = bucket_map.into_iter().collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut cumulative = 0i64;
    let buckets = keyed
        .into_iter()
        .map(|(key, (added, removed))| {
            cumulative += added as i64 - removed as i64;
            TimeBucket {
                key: key.to_string(),
                added,
                removed,
                cumulative_lines: cumulative,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        event = "trend.aggregated",
        commits = commits.len(),
        days_span,
        %granularity,
        buckets = buckets.len(),
        "Aggregated line trend"
    );

    Ok(TrendReport {
        granularity,
        days_span,
        buckets,
    })
}

fn output_table(report: &TrendReport) -> anyhow::Result<()> {
    println!(
        "{} ({} buckets over {} days)",
        style("Cumulative Lines Over Time").bold(),
        report.granularity,
        report.days_span
    );
    println!("{}", "─".repeat(60));
    println!(
        "{:<14} {:>10} {:>10} {:>14}",
        style("Period").bold(),
        style("Added").bold(),
        style("Removed").bold(),
        style("Total lines").bold()
    );
    for bucket in &report.buckets {
        println!(
            "{:<14} {:>10} {:>10} {:>14}",
            bucket.key,
            style(format!("+{}", bucket.added)).green(),
            style(format!("-{}", bucket.removed)).red(),
            bucket.cumulative_lines
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::commit_at;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn span_commits(days: i64) -> Vec<CommitRecord> {
        let start = Utc.with_ymd_and_hms(2022, 3, 1, 9, 0, 0).unwrap();
        vec![
            commit_at("a", start, 1, 0),
            commit_at("b", start + Duration::days(days), 1, 0),
        ]
    }

    #[test]
    fn granularity_boundaries() {
        let config = TrendConfig::default();
        let cases = [
            (0, Granularity::Daily),
            (90, Granularity::Daily),
            (91, Granularity::Weekly),
            (365, Granularity::Weekly),
            (366, Granularity::BiWeekly),
            (730, Granularity::BiWeekly),
            (731, Granularity::Monthly),
        ];
        for (days, expected) in cases {
            assert_eq!(select_granularity(days, &config), expected, "span of {days} days");
            let report = aggregate(&span_commits(days), &config).unwrap();
            assert_eq!(report.granularity, expected, "aggregate over {days} days");
            assert_eq!(report.days_span, days);
        }
    }

    #[test]
    fn partial_days_are_floored() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let commits = vec![
            commit_at("a", start, 1, 0),
            commit_at("b", start + Duration::days(90) + Duration::hours(23), 1, 0),
        ];
        let report = aggregate(&commits, &TrendConfig::default()).unwrap();
        assert_eq!(report.days_span, 90);
        assert_eq!(report.granularity, Granularity::Daily);
    }

    #[test]
    fn empty_input_is_no_data() {
        let err = aggregate(&[], &TrendConfig::default()).unwrap_err();
        assert!(matches!(err, GitbackError::NoData));
    }

    #[test]
    fn same_day_commits_share_a_bucket() {
        let day = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        let lines = [(10, 2), (5, 0), (0, 3), (8, 1), (2, 2)];
        let mut commits: Vec<_> = lines
            .iter()
            .enumerate()
            .map(|(i, &(a, r))| commit_at(&format!("c{i}"), day + Duration::hours(i as i64), a, r))
            .collect();
        // a second commit 120 days later forces weekly buckets
        commits.push(commit_at("late", day + Duration::days(120), 1, 0));

        let report = aggregate(&commits, &TrendConfig::default()).unwrap();
        assert_eq!(report.granularity, Granularity::Weekly);
        assert_eq!(
            report.buckets[0],
            TimeBucket {
                key: "2024-W4".to_string(),
                added: 25,
                removed: 8,
                cumulative_lines: 17,
            }
        );
        assert_eq!(report.buckets.len(), 2);
        assert_eq!(report.buckets[1].cumulative_lines, 18);
    }

    #[test]
    fn weekly_buckets_sort_chronologically_not_lexically() {
        let commits = vec![
            commit_at("w10", Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap(), 4, 0),
            commit_at("w9", Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap(), 2, 0),
            commit_at("w0", Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(), 1, 0),
            commit_at("w40", Utc.with_ymd_and_hms(2024, 10, 8, 0, 0, 0).unwrap(), 1, 5),
        ];
        let report = aggregate(&commits, &TrendConfig::default()).unwrap();
        let keys: Vec<_> = report.buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-W0", "2024-W9", "2024-W10", "2024-W40"]);
        let cumulative: Vec<_> = report.buckets.iter().map(|b| b.cumulative_lines).collect();
        assert_eq!(cumulative, vec![1, 3, 7, 3]);
    }

    #[test]
    fn monthly_buckets_cross_years_in_order() {
        let commits = vec![
            commit_at("late", Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap(), 3, 1),
            commit_at("early", Utc.with_ymd_and_hms(2021, 11, 3, 0, 0, 0).unwrap(), 10, 0),
            commit_at("mid", Utc.with_ymd_and_hms(2022, 11, 20, 0, 0, 0).unwrap(), 0, 4),
            commit_at("mid2", Utc.with_ymd_and_hms(2022, 11, 1, 0, 0, 0).unwrap(), 1, 1),
        ];
        let report = aggregate(&commits, &TrendConfig::default()).unwrap();
        assert_eq!(report.granularity, Granularity::Monthly);
        let keys: Vec<_> = report.buckets.iter().map(|b| b.key.clone()).collect();
        assert_eq!(keys, vec!["2021-11", "2022-11", "2024-02"]);
        assert_eq!(report.buckets[1].added, 1);
        assert_eq!(report.buckets[1].removed, 5);
    }

    #[test]
    fn last_cumulative_equals_net_lines() {
        let start = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        let commits: Vec<_> = (0..40)
            .map(|i| commit_at(&format!("c{i}"), start + Duration::days(i * 17), (i * 7 % 23) as u64, (i * 5 % 11) as u64))
            .collect();
        let expected: i64 = commits.iter().map(|c| c.net_lines()).sum();

        let report = aggregate(&commits, &TrendConfig::default()).unwrap();
        assert_eq!(report.buckets.last().unwrap().cumulative_lines, expected);
    }
}
