use crate::cli::CommonArgs;
use crate::config::CalendarConfig;
use crate::model::{ActivityLevel, CalendarDay, CalendarReport, CommitRecord};
use crate::util::days_in_year;
use chrono::{Datelike, NaiveDate};
use console::style;

pub fn exec(common: CommonArgs, year: Option<i32>, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let loaded = crate::source::load(&common)?;
    let year = year.unwrap_or_else(crate::source::current_year);
    let in_year = crate::source::commits_in_year(&loaded.commits, year);
    let report = build(&in_year, year, &loaded.config.calendar);

    if json {
        crate::output::print_json(&report, &loaded.source, &common)?;
    } else if ndjson {
        crate::output::print_ndjson(&report.days)?;
    } else {
        output_grid(&report)?;
    }

    Ok(())
}

/// Dense per-day commit counts for `year`, Jan 1 first.
///
/// Callers are expected to pass commits already restricted to `year`; anything
/// else is skipped and counted in `outside_year`.
pub fn build(commits: &[CommitRecord], year: i32, config: &CalendarConfig) -> CalendarReport {
    let Some(jan1) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        tracing::warn!(event = "calendar.invalid_year", year, "Year out of calendar range");
        return CalendarReport {
            year,
            days: Vec::new(),
            max_count: 0,
            leading_offset: 0,
            total_commits: 0,
            outside_year: commits.len() as u32,
        };
    };

    let mut counts = vec![0u32; days_in_year(year) as usize];
    let mut outside_year = 0u32;
    for commit in commits {
        let date = commit.timestamp.date_naive();
        if date.year() != year {
            outside_year += 1;
            continue;
        }
        counts[date.ordinal0() as usize] += 1;
    }

    if outside_year > 0 {
        tracing::warn!(
            event = "calendar.commits_outside_year",
            year,
            skipped = outside_year,
            "Commits outside the target year were not counted"
        );
    }

    let max_count = counts.iter().copied().max().unwrap_or(0);
    let total_commits = counts.iter().sum();

    let days = jan1
        .iter_days()
        .zip(counts)
        .map(|(date, commit_count)| CalendarDay {
            date,
            label: day_label(date),
            commit_count,
            level: activity_level(commit_count, max_count, config),
        })
        .collect();

    CalendarReport {
        year,
        days,
        max_count,
        leading_offset: leading_offset(jan1),
        total_commits,
        outside_year,
    }
}

/// Filler cells before Jan 1 in a Monday-first grid. A Sunday start gets none.
pub fn leading_offset(first_day: NaiveDate) -> u32 {
    match first_day.weekday().num_days_from_sunday() {
        0 => 0,
        weekday => weekday - 1,
    }
}

pub fn activity_level(count: u32, max_count: u32, config: &CalendarConfig) -> ActivityLevel {
    if count == 0 {
        return ActivityLevel::None;
    }
    let max = max_count as f64;
    let count = count as f64;
    if count > max * config.peak {
        ActivityLevel::Peak
    } else if count > max * config.high {
        ActivityLevel::High
    } else if count > max * config.medium {
        ActivityLevel::Medium
    } else {
        ActivityLevel::Low
    }
}

fn day_label(date: NaiveDate) -> String {
    date.format("%A, %-d %b, %Y").to_string()
}

fn output_grid(report: &CalendarReport) -> anyhow::Result<()> {
    println!("{}", style(format!("Commit Grid {}", report.year)).bold());
    if report.max_count == 0 {
        println!("No commits were made in {}.", report.year);
        return Ok(());
    }
    println!(
        "The most commits in a day was {} ({} commits this year).",
        style(report.max_count).cyan(),
        report.total_commits
    );
    println!("{}", "─".repeat(60));

    // columns are weeks, rows are weekdays starting on Monday
    let mut rows = vec![String::new(); 7];
    let cells = (0..report.leading_offset)
        .map(|_| None)
        .chain(report.days.iter().map(Some));
    for (i, cell) in cells.enumerate() {
        let glyph = match cell.map(|d| d.level) {
            None => style(" ").dim(),
            Some(ActivityLevel::None) => style("·").dim(),
            Some(ActivityLevel::Low) => style("░").red(),
            Some(ActivityLevel::Medium) => style("▒").red(),
            Some(ActivityLevel::High) => style("▓").red(),
            Some(ActivityLevel::Peak) => style("█").red(),
        };
        rows[i % 7].push_str(&glyph.to_string());
    }
    for (label, row) in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].iter().zip(rows) {
        println!("{label} {row}");
    }

    println!("\n{}  less {} more", style("Legend").bold(), style("·░▒▓█").red());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::commit_at;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn dense_days_for_regular_and_leap_years() {
        let config = CalendarConfig::default();
        assert_eq!(build(&[], 2025, &config).days.len(), 365);
        assert_eq!(build(&[], 2024, &config).days.len(), 366);
    }

    #[test]
    fn empty_year_is_a_zero_state() {
        let report = build(&[], 2025, &CalendarConfig::default());
        assert_eq!(report.max_count, 0);
        assert_eq!(report.total_commits, 0);
        assert!(report.days.iter().all(|d| d.commit_count == 0 && d.level == ActivityLevel::None));
    }

    #[test]
    fn counts_sum_to_in_year_commits() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        let commits: Vec<_> = (0..50)
            .map(|i| commit_at(&format!("c{i}"), start + Duration::hours(i * 53), 1, 0))
            .collect();
        let report = build(&commits, 2024, &CalendarConfig::default());

        let sum: u32 = report.days.iter().map(|d| d.commit_count).sum();
        assert_eq!(sum, 50);
        assert_eq!(report.total_commits, 50);
        assert_eq!(report.outside_year, 0);
    }

    #[test]
    fn days_are_chronological_with_unique_labels() {
        let report = build(&[], 2025, &CalendarConfig::default());
        assert!(report.days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(report.days[0].label, "Wednesday, 1 Jan, 2025");
        assert_eq!(report.days[364].label, "Wednesday, 31 Dec, 2025");

        let mut labels: Vec<_> = report.days.iter().map(|d| d.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 365);
    }

    #[test]
    fn tracks_busiest_day() {
        let day = Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap();
        let mut commits: Vec<_> = (0..4).map(|i| commit_at(&format!("c{i}"), day, 1, 0)).collect();
        commits.push(commit_at("other", day + Duration::days(2), 1, 0));

        let report = build(&commits, 2025, &CalendarConfig::default());
        assert_eq!(report.max_count, 4);
        let busiest = report.days.iter().find(|d| d.commit_count == 4).unwrap();
        assert_eq!(busiest.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(busiest.level, ActivityLevel::Peak);
    }

    #[test]
    fn commits_outside_year_are_skipped() {
        let commits = vec![
            commit_at("in", Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(), 1, 0),
            commit_at("out", Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap(), 1, 0),
        ];
        let report = build(&commits, 2025, &CalendarConfig::default());
        assert_eq!(report.total_commits, 1);
        assert_eq!(report.outside_year, 1);
    }

    #[test]
    fn leading_offset_is_monday_aligned() {
        // 2025-01-01 is a Wednesday
        assert_eq!(leading_offset(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()), 2);
        // 2024-01-01 is a Monday
        assert_eq!(leading_offset(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), 0);
        // 2023-01-01 is a Sunday
        assert_eq!(leading_offset(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()), 0);
        // 2022-01-01 is a Saturday
        assert_eq!(leading_offset(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()), 5);
        assert_eq!(build(&[], 2025, &CalendarConfig::default()).leading_offset, 2);
    }

    #[test]
    fn activity_tiers_are_relative_to_max() {
        let config = CalendarConfig::default();
        assert_eq!(activity_level(0, 10, &config), ActivityLevel::None);
        assert_eq!(activity_level(9, 10, &config), ActivityLevel::Peak);
        assert_eq!(activity_level(8, 10, &config), ActivityLevel::High);
        assert_eq!(activity_level(7, 10, &config), ActivityLevel::High);
        assert_eq!(activity_level(5, 10, &config), ActivityLevel::Medium);
        assert_eq!(activity_level(4, 10, &config), ActivityLevel::Low);
        assert_eq!(activity_level(1, 10, &config), ActivityLevel::Low);
    }
}
