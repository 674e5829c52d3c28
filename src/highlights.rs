use crate::cli::CommonArgs;
use crate::config::HighlightConfig;
use crate::model::{BusiestWeek, CommitRecord, CommitSize, FileTouchCount, Highlights};
use chrono::{Datelike, Duration, NaiveDate};
use console::style;
use std::collections::HashMap;

pub fn exec(common: CommonArgs, year: Option<i32>, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let loaded = crate::source::load(&common)?;
    let year = year.unwrap_or_else(crate::source::current_year);
    let highlights = build(&loaded.commits, year, &loaded.config.highlights);

    if json {
        crate::output::print_json(&highlights, &loaded.source, &common)?;
    } else if ndjson {
        crate::output::print_ndjson(&highlights.top_files)?;
    } else {
        output_highlights(&highlights);
    }

    Ok(())
}

/// Most-touched files over the whole history; biggest commits and the
/// busiest week over the commits of `year`.
pub fn build(commits: &[CommitRecord], year: i32, config: &HighlightConfig) -> Highlights {
    let this_year = crate::source::commits_in_year(commits, year);
    Highlights {
        year,
        top_files: top_files(commits, config.top_files_limit),
        biggest_commits: biggest_commits(&this_year, config.biggest_commits_limit),
        busiest_week: busiest_week(&this_year),
    }
}

/// Files ranked by the number of commits touching them, ties by path.
/// Commits without path information contribute nothing.
pub fn top_files(commits: &[CommitRecord], limit: usize) -> Vec<FileTouchCount> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for commit in commits {
        for file in &commit.files {
            *counts.entry(file.as_str()).or_insert(0) += 1;
        }
    }

    let mut files: Vec<FileTouchCount> = counts
        .into_iter()
        .map(|(file, count)| FileTouchCount {
            file: file.to_string(),
            count,
        })
        .collect();
    files.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.file.cmp(&b.file)));
    files.truncate(limit);
    files
}

/// Commits ranked by lines added plus removed. Ties go to the older commit.
pub fn biggest_commits(commits: &[CommitRecord], limit: usize) -> Vec<CommitSize> {
    let mut ranked: Vec<&CommitRecord> = commits.iter().collect();
    ranked.sort_by(|a, b| {
        b.lines_changed()
            .cmp(&a.lines_changed())
            .then_with(|| a.timestamp.cmp(&b.timestamp))
            .then_with(|| a.hash.cmp(&b.hash))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|c| CommitSize {
            hash: c.hash.clone(),
            author: c.author.clone(),
            timestamp: c.timestamp,
            message: c.message.clone(),
            added: c.added,
            removed: c.removed,
            lines_changed: c.lines_changed(),
        })
        .collect()
}

/// The Monday-start week with the most commits; the earliest one wins a tie.
pub fn busiest_week(commits: &[CommitRecord]) -> Option<BusiestWeek> {
    let mut weeks: HashMap<NaiveDate, (u32, u64, u64)> = HashMap::new();
    for commit in commits {
        let entry = weeks.entry(week_start(commit.timestamp.date_naive())).or_insert((0, 0, 0));
        entry.0 += 1;
        entry.1 += commit.added;
        entry.2 += commit.removed;
    }

    let (start, (commits, added, removed)) = weeks
        .into_iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then_with(|| b.0.cmp(&a.0)))?;

    Some(BusiestWeek {
        start,
        end: start + Duration::days(6),
        commits,
        added,
        removed,
    })
}

fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

fn output_highlights(highlights: &Highlights) {
    println!("{}", style(format!("Highlights {}", highlights.year)).bold());
    println!("{}", "─".repeat(50));

    match &highlights.busiest_week {
        Some(week) => println!(
            "Busiest week: {} to {}, {} commits ({} / {})",
            week.start,
            week.end,
            style(week.commits).cyan(),
            style(format!("+{}", week.added)).green(),
            style(format!("-{}", week.removed)).red()
        ),
        None => println!("No commits were made in {}.", highlights.year),
    }

    if !highlights.biggest_commits.is_empty() {
        println!("\n{}", style("Biggest Commits").bold());
        for c in &highlights.biggest_commits {
            let short = c.hash.get(..7).unwrap_or(&c.hash);
            println!(
                "  {} {:>8} {:<20} {}",
                style(short).dim(),
                c.lines_changed,
                c.author,
                c.message
            );
        }
    }

    if !highlights.top_files.is_empty() {
        println!("\n{}", style("Most Touched Files").bold());
        for f in highlights.top_files.iter().take(20) {
            println!("  {:>6} {}", style(f.count).yellow(), f.file);
        }
    }
}
