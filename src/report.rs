use crate::cli::CommonArgs;
use crate::config::AnalyticsConfig;
use crate::error::GitbackError;
use crate::model::{CommitRecord, FullReport};
use console::style;

pub fn exec(common: CommonArgs, year: Option<i32>, json: bool) -> anyhow::Result<()> {
    let loaded = crate::source::load(&common)?;
    let year = year.unwrap_or_else(crate::source::current_year);
    let report = build(&loaded.commits, year, &loaded.config)?;

    if json {
        crate::output::print_json(&report, &loaded.source, &common)?;
    } else {
        output_overview(&report);
    }
    Ok(())
}

/// Every report at once. The trend covers all commits, the other views only
/// the commits of `year`. The components share nothing, so they run in parallel.
pub fn build(commits: &[CommitRecord], year: i32, config: &AnalyticsConfig) -> crate::error::Result<FullReport> {
    let this_year = crate::source::commits_in_year(commits, year);

    let ((summary, (trend, highlights)), (calendar, (messages, files))) = rayon::join(
        || {
            rayon::join(
                || crate::summary::summarize(commits, year, crate::summary::TOP_CONTRIBUTORS),
                || {
                    rayon::join(
                        || crate::trend::aggregate(commits, &config.trend),
                        || crate::highlights::build(commits, year, &config.highlights),
                    )
                },
            )
        },
        || {
            rayon::join(
                || crate::calendar::build(&this_year, year, &config.calendar),
                || {
                    rayon::join(
                        || crate::message::analyze(&this_year, &config.messages),
                        || crate::distribution::build(&this_year, &config.distribution),
                    )
                },
            )
        },
    );

    let trend = match trend {
        Ok(trend) => Some(trend),
        Err(GitbackError::NoData) => None,
        Err(e) => return Err(e),
    };

    Ok(FullReport {
        summary,
        trend,
        calendar,
        messages,
        files,
        highlights,
    })
}

fn output_overview(report: &FullReport) {
    let s = &report.summary;
    println!("{}", style("Git Wrapped").bold());
    println!("{}", "─".repeat(50));
    println!(
        "{} commits by {} contributors, {} / {} ({} net)",
        style(s.total_commits).cyan(),
        style(s.total_contributors).yellow(),
        style(format!("+{}", s.total_added)).green(),
        style(format!("-{}", s.total_removed)).red(),
        s.net_lines
    );

    match &report.trend {
        Some(trend) => println!(
            "Line trend: {} {} buckets, ending at {} lines",
            trend.buckets.len(),
            trend.granularity,
            trend.buckets.last().map(|b| b.cumulative_lines).unwrap_or(0)
        ),
        None => println!("Line trend: no data"),
    }

    if !s.has_commits_this_year {
        println!("No commits were made in {}.", s.year);
        return;
    }

    println!(
        "{}: {} commits, busiest day had {}",
        s.year, s.commits_this_year, report.calendar.max_count
    );
    let keywords: Vec<String> = report
        .messages
        .keywords
        .counts
        .iter()
        .map(|k| format!("{} {}", k.count, k.keyword.to_uppercase()))
        .collect();
    println!("Keywords: {}", keywords.join(", "));
    if let Some(top) = report.messages.top_words.first() {
        println!("Favourite word: \"{}\" ({} times)", top.text, top.appearances);
    }
    if let Some(bucket) = report.files.first() {
        println!("Most commits touch {} files ({} commits)", bucket.label, bucket.count);
    }
    if let Some(week) = &report.highlights.busiest_week {
        println!("Busiest week: {} ({} commits)", week.start, week.commits);
    }
    if let Some(biggest) = report.highlights.biggest_commits.first() {
        println!("Biggest commit: {} ({} lines changed)", biggest.message, biggest.lines_changed);
    }
    if let Some(file) = report.highlights.top_files.first() {
        println!("Most touched file: {} ({} commits)", file.file, file.count);
    }
}
