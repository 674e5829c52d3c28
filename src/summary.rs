use crate::cli::CommonArgs;
use crate::model::{CommitRecord, ContributorCount, RepoSummary};
use chrono::Datelike;
use console::style;
use std::collections::HashMap;

pub const TOP_CONTRIBUTORS: usize = 10;

pub fn exec(common: CommonArgs, year: Option<i32>, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let loaded = crate::source::load(&common)?;
    let year = year.unwrap_or_else(crate::source::current_year);
    let summary = summarize(&loaded.commits, year, TOP_CONTRIBUTORS);

    if json {
        crate::output::print_json(&summary, &loaded.source, &common)?;
    } else if ndjson {
        crate::output::print_ndjson(&summary.top_contributors)?;
    } else {
        output_summary(&summary)?;
    }

    Ok(())
}

pub fn summarize(commits: &[CommitRecord], year: i32, top: usize) -> RepoSummary {
    let mut by_author: HashMap<&str, u32> = HashMap::new();
    let mut total_added = 0u64;
    let mut total_removed = 0u64;
    for commit in commits {
        total_added += commit.added;
        total_removed += commit.removed;
        *by_author.entry(commit.author.as_str()).or_insert(0) += 1;
    }

    let total_contributors = by_author.len();
    let mut top_contributors: Vec<ContributorCount> = by_author
        .into_iter()
        .map(|(author, commits)| ContributorCount {
            author: author.to_string(),
            commits,
        })
        .collect();
    top_contributors.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.author.cmp(&b.author)));
    top_contributors.truncate(top);

    let commits_this_year = commits.iter().filter(|c| c.timestamp.year() == year).count();

    RepoSummary {
        total_commits: commits.len(),
        total_added,
        total_removed,
        net_lines: total_added as i64 - total_removed as i64,
        total_contributors,
        top_contributors,
        first_commit: commits.iter().map(|c| c.timestamp).min(),
        last_commit: commits.iter().map(|c| c.timestamp).max(),
        year,
        commits_this_year,
        has_commits_this_year: commits_this_year > 0,
    }
}

fn output_summary(summary: &RepoSummary) -> anyhow::Result<()> {
    println!("{}", style("Repository Summary").bold());
    println!("{}", "─".repeat(50));
    println!("Total commits: {}", style(summary.total_commits).cyan());
    println!("Total lines added: {}", style(summary.total_added).green());
    println!("Total lines removed: {}", style(summary.total_removed).red());
    println!("Net lines: {}", style(summary.net_lines).bold());
    println!("Contributors: {}", style(summary.total_contributors).yellow());
    println!(
        "Commits in {}: {}",
        summary.year,
        style(summary.commits_this_year).cyan()
    );

    if let (Some(first), Some(last)) = (summary.first_commit, summary.last_commit) {
        println!(
            "Date range: {} to {}",
            style(first.format("%Y-%m-%d")).dim(),
            style(last.format("%Y-%m-%d")).dim()
        );
    }

    if !summary.top_contributors.is_empty() {
        println!("\n{}", style("Top Contributors").bold());
        for c in &summary.top_contributors {
            println!("  {:<32} {:>6}", c.author, c.commits);
        }
    }
    Ok(())
}
