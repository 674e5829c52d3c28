use crate::cli::CommonArgs;
use crate::config::AnalyticsConfig;
use crate::git::GitRepo;
use crate::ingest;
use crate::model::{CommitRecord, DateRange};
use anyhow::Context;
use chrono::{DateTime, Datelike, Utc};
use std::io::Read;
use std::path::Path;

/// Commits and config resolved from the command line, ready for the analytics components.
pub struct Loaded {
    pub commits: Vec<CommitRecord>,
    pub config: AnalyticsConfig,
    /// Human-readable origin of the commits, echoed in JSON output.
    pub source: String,
}

pub fn load(common: &CommonArgs) -> anyhow::Result<Loaded> {
    let config = AnalyticsConfig::load(common.config.as_deref()).context("Failed to load config")?;
    let now = Utc::now();

    let (mut commits, source) = match &common.input {
        Some(input) => {
            let range = resolve_range(common, |s| crate::util::parse_date(s, now))?;
            let text = read_input(input)?;
            let commits = ingest::parse(&text, common.format)
                .with_context(|| format!("Failed to read commits from {}", input.display()))?;
            let commits: Vec<_> = commits.into_iter().filter(|c| range.contains(&c.timestamp)).collect();
            (commits, input.display().to_string())
        }
        None => {
            let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
            let range = resolve_range(common, |s| repo.resolve_date(s, now))?;
            let commits = repo
                .collect_commits(&range, common.include_merges, !common.quiet)
                .context("Failed to collect commits from repository")?;
            (commits, repo.path().to_string_lossy().to_string())
        }
    };

    if let Some(author) = &common.author {
        let needle = author.to_lowercase();
        commits.retain(|c| c.author.to_lowercase().contains(&needle));
    }

    tracing::debug!(
        event = "source.loaded",
        source = %source,
        commits = commits.len(),
        "Loaded commits"
    );

    Ok(Loaded {
        commits,
        config,
        source,
    })
}

fn resolve_range<F>(common: &CommonArgs, parse: F) -> anyhow::Result<DateRange>
where
    F: Fn(&str) -> crate::error::Result<DateTime<Utc>>,
{
    let mut range = DateRange::new();
    if let Some(s) = &common.since {
        range = range.with_since(parse(s).context("Failed to resolve --since")?);
    }
    if let Some(u) = &common.until {
        range = range.with_until(parse(u).context("Failed to resolve --until")?);
    }
    if let (Some(s), Some(u)) = (range.since, range.until) {
        if s > u {
            anyhow::bail!("Invalid range: since ({s}) is after until ({u})");
        }
    }
    Ok(range)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read commits from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// The subset of `commits` dated in `year` (UTC).
pub fn commits_in_year(commits: &[CommitRecord], year: i32) -> Vec<CommitRecord> {
    commits
        .iter()
        .filter(|c| c.timestamp.year() == year)
        .cloned()
        .collect()
}
