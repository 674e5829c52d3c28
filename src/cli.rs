use crate::ingest::InputFormat;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitback")]
#[command(about = "Commit history analytics: line trends, commit calendar, message keywords and file distribution")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(
        long,
        global = true,
        conflicts_with = "input",
        help = "Path to git repository (default: current directory)"
    )]
    pub repo: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Read commits from a JSON or `git log --numstat --format=%H|%an|%at|%s` file instead of a repository ('-' for stdin)"
    )]
    pub input: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = InputFormat::Auto, help = "Format of --input")]
    pub format: InputFormat,

    #[arg(long, global = true, help = "TOML file overriding analytics thresholds")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Include merge commits when walking a repository")]
    pub include_merges: bool,

    #[arg(long, global = true, help = "Start from this date (RFC3339, YYYY-MM-DD, relative like '90days ago', or a revision)")]
    pub since: Option<String>,

    #[arg(long, global = true, help = "End at this date (RFC3339, YYYY-MM-DD, relative like '90days ago', or a revision)")]
    pub until: Option<String>,

    #[arg(long, global = true, help = "Only count commits whose author contains this text (case-insensitive)")]
    pub author: Option<String>,

    #[arg(long, short, global = true, help = "Hide progress output")]
    pub quiet: bool,

    #[arg(long, short, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cumulative lines over time, bucketed by day, week, two weeks or month
    Trend {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Day-by-day commit counts for one year
    Calendar {
        #[arg(long, help = "Year to show (default: current year)")]
        year: Option<i32>,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Keyword tally and most frequent words in commit messages
    Messages {
        #[arg(long, help = "Number of top words to keep")]
        limit: Option<usize>,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Histogram of commits by number of files touched
    Files {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Totals and top contributors
    Summary {
        #[arg(long, help = "Year counted as 'this year' (default: current year)")]
        year: Option<i32>,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Most-touched files, biggest commits and the busiest week
    Highlights {
        #[arg(long, help = "Year for biggest commits and busiest week (default: current year)")]
        year: Option<i32>,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output most-touched files as NDJSON")]
        ndjson: bool,
    },
    /// All reports at once
    Report {
        #[arg(long, help = "Year for the calendar, message and file views (default: current year)")]
        year: Option<i32>,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Normalized commit records
    Export {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::logging::init(self.common.verbose);

        match self.command {
            Commands::Trend { json, ndjson } => crate::trend::exec(self.common, json, ndjson),
            Commands::Calendar { year, json, ndjson } => {
                crate::calendar::exec(self.common, year, json, ndjson)
            }
            Commands::Messages { limit, json, ndjson } => {
                crate::message::exec(self.common, limit, json, ndjson)
            }
            Commands::Files { json, ndjson } => crate::distribution::exec(self.common, json, ndjson),
            Commands::Summary { year, json, ndjson } => {
                crate::summary::exec(self.common, year, json, ndjson)
            }
            Commands::Highlights { year, json, ndjson } => {
                crate::highlights::exec(self.common, year, json, ndjson)
            }
            Commands::Report { year, json } => crate::report::exec(self.common, year, json),
            Commands::Export { json, ndjson } => crate::export::exec(self.common, json, ndjson),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_and_input_are_mutually_exclusive() {
        let err = <Cli as Parser>::try_parse_from(["gitback", "trend", "--repo", ".", "--input", "c.json"])
            .err()
            .map(|e| e.kind());
        assert_eq!(err, Some(clap::error::ErrorKind::ArgumentConflict));

        assert!(<Cli as Parser>::try_parse_from(["gitback", "trend", "--input", "c.json"]).is_ok());
    }
}
