//! Reader for `git log --numstat --format=%H|%an|%at|%s` output.
//!
//! A header line (`hash|author|unix-seconds|subject`) opens a commit; each
//! following `added<TAB>removed<TAB>path` line counts one touched file.
//! Binary files report `-` for both counts and add no lines.

use crate::error::{GitbackError, Result};
use crate::model::CommitRecord;
use chrono::{DateTime, Utc};

pub fn parse(input: &str) -> Result<Vec<CommitRecord>> {
    let mut commits = Vec::new();
    let mut current: Option<CommitRecord> = None;

    for (lineno, line) in input.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        if let Some(stat) = parse_numstat_line(line) {
            let Some(commit) = current.as_mut() else {
                return Err(GitbackError::Parse(format!(
                    "line {}: numstat entry before any commit header",
                    lineno + 1
                )));
            };
            let (added, removed, path) = stat;
            commit.added += added;
            commit.removed += removed;
            if !path.is_empty() {
                commit.files_touched += 1;
                commit.files.push(path.to_string());
            }
            continue;
        }

        if let Some(done) = current.take() {
            commits.push(done);
        }
        current = Some(parse_header(line, lineno + 1)?);
    }

    commits.extend(current);
    tracing::debug!(event = "ingest.numstat_parsed", commits = commits.len(), "Parsed numstat log");
    Ok(commits)
}

fn parse_header(line: &str, lineno: usize) -> Result<CommitRecord> {
    let parts: Vec<&str> = line.splitn(4, '|').collect();
    if parts.len() != 4 {
        return Err(GitbackError::Parse(format!(
            "line {lineno}: expected 'hash|author|timestamp|subject', got '{line}'"
        )));
    }

    let hash = parts[0].trim();
    let timestamp = parts[2]
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .ok_or_else(|| GitbackError::data(hash, format!("unparseable timestamp '{}'", parts[2])))?;

    Ok(CommitRecord {
        hash: hash.to_string(),
        author: parts[1].to_string(),
        timestamp,
        added: 0,
        removed: 0,
        message: parts[3].to_string(),
        files_touched: 0,
        files: Vec::new(),
    })
}

/// `Some((added, removed, path))` for a numstat line, binary entries count as zero lines.
fn parse_numstat_line(line: &str) -> Option<(u64, u64, &str)> {
    let mut fields = line.splitn(3, '\t');
    let added = fields.next()?;
    let removed = fields.next()?;
    let path = fields.next()?;

    let count = |field: &str| -> Option<u64> {
        if field == "-" {
            Some(0)
        } else {
            field.parse().ok()
        }
    };
    Some((count(added)?, count(removed)?, path.trim()))
}
