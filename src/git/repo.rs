use crate::error::{GitbackError, Result};
use crate::model::{CommitRecord, DateRange};
use chrono::{DateTime, Utc};
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use similar::{ChangeTag, TextDiff};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

/// Line and file totals of one commit's diff against its first parent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct DiffTotals {
    added: u64,
    removed: u64,
    paths: Vec<String>,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Like [`crate::util::parse_date`], but also accepts any revision
    /// (`v1.2.0`, `HEAD~20`) and uses its commit time.
    pub fn resolve_date(&self, input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        if let Ok(dt) = crate::util::parse_date(input, now) {
            return Ok(dt);
        }

        let id = self
            .repo
            .rev_parse_single(input)
            .map_err(|e| GitbackError::Parse(format!("Invalid commit or date '{input}': {e}")))?;

        let commit = id
            .object()?
            .try_into_commit()
            .map_err(|_| GitbackError::Parse(format!("Not a commit: {input}")))?;

        let secs = commit.time()?.seconds;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| GitbackError::InvalidDate(format!("Invalid timestamp: {secs}")))
    }

    /// Walk every commit reachable from HEAD and turn it into a [`CommitRecord`].
    pub fn collect_commits(
        &self,
        range: &DateRange,
        include_merges: bool,
        progress: bool,
    ) -> Result<Vec<CommitRecord>> {
        let mut head = self.repo.head()?;
        let head_commit = head.peel_to_commit_in_place()?;

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        let pb = if progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} {pos}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message("Collecting commits...");

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let secs = commit.time()?.seconds;
            let timestamp = DateTime::<Utc>::from_timestamp(secs, 0)
                .ok_or_else(|| GitbackError::data(commit_id.to_string(), format!("invalid timestamp: {secs}")))?;

            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();
            stack.extend(parents.iter().copied());

            if !range.contains(&timestamp) {
                continue;
            }
            if !include_merges && parents.len() > 1 {
                tracing::trace!(event = "git.merge_skipped", commit = %commit_id);
                continue;
            }

            let author = commit.author()?;
            let message = commit.message()?;
            let totals = self.diff_totals(commit_id, parents.first().copied())?;

            commits.push(CommitRecord {
                hash: commit_id.to_string(),
                author: author.name.to_string(),
                timestamp,
                added: totals.added,
                removed: totals.removed,
                message: message.title.to_string(),
                files_touched: u32::try_from(totals.paths.len()).unwrap_or(u32::MAX),
                files: totals.paths,
            });

            pb.inc(1);
        }

        pb.finish_and_clear();
        tracing::info!(
            event = "git.commits_collected",
            repo = %self.path.display(),
            commits = commits.len(),
            "Collected commits from repository"
        );
        Ok(commits)
    }

    fn diff_totals(&self, commit_id: ObjectId, parent_id: Option<ObjectId>) -> Result<DiffTotals> {
        let commit_tree = self.repo.find_commit(commit_id)?.tree()?;
        let changes: Vec<ChangeDetached> = match parent_id {
            Some(parent_id) => {
                let parent_tree = self.repo.find_commit(parent_id)?.tree()?;
                self.repo
                    .diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?
            }
            None => self.repo.diff_tree_to_tree(None, Some(&commit_tree), None)?,
        };

        let mut totals = DiffTotals::default();
        for change in changes {
            self.handle_change(change, &mut totals);
        }
        Ok(totals)
    }

    /// Trees are skipped; every blob change counts as one touched file.
    /// Binary blobs are touched but contribute no lines.
    fn handle_change(&self, change: ChangeDetached, totals: &mut DiffTotals) {
        let (old, new, location) = match change {
            ChangeDetached::Addition {
                id, entry_mode, location, ..
            } => {
                if entry_mode.is_tree() {
                    return;
                }
                (None, Some(id), location)
            }
            ChangeDetached::Deletion {
                id, entry_mode, location, ..
            } => {
                if entry_mode.is_tree() {
                    return;
                }
                (Some(id), None, location)
            }
            ChangeDetached::Modification {
                previous_id,
                id,
                entry_mode,
                location,
                ..
            } => {
                if entry_mode.is_tree() {
                    return;
                }
                (Some(previous_id), Some(id), location)
            }
            ChangeDetached::Rewrite {
                source_id,
                id,
                entry_mode,
                copy,
                location,
                ..
            } => {
                if entry_mode.is_tree() {
                    return;
                }
                (if copy { None } else { Some(source_id) }, Some(id), location)
            }
        };

        let old_data = old.and_then(|id| self.repo.find_object(id).ok()).map(|o| o.data.clone());
        let new_data = new.and_then(|id| self.repo.find_object(id).ok()).map(|o| o.data.clone());

        totals.paths.push(location.to_string());
        let old_bytes = old_data.as_deref().unwrap_or_default();
        let new_bytes = new_data.as_deref().unwrap_or_default();
        if is_binary(old_bytes) || is_binary(new_bytes) {
            return;
        }
        let (added, removed) = line_diff(old_bytes, new_bytes);
        totals.added += added;
        totals.removed += removed;
    }
}

fn is_binary(data: &[u8]) -> bool {
    data.iter().take(8192).any(|&b| b == 0)
}

fn line_diff(old: &[u8], new: &[u8]) -> (u64, u64) {
    let old_text = String::from_utf8_lossy(old);
    let new_text = String::from_utf8_lossy(new);
    let diff = TextDiff::from_lines(&*old_text, &*new_text);

    let mut added = 0u64;
    let mut removed = 0u64;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_inserted_and_deleted_lines() {
        let old = b"a\nb\nc\n";
        let new = b"a\nB\nc\nd\n";
        assert_eq!(line_diff(old, new), (2, 1));
        assert_eq!(line_diff(b"", b"x\ny\n"), (2, 0));
        assert_eq!(line_diff(b"x\ny\n", b""), (0, 2));
    }

    #[test]
    fn detects_binary_blobs() {
        assert!(is_binary(b"PNG\0\x01"));
        assert!(!is_binary(b"plain text\n"));
    }
}
