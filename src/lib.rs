//! Commit history analytics.
//!
//! Four independent reports are derived from a list of [`model::CommitRecord`]s:
//! a cumulative line trend ([`trend`]), a dense yearly commit calendar
//! ([`calendar`]), keyword and word-frequency analysis of messages
//! ([`message`]) and a files-touched histogram ([`distribution`]), plus
//! most-touched files, biggest commits and the busiest week ([`highlights`]). Commits
//! come from a local repository ([`git`]) or from JSON / numstat text
//! ([`ingest`]).

pub mod calendar;
pub mod cli;
pub mod config;
pub mod distribution;
pub mod error;
pub mod export;
pub mod git;
pub mod highlights;
pub mod ingest;
pub mod logging;
pub mod message;
pub mod model;
pub mod output;
pub mod report;
pub mod source;
pub mod summary;
pub mod trend;
pub mod util;
