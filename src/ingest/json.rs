use crate::error::{GitbackError, Result};
use crate::model::CommitRecord;
use crate::util::parse_timestamp_text;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Commit as delivered by the analysis API. Counts are signed so that bad
/// values are reported instead of failing deserialization as a whole.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommit {
    pub hash: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, alias = "timestamp")]
    pub date: Option<RawTimestamp>,
    #[serde(default)]
    pub added: i64,
    #[serde(default)]
    pub removed: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "files_touched", alias = "filesTouched")]
    pub files_touched_count: i64,
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Seconds(i64),
    Text(String),
    Other(Value),
}

/// Records stay untyped until they are validated one by one, so a bad
/// record is reported by hash instead of failing the whole document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    List(Vec<Value>),
    Wrapped { commits: Vec<Value> },
    Exported { data: Vec<Value> },
}

pub fn parse(input: &str) -> Result<Vec<CommitRecord>> {
    let records = match serde_json::from_str::<Document>(input)? {
        Document::List(commits) => commits,
        Document::Wrapped { commits } => commits,
        Document::Exported { data } => data,
    };
    records
        .into_iter()
        .enumerate()
        .map(|(index, value)| parse_record(index, value))
        .collect()
}

fn parse_record(index: usize, value: Value) -> Result<CommitRecord> {
    let record = match value.get("hash").and_then(Value::as_str) {
        Some(hash) => hash.to_string(),
        None => format!("#{index}"),
    };
    let raw = RawCommit::deserialize(value).map_err(|e| GitbackError::data(&record, e.to_string()))?;
    CommitRecord::try_from(raw)
}

impl TryFrom<RawCommit> for CommitRecord {
    type Error = GitbackError;

    fn try_from(raw: RawCommit) -> Result<Self> {
        let timestamp = match &raw.date {
            None => return Err(GitbackError::data(&raw.hash, "missing timestamp")),
            Some(RawTimestamp::Seconds(secs)) => DateTime::<Utc>::from_timestamp(*secs, 0),
            Some(RawTimestamp::Text(text)) => parse_timestamp_text(text),
            Some(RawTimestamp::Other(_)) => None,
        }
        .ok_or_else(|| GitbackError::data(&raw.hash, format!("unparseable timestamp {}", describe(&raw.date))))?;

        Ok(CommitRecord {
            added: non_negative(&raw.hash, "added", raw.added)?,
            removed: non_negative(&raw.hash, "removed", raw.removed)?,
            files_touched: u32::try_from(raw.files_touched_count).map_err(|_| {
                GitbackError::data(
                    &raw.hash,
                    format!("files touched count out of range: {}", raw.files_touched_count),
                )
            })?,
            hash: raw.hash,
            author: raw.author,
            timestamp,
            message: raw.message,
            files: raw.files,
        })
    }
}

fn describe(date: &Option<RawTimestamp>) -> String {
    match date {
        Some(RawTimestamp::Seconds(secs)) => secs.to_string(),
        Some(RawTimestamp::Text(text)) => format!("{text:?}"),
        Some(RawTimestamp::Other(value)) => value.to_string(),
        None => "null".to_string(),
    }
}

fn non_negative(hash: &str, field: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| GitbackError::data(hash, format!("negative {field} count: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_api_response_shape() {
        let input = r#"{
            "totalAdded": 12,
            "commits": [
                {"hash": "abc1234", "author": "ana", "date": 1735725600, "added": 10, "removed": 2,
                 "message": "fix TODO later", "filesTouchedCount": 3}
            ]
        }"#;
        let commits = parse(input).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].timestamp, Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap());
        assert_eq!(commits[0].files_touched, 3);
        assert_eq!(commits[0].net_lines(), 8);
    }

    #[test]
    fn parses_plain_list_with_text_dates() {
        let input = r#"[
            {"hash": "a", "author": "ana", "date": "2025-03-01T12:00:00Z", "added": 1, "removed": 0, "message": "x", "filesTouchedCount": 1},
            {"hash": "b", "author": "bo", "date": "2025-03-02", "added": 0, "removed": 0, "message": "y", "filesTouchedCount": 0}
        ]"#;
        let commits = parse(input).unwrap();
        assert_eq!(commits[1].timestamp, Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn reads_back_exported_records() {
        let input = r#"{"version": 1, "source": "repo", "data": [
            {"hash": "a", "author": "ana", "timestamp": "2025-03-01T12:00:00Z", "added": 4, "removed": 1,
             "message": "x", "files_touched": 2}
        ]}"#;
        let commits = parse(input).unwrap();
        assert_eq!(commits[0].files_touched, 2);
        assert_eq!(commits[0].timestamp, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn bad_timestamp_names_the_record() {
        let input = r#"[{"hash": "deadbee", "date": "last tuesday", "filesTouchedCount": 1}]"#;
        match parse(input).unwrap_err() {
            GitbackError::Data { record, reason } => {
                assert_eq!(record, "deadbee");
                assert!(reason.contains("timestamp"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn data_error_record(input: &str) -> (String, String) {
        match parse(input).unwrap_err() {
            GitbackError::Data { record, reason } => (record, reason),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn null_float_and_missing_dates_name_the_record() {
        let good = r#"{"hash": "good1", "date": 1, "filesTouchedCount": 1}"#;
        for bad in [
            r#"{"hash": "deadbee", "date": null, "filesTouchedCount": 1}"#,
            r#"{"hash": "deadbee", "date": 1735725600.5, "filesTouchedCount": 1}"#,
            r#"{"hash": "deadbee", "filesTouchedCount": 1}"#,
        ] {
            let (record, reason) = data_error_record(&format!("[{good}, {bad}]"));
            assert_eq!(record, "deadbee", "input: {bad}");
            assert!(reason.contains("timestamp"), "reason: {reason}");
        }
    }

    #[test]
    fn mistyped_counts_name_the_record() {
        let (record, _) = data_error_record(r#"[{"hash": "cafe", "date": 0, "added": "12"}]"#);
        assert_eq!(record, "cafe");

        let (record, _) = data_error_record(r#"{"commits": [{"hash": "cafe", "date": 0, "removed": 1.5}]}"#);
        assert_eq!(record, "cafe");
    }

    #[test]
    fn record_without_hash_is_named_by_position() {
        let (record, _) = data_error_record(r#"[{"hash": "a", "date": 0}, {"date": 0}]"#);
        assert_eq!(record, "#1");
    }

    #[test]
    fn carries_touched_file_paths() {
        let commits =
            parse(r#"[{"hash": "a", "date": 0, "filesTouchedCount": 2, "files": ["src/a.rs", "README.md"]}]"#).unwrap();
        assert_eq!(commits[0].files, vec!["src/a.rs".to_string(), "README.md".to_string()]);
    }

    #[test]
    fn negative_files_touched_is_rejected() {
        let input = r#"[{"hash": "f00", "date": 0, "filesTouchedCount": -1}]"#;
        assert!(matches!(parse(input), Err(GitbackError::Data { .. })));
    }

    #[test]
    fn negative_line_counts_are_rejected() {
        let input = r#"[{"hash": "f00", "date": 0, "removed": -4, "filesTouchedCount": 1}]"#;
        let err = parse(input).unwrap_err();
        assert!(err.to_string().contains("negative removed count"));
    }
}
