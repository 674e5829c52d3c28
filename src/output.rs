use crate::cli::CommonArgs;
use crate::model::{Output, SCHEMA_VERSION};
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

/// Pretty JSON wrapped in the versioned envelope.
pub fn print_json<T: Serialize>(data: &T, source: &str, common: &CommonArgs) -> Result<()> {
    let output = Output {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        source: source.to_string(),
        since: common.since.clone(),
        until: common.until.clone(),
        data,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_ndjson<T: Serialize>(items: &[T]) -> Result<()> {
    for item in items {
        println!("{}", serde_json::to_string(item)?);
    }
    Ok(())
}
