use crate::cli::CommonArgs;
use crate::model::CommitRecord;
use console::style;
use std::collections::HashSet;

/// Normalized commit records, oldest first. Useful for feeding `--input`
/// later without walking the repository again.
pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let mut loaded = crate::source::load(&common)?;
    loaded.commits.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.hash.cmp(&b.hash)));

    if json {
        crate::output::print_json(&loaded.commits, &loaded.source, &common)?;
    } else if ndjson {
        crate::output::print_ndjson(&loaded.commits)?;
    } else {
        output_summary(&loaded.commits)?;
    }

    Ok(())
}

fn output_summary(export_data: &[CommitRecord]) -> anyhow::Result<()> {
    println!("{}", style("Export Summary").bold());
    println!("{}", "─".repeat(50));

    let total_files: u64 = export_data.iter().map(|e| e.files_touched as u64).sum();
    let total_added: u64 = export_data.iter().map(|e| e.added).sum();
    let total_removed: u64 = export_data.iter().map(|e| e.removed).sum();
    let unique_authors: HashSet<_> = export_data.iter().map(|e| &e.author).collect();

    println!("Total commits: {}", style(export_data.len()).cyan());
    println!("Total files touched: {}", style(total_files).cyan());
    println!("Total lines added: {}", style(total_added).green());
    println!("Total lines removed: {}", style(total_removed).red());
    println!("Unique authors: {}", style(unique_authors.len()).yellow());

    if let (Some(first), Some(last)) = (export_data.first(), export_data.last()) {
        println!(
            "Date range: {} to {}",
            style(first.timestamp.format("%Y-%m-%d")).dim(),
            style(last.timestamp.format("%Y-%m-%d")).dim()
        );
    }

    println!("\nUse --json or --ndjson flags to export the raw data.");
    Ok(())
}
