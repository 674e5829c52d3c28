use crate::cli::CommonArgs;
use crate::config::DistributionConfig;
use crate::model::{CommitRecord, DistributionBucket};
use console::style;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let loaded = crate::source::load(&common)?;
    let buckets = build(&loaded.commits, &loaded.config.distribution);

    if json {
        crate::output::print_json(&buckets, &loaded.source, &common)?;
    } else if ndjson {
        crate::output::print_ndjson(&buckets)?;
    } else {
        output_bars(&buckets)?;
    }

    Ok(())
}

/// Histogram of commits by number of files touched, largest bucket first.
/// Every configured bucket is present; equal counts keep configuration order.
pub fn build(commits: &[CommitRecord], config: &DistributionConfig) -> Vec<DistributionBucket> {
    let mut counts = vec![0u32; config.buckets.len()];

    for commit in commits {
        match config.buckets.iter().position(|b| b.contains(commit.files_touched)) {
            Some(i) => counts[i] += 1,
            None => tracing::warn!(
                event = "distribution.unbucketed_commit",
                hash = %commit.hash,
                files_touched = commit.files_touched,
                "Commit matched no files-touched bucket"
            ),
        }
    }

    let mut buckets: Vec<DistributionBucket> = config
        .buckets
        .iter()
        .zip(counts)
        .map(|(spec, count)| DistributionBucket {
            label: spec.label.clone(),
            count,
        })
        .collect();

    // stable sort, so ties stay in declaration order
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

fn output_bars(buckets: &[DistributionBucket]) -> anyhow::Result<()> {
    println!("{}", style("Commit File Distribution").bold());
    println!("{}", "─".repeat(50));

    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bucket in buckets {
        let width = (bucket.count as f64 / max as f64 * 30.0).round() as usize;
        println!(
            "{:>7} files {} {}",
            bucket.label,
            style("█".repeat(width)).cyan(),
            bucket.count
        );
    }
    Ok(())
}
