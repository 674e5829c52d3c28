use crate::cli::CommonArgs;
use crate::config::MessageConfig;
use crate::model::{CommitRecord, KeywordTally, MessageReport, WordFrequencyEntry};
use console::style;
use std::collections::HashMap;

pub fn exec(common: CommonArgs, limit: Option<usize>, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let mut loaded = crate::source::load(&common)?;
    if let Some(limit) = limit {
        loaded.config.messages.top_words_limit = limit;
    }
    let report = analyze(&loaded.commits, &loaded.config.messages);

    if json {
        crate::output::print_json(&report, &loaded.source, &common)?;
    } else if ndjson {
        crate::output::print_ndjson(&report.top_words)?;
    } else {
        output_summary(&report)?;
    }

    Ok(())
}

pub fn analyze(commits: &[CommitRecord], config: &MessageConfig) -> MessageReport {
    let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
    MessageReport {
        keywords: classify(commits, &config.keywords),
        top_words: extract_top_words(&messages, config),
    }
}

/// Count each commit under the first keyword, in priority order, that appears
/// as a whole whitespace-separated token of its lowercased message.
pub fn classify<S: AsRef<str>>(commits: &[CommitRecord], keywords: &[S]) -> KeywordTally {
    let mut tally = KeywordTally::new(keywords);

    for commit in commits {
        let message = commit.message.to_lowercase();
        let tokens: Vec<&str> = message.split_whitespace().collect();
        if let Some(slot) = tally
            .counts
            .iter_mut()
            .find(|k| tokens.contains(&k.keyword.as_str()))
        {
            slot.count += 1;
        }
    }

    tally
}

/// Words appearing more than once across all messages, most frequent first.
pub fn extract_top_words<S: AsRef<str>>(messages: &[S], config: &MessageConfig) -> Vec<WordFrequencyEntry> {
    let mut freq: HashMap<String, u32> = HashMap::new();

    for message in messages {
        let normalized = normalize(message.as_ref());
        for word in normalized.split_whitespace() {
            if word.len() < config.min_word_len {
                continue;
            }
            *freq.entry(word.to_string()).or_insert(0) += 1;
        }
    }

    let mut words: Vec<WordFrequencyEntry> = freq
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(text, appearances)| WordFrequencyEntry { text, appearances })
        .collect();

    words.sort_by(|a, b| b.appearances.cmp(&a.appearances).then_with(|| a.text.cmp(&b.text)));
    words.truncate(config.top_words_limit);
    words
}

/// Lowercase and blank out everything that is neither a word character
/// (`[A-Za-z0-9_]`) nor whitespace.
fn normalize(message: &str) -> String {
    message
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

fn output_summary(report: &MessageReport) -> anyhow::Result<()> {
    println!("{}", style("Commit Message Keywords").bold());
    println!("{}", "─".repeat(40));
    for k in &report.keywords.counts {
        println!("{:>6} \"{}\"", style(k.count).cyan(), k.keyword.to_uppercase());
    }

    println!("\n{}", style("Most Used Words").bold());
    println!("{}", "─".repeat(40));
    if report.top_words.is_empty() {
        println!("No word appears more than once.");
    }
    for (i, w) in report.top_words.iter().enumerate() {
        println!("{:>3}. {:<24} {:>6}", i + 1, w.text, style(w.appearances).yellow());
    }
    Ok(())
}
