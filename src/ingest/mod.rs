pub mod json;
pub mod numstat;

use crate::error::Result;
use crate::model::CommitRecord;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Sniff the first non-blank character: `[` or `{` means JSON
    Auto,
    Json,
    Numstat,
}

impl InputFormat {
    fn resolve(self, input: &str) -> InputFormat {
        match self {
            InputFormat::Auto => match input.trim_start().chars().next() {
                Some('[') | Some('{') => InputFormat::Json,
                _ => InputFormat::Numstat,
            },
            other => other,
        }
    }
}

pub fn parse(input: &str, format: InputFormat) -> Result<Vec<CommitRecord>> {
    match format.resolve(input) {
        InputFormat::Json => json::parse(input),
        InputFormat::Numstat | InputFormat::Auto => numstat::parse(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_detects_format() {
        assert_eq!(InputFormat::Auto.resolve("  [ ]"), InputFormat::Json);
        assert_eq!(InputFormat::Auto.resolve("{\"commits\": []}"), InputFormat::Json);
        assert_eq!(InputFormat::Auto.resolve("abc|me|0|msg"), InputFormat::Numstat);
        assert_eq!(InputFormat::Numstat.resolve("[]"), InputFormat::Numstat);
    }

    #[test]
    fn parses_either_format() {
        assert!(parse("[]", InputFormat::Auto).unwrap().is_empty());
        assert_eq!(parse("abc|me|0|msg\n1\t1\tx\n", InputFormat::Auto).unwrap().len(), 1);
    }
}
