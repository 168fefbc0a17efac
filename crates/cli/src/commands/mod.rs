//! Command handlers. Each prints its results on stdout.

pub mod config;
pub mod redownload;
pub mod search;
pub mod stats;
pub mod sync;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Width of the separator lines between results.
const RULE_WIDTH: usize = 80;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Ask for one line on stdin.
pub fn prompt(label: &str) -> Result<String> {
    prompt_from(&mut io::stdin().lock(), &mut io::stdout(), label)
}

/// Ask a yes/no question; anything but `y` or `yes` is a no.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{} (y/N): ", question))?;
    Ok(is_yes(&answer))
}

fn prompt_from<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_reads_trimmed_line() {
        let mut input = io::Cursor::new("  https://tube.local \nignored\n");
        let mut output = Vec::new();

        let answer = prompt_from(&mut input, &mut output, "URL: ").unwrap();

        assert_eq!(answer, "https://tube.local");
        assert_eq!(String::from_utf8(output).unwrap(), "URL: ");
    }

    #[test]
    fn test_prompt_at_eof_is_empty() {
        let mut input = io::Cursor::new("");
        let answer = prompt_from(&mut input, &mut Vec::new(), "URL: ").unwrap();
        assert_eq!(answer, "");
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes("YES"));
        assert!(is_yes(" Yes "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
