//! Yes/no questions on the terminal.

use std::io::{self, BufRead, Write};

use command_form_core::Prompter;
use tracing::{debug, warn};

/// Asks on stderr and reads the answer from stdin. An empty answer or end
/// of input means "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> bool {
        let stdin = io::stdin();
        loop {
            eprint!("{question} [y/N]: ");
            if let Err(err) = io::stderr().flush() {
                debug!(error = %err, "failed to flush prompt");
            }

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => return false,
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "failed to read answer");
                    return false;
                }
            }
            match parse_answer(&line) {
                Some(answer) => return answer,
                None => eprintln!("Error: invalid input"),
            }
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "" | "n" | "no" => Some(false),
        _ => None,
    }
}

/// Answers every question with "yes".
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Prompter for AssumeYes {
    fn confirm(&self, _question: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("Y\n"), Some(true));
        assert_eq!(parse_answer(" yes "), Some(true));
        assert_eq!(parse_answer("\n"), Some(false));
        assert_eq!(parse_answer("No"), Some(false));
        assert_eq!(parse_answer("maybe"), None);
    }
}
