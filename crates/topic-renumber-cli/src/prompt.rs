//! Confirmation before live writes.
//!
//! On a terminal the answer is read with a dialoguer prompt; otherwise one
//! line is read from stdin, so answers can be piped in.

use dialoguer::Input;
use std::fmt;
use std::io::{self, BufRead, IsTerminal, Write};
use topic_renumber::{MigrationReport, RenumberError};

const PROMPT: &str = "Continue? Type 'yes' to proceed";

/// Errors reading the operator's answer.
#[derive(Debug)]
pub enum PromptError {
    /// Terminal or stdin failure.
    Io(io::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read confirmation: {}", e),
        }
    }
}

impl std::error::Error for PromptError {}

impl From<io::Error> for PromptError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<dialoguer::Error> for PromptError {
    fn from(e: dialoguer::Error) -> Self {
        match e {
            dialoguer::Error::IO(e) => Self::Io(e),
        }
    }
}

impl From<PromptError> for RenumberError {
    fn from(e: PromptError) -> Self {
        match e {
            PromptError::Io(e) => RenumberError::Io(e),
        }
    }
}

/// True if the answer confirms the migration.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

/// Ask the operator to go ahead with the planned writes.
pub fn confirm_migration(report: &MigrationReport) -> Result<bool, PromptError> {
    eprintln!();
    eprintln!(
        "About to write {} createdAt and {} topicNumber updates.",
        report.backfill_updates, report.renumber_updates
    );

    let answer = if io::stdin().is_terminal() {
        Input::<String>::new()
            .with_prompt(PROMPT)
            .allow_empty(true)
            .interact_text()?
    } else {
        eprint!("{}: ", PROMPT);
        io::stderr().flush()?;
        read_answer(&mut io::stdin().lock())?
    };

    Ok(is_confirmation(&answer))
}

/// Read one answer line. End of input counts as an empty answer.
fn read_answer<R: BufRead>(reader: &mut R) -> Result<String, PromptError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_is_confirmation() {
        assert!(is_confirmation("yes"));
        assert!(is_confirmation("Y"));
        assert!(is_confirmation("  YES \n"));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("no"));
        assert!(!is_confirmation("yess"));
    }

    #[test]
    fn test_read_answer_takes_first_line() {
        let mut input = Cursor::new("y\nyes\n");
        assert_eq!(read_answer(&mut input).unwrap(), "y\n");
    }

    #[test]
    fn test_read_answer_at_end_of_input_is_empty() {
        let mut input = Cursor::new("");
        let answer = read_answer(&mut input).unwrap();
        assert!(!is_confirmation(&answer));
    }

    #[test]
    fn test_dialoguer_error_keeps_io_error() {
        let err = PromptError::from(dialoguer::Error::IO(io::Error::other("not a terminal")));
        assert_eq!(
            err.to_string(),
            "failed to read confirmation: not a terminal"
        );

        let err = RenumberError::from(err);
        assert_eq!(err.to_string(), "IO error: not a terminal");
        assert_eq!(err.exit_code(), 7);
    }
}
