//! Due-date input for the add operation.
//!
//! When no due date is given up front the store asks a [`DueDateSource`]
//! until it yields a valid date. The console implementation reads lines from
//! stdin; tests feed a scripted reader instead.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

use crate::db::parse_due_date;
use crate::error::{Result, TaskError};

pub const PROMPT: &str = "Due date (YYYY-MM-DD): ";

/// Something that can be asked for a due date.
pub trait DueDateSource {
    /// Return the next answer, or `None` once input is exhausted.
    fn next_answer(&mut self) -> io::Result<Option<String>>;

    /// Tell the user why the last answer was rejected.
    fn reject(&mut self, reason: &str) -> io::Result<()>;
}

/// Ask `source` repeatedly until it gives a valid date.
///
/// Fails with a validation error when the source runs dry.
pub fn request_due_date(source: &mut dyn DueDateSource) -> Result<NaiveDate> {
    loop {
        let Some(answer) = source.next_answer()? else {
            return Err(TaskError::validation("No due date provided; cancelling add."));
        };
        let answer = answer.trim();
        if answer.is_empty() {
            source.reject("Please enter a due date in YYYY-MM-DD format.")?;
            continue;
        }
        match parse_due_date(answer) {
            Some(d) => return Ok(d),
            None => source.reject("Invalid date format. Use YYYY-MM-DD.")?,
        }
    }
}

/// Line-oriented prompt over any reader/writer pair.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompt { input, output }
    }
}

impl LinePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the terminal.
    pub fn console() -> Self {
        LinePrompt::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> DueDateSource for LinePrompt<R, W> {
    fn next_answer(&mut self) -> io::Result<Option<String>> {
        write!(self.output, "{PROMPT}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn reject(&mut self, reason: &str) -> io::Result<()> {
        writeln!(self.output, "{reason}")
    }
}

/// A source that never has an answer, for non-interactive callers.
pub struct NoInput;

impl DueDateSource for NoInput {
    fn next_answer(&mut self) -> io::Result<Option<String>> {
        Ok(None)
    }

    fn reject(&mut self, _reason: &str) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reprompts_until_a_valid_date() {
        let mut out = Vec::new();
        let mut prompt = LinePrompt::new(Cursor::new("\nnext week\n2025-13-01\n2025-11-30\n"), &mut out);

        let due = request_due_date(&mut prompt).unwrap();
        assert_eq!(due, NaiveDate::from_ymd_opt(2025, 11, 30).unwrap());

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches(PROMPT).count(), 4);
        assert!(out.contains("Please enter a due date in YYYY-MM-DD format."));
        assert_eq!(out.matches("Invalid date format. Use YYYY-MM-DD.").count(), 2);
    }

    #[test]
    fn end_of_input_cancels() {
        let mut prompt = LinePrompt::new(Cursor::new("not a date\n"), Vec::new());
        let err = request_due_date(&mut prompt).unwrap_err();
        assert!(matches!(err, TaskError::Validation(ref m) if m.contains("cancelling")));
    }

    #[test]
    fn no_input_source_cancels_immediately() {
        assert!(request_due_date(&mut NoInput).is_err());
    }
}
