//! # Console
//!
//! Line-oriented prompt/response over any reader and writer.
//!
//! The binary wraps stdin/stdout; tests drive the same menus with a
//! `Cursor` of scripted lines and capture the output in a `Vec<u8>`.

use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::error::{AppError, AppResult};

/// Separator printed around book and record listings.
pub const SEPARATOR: &str = "----------------------------------";

/// Prompt shown after every completed action.
pub const PRESS_ENTER: &str = "Press enter to continue...";

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// Gives back the writer (tests inspect the captured output).
    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints a full line.
    pub fn line(&mut self, text: impl Display) -> AppResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Prints an empty line.
    pub fn blank(&mut self) -> AppResult<()> {
        writeln!(self.output)?;
        Ok(())
    }

    /// Writes a prompt and reads one line, without the line ending.
    ///
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`.
    ///
    /// ## Errors
    /// `AppError::EndOfInput` once the input is exhausted.
    pub fn prompt(&mut self, label: impl Display) -> AppResult<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Err(AppError::EndOfInput);
        }

        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    /// Prompts until `parse` accepts the answer, printing each rejection.
    pub fn prompt_until<T, E: Display>(
        &mut self,
        label: impl Display,
        mut parse: impl FnMut(&str) -> Result<T, E>,
    ) -> AppResult<T> {
        loop {
            let answer = self.prompt(&label)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => self.line(format!("{}.", e))?,
            }
        }
    }

    /// Reads a menu choice. `None` for anything that is not an integer.
    pub fn choice(&mut self, label: impl Display) -> AppResult<Option<i64>> {
        let answer = self.prompt(label)?;
        Ok(answer.trim().parse().ok())
    }

    /// Waits for the user to press enter.
    pub fn pause(&mut self) -> AppResult<()> {
        self.line(PRESS_ENTER)?;
        self.prompt("")?;
        Ok(())
    }
}
