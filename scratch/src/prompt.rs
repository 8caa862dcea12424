//! Line input sources
//!
//! The resolver reads values through the [`Prompter`] trait: rustyline when
//! stdin is a terminal, a plain buffered reader otherwise (pipes, tests).

use std::io::{BufRead, Write};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::PromptError;

/// Reads one line of user input
pub trait Prompter {
    /// Show `prompt` and return the entered line without its terminator
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError>;
}

/// Interactive line editor backed by rustyline
pub struct ReadlinePrompter {
    editor: DefaultEditor,
}

impl ReadlinePrompter {
    pub fn new() -> Result<Self, PromptError> {
        let editor = DefaultEditor::new().map_err(|e| PromptError::Read(e.to_string()))?;
        Ok(Self { editor })
    }
}

impl Prompter for ReadlinePrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(line)
            }
            Err(ReadlineError::Interrupted) => Err(PromptError::Interrupted),
            Err(ReadlineError::Eof) => Err(PromptError::Eof),
            Err(err) => Err(PromptError::Read(err.to_string())),
        }
    }
}

/// Reads lines from any buffered reader, echoing the prompt to `out`
pub struct LinePrompter<R, W> {
    reader: R,
    out: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self { reader, out }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.out, "{}", prompt).map_err(|e| PromptError::Read(e.to_string()))?;
        self.out.flush().map_err(|e| PromptError::Read(e.to_string()))?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| PromptError::Read(e.to_string()))?;
        if read == 0 {
            return Err(PromptError::Eof);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}
