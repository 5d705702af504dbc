// lox - Command-line front end for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Line editor for the interactive session, with history persisted to disk.

use std::path::PathBuf;

use log::debug;
use rustyline::{DefaultEditor, Result as RustylineResult};

const HISTORY_FILE: &str = ".lox_history";

/// REPL editor with readline support.
pub struct Repl {
    editor: DefaultEditor,
}

impl Repl {
    /// Create a new editor, loading any saved history.
    pub fn new() -> RustylineResult<Self> {
        let mut editor = DefaultEditor::new()?;

        let history_path = history_file_path();
        if editor.load_history(&history_path).is_err() {
            debug!("no history loaded from {}", history_path.display());
        }

        Ok(Self { editor })
    }

    /// Read a line from the user.
    pub fn read_line(&mut self, prompt: &str) -> RustylineResult<String> {
        self.editor.readline(prompt)
    }

    pub fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    /// Save history to disk.
    pub fn finalize(&mut self) {
        let history_path = history_file_path();
        if let Err(e) = self.editor.save_history(&history_path) {
            debug!("failed to save history to {}: {}", history_path.display(), e);
        }
    }
}

/// `~/.lox_history`, or the working directory when there is no home.
fn history_file_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(HISTORY_FILE),
        None => PathBuf::from(HISTORY_FILE),
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    {
        std::env::var_os("HOME").map(PathBuf::from)
    }
    #[cfg(windows)]
    {
        std::env::var_os("USERPROFILE").map(PathBuf::from)
    }
    #[cfg(not(any(unix, windows)))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_file_path() {
        let path = history_file_path();
        assert!(path.ends_with(HISTORY_FILE));
    }
}
