//! Command line dispatch.
//!
//! The one entry point shared by scripts and the interactive prompt.

use crate::error::ShellError;

use super::state::ShellState;

/// What the caller should do after a line was dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this text
    Output(String),
    /// Nothing to print (blank line)
    Silent,
    /// Stop reading commands
    Quit,
}

/// Built-in command names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pwd,
    Ls,
    Cd,
    Cat,
    Quit,
}

impl Command {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "pwd" => Some(Command::Pwd),
            "ls" => Some(Command::Ls),
            "cd" => Some(Command::Cd),
            "cat" => Some(Command::Cat),
            "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Maps command lines onto [`ShellState`] operations
#[derive(Debug)]
pub struct CommandDispatcher {
    state: ShellState,
}

impl CommandDispatcher {
    pub fn new(state: ShellState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// Run one line.
    ///
    /// Tokens are separated by single spaces; only the first argument is
    /// read and an empty one counts as missing. Errors never change the
    /// cursor.
    pub fn dispatch(&mut self, line: &str) -> Result<Outcome, ShellError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(Outcome::Silent);
        }

        let mut tokens = line.split(' ');
        let name = tokens.next().unwrap_or_default();
        let arg = tokens.next().filter(|arg| !arg.is_empty());
        log::debug!("dispatch {:?} {:?}", name, arg);

        let command =
            Command::parse(name).ok_or_else(|| ShellError::UnknownCommand(name.to_string()))?;
        let output = match command {
            Command::Pwd => self.state.pwd()?,
            Command::Ls => self.state.ls(arg)?,
            Command::Cd => self.state.cd(arg)?,
            Command::Cat => self.state.cat(arg)?,
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Output(output))
    }
}
