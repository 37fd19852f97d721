//! Navigation state and operations.
//!
//! The operations are free functions over a [`Session`] and a [`Cursor`]:
//! they return the output and, for `cd`, the next cursor. [`ShellState`]
//! keeps the one live cursor and applies those transitions.

use std::fmt;

use crate::archive::Archive;
use crate::error::ShellError;

use super::index::{EntryIndex, Lookup};
use super::path;

/// Marker appended by `pwd` when the cursor sits on the root
pub const ROOT_MARKER: &str = "(root)";

/// One loaded archive: its entries and the synthetic root directory name
#[derive(Debug, Clone)]
pub struct Session {
    root: String,
    index: EntryIndex,
}

impl Session {
    pub fn new(root: impl Into<String>, index: EntryIndex) -> Self {
        Self {
            root: root.into(),
            index,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn index(&self) -> &EntryIndex {
        &self.index
    }

    /// Cursor positioned on the root
    pub fn start(&self) -> Cursor {
        Cursor(self.root.clone())
    }

    fn is_directory(&self, resolved: &str) -> bool {
        resolved == self.root || self.index.directory_exists(resolved)
    }

    /// Classify a missing directory: an existing file is reported as such.
    fn not_a_directory(&self, resolved: &str, expr: &str) -> ShellError {
        match self.index.resolve_file(resolved) {
            Lookup::File(_) => ShellError::NotADirectory(expr.to_string()),
            _ => ShellError::PathNotFound(expr.to_string()),
        }
    }
}

impl From<Archive> for Session {
    fn from(archive: Archive) -> Self {
        Self::new(archive.root, EntryIndex::new(archive.entries))
    }
}

/// Current directory, always the root or a path below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `pwd`
pub fn print_working_directory(session: &Session, cursor: &Cursor) -> String {
    if cursor.as_str() == session.root() {
        format!("{}{}", cursor, ROOT_MARKER)
    } else {
        cursor.to_string()
    }
}

/// `ls [path]`; never moves the cursor
pub fn list(
    session: &Session,
    cursor: &Cursor,
    expr: Option<&str>,
) -> Result<String, ShellError> {
    let target = match expr {
        None | Some(".") | Some("/") => cursor.to_string(),
        Some(expr) => {
            if !path::is_syntactically_valid(expr) {
                return Err(ShellError::MalformedPath(expr.to_string()));
            }
            let resolved = path::resolve(session.root(), cursor.as_str(), expr);
            if !session.is_directory(&resolved) {
                return Err(session.not_a_directory(&resolved, expr));
            }
            resolved
        }
    };

    Ok(session.index().list_children(&target).join(" "))
}

/// `cd <path>`; returns the new cursor, which is also what gets printed
pub fn change_directory(
    session: &Session,
    cursor: &Cursor,
    expr: Option<&str>,
) -> Result<Cursor, ShellError> {
    let expr = expr.ok_or(ShellError::MissingArgument("cd"))?;
    if expr == "." || expr == "/" {
        return Ok(cursor.clone());
    }
    if !path::is_syntactically_valid(expr) {
        return Err(ShellError::MalformedPath(expr.to_string()));
    }
    if expr == ".." {
        return Ok(Cursor(path::parent(session.root(), cursor.as_str())));
    }

    let resolved = path::resolve(session.root(), cursor.as_str(), expr);
    if session.is_directory(&resolved) {
        Ok(Cursor(resolved))
    } else {
        Err(session.not_a_directory(&resolved, expr))
    }
}

/// `cat <path>`; file bytes decoded as UTF-8, invalid sequences replaced
pub fn concatenate(
    session: &Session,
    cursor: &Cursor,
    expr: Option<&str>,
) -> Result<String, ShellError> {
    let expr = expr.ok_or(ShellError::MissingArgument("cat"))?;
    if !path::is_syntactically_valid(expr) {
        return Err(ShellError::MalformedPath(expr.to_string()));
    }

    let resolved = path::resolve(session.root(), cursor.as_str(), expr);
    if resolved == session.root() {
        return Err(ShellError::NotAFile(expr.to_string()));
    }
    match session.index().resolve_file(&resolved) {
        Lookup::File(entry) => {
            let bytes = entry.content.as_deref().unwrap_or_default();
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
        Lookup::Directory => Err(ShellError::NotAFile(expr.to_string())),
        Lookup::Missing => Err(ShellError::PathNotFound(expr.to_string())),
    }
}

/// The live session and its cursor
#[derive(Debug, Clone, Default)]
pub struct ShellState {
    session: Option<(Session, Cursor)>,
}

impl ShellState {
    /// State with no archive loaded; every command reports `NoActiveSession`
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(session: Session) -> Self {
        let cursor = session.start();
        Self {
            session: Some((session, cursor)),
        }
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.session.as_ref().map(|(_, cursor)| cursor)
    }

    fn active(&self) -> Result<(&Session, &Cursor), ShellError> {
        self.session
            .as_ref()
            .map(|(session, cursor)| (session, cursor))
            .ok_or(ShellError::NoActiveSession)
    }

    pub fn pwd(&self) -> Result<String, ShellError> {
        let (session, cursor) = self.active()?;
        Ok(print_working_directory(session, cursor))
    }

    pub fn ls(&self, expr: Option<&str>) -> Result<String, ShellError> {
        let (session, cursor) = self.active()?;
        list(session, cursor, expr)
    }

    pub fn cd(&mut self, expr: Option<&str>) -> Result<String, ShellError> {
        let (session, cursor) = self.active()?;
        let next = change_directory(session, cursor, expr)?;
        let shown = next.to_string();
        if let Some((_, cursor)) = self.session.as_mut() {
            log::debug!("cd {} -> {}", cursor, next);
            *cursor = next;
        }
        Ok(shown)
    }

    pub fn cat(&self, expr: Option<&str>) -> Result<String, ShellError> {
        let (session, cursor) = self.active()?;
        concatenate(session, cursor, expr)
    }
}
