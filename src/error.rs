//! Errors reported by the shell.
//!
//! Every variant is recoverable once a session exists: the command prints
//! the message and the cursor stays where it was. The archive variants stop
//! startup before a session is created.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("image entry does not exist: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    #[error("image entry has wrong extension: {} (expected .zip, .tar, .tar.gz or .tgz)", .0.display())]
    UnsupportedExtension(PathBuf),

    #[error("image is not defined")]
    NoActiveSession,

    #[error("{0}: provide path")]
    MissingArgument(&'static str),

    #[error("incorrect path syntax: '{0}'")]
    MalformedPath(String),

    #[error("path does not exist: '{0}'")]
    PathNotFound(String),

    #[error("entry is not a file: '{0}'")]
    NotAFile(String),

    #[error("entry is not a directory: '{0}'")]
    NotADirectory(String),

    #[error("{0} command does not exist")]
    UnknownCommand(String),
}
