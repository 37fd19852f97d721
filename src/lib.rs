//! # vshell
//!
//! Browse zip and tar archives through a small shell without extracting them.
//!
//! The archive is decoded once into a flat list of entries. The shell then
//! presents those entries as a directory tree rooted at the archive's file
//! name and answers `pwd`, `ls`, `cd`, `cat` and `quit`, either from a
//! script file or from an interactive prompt.
//!
//! ## Features
//!
//! - ZIP archives with STORED and DEFLATE entries, including ZIP64
//! - tar archives (ustar, GNU long names, pax paths), optionally gzipped
//! - Relative paths with `.` and `..`, clamped at the archive root
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use vshell::{Archive, CommandDispatcher, Outcome, Session, ShellState};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let archive = Archive::open(Path::new("root.zip")).await?;
//!     let mut shell = CommandDispatcher::new(ShellState::new(Session::from(archive)));
//!
//!     if let Outcome::Output(text) = shell.dispatch("ls")? {
//!         println!("{}", text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod io;
pub mod shell;
pub mod tar;
pub mod zip;

pub use archive::{Archive, ArchiveEntry, ArchiveFormat};
pub use cli::Cli;
pub use error::ShellError;
pub use io::{LocalFileReader, ReadAt};
pub use shell::{
    CommandDispatcher, Cursor, EntryIndex, Flow, InteractiveLoop, Outcome, ScriptRunner, Session,
    ShellState,
};
pub use crate::zip::{ZipExtractor, ZipFileEntry};
