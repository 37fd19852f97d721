//! The virtual shell over an archive's entry list.
//!
//! - [`path`]: path expression syntax and joining
//! - [`index`]: existence and listing queries over the entries
//! - [`state`]: the cursor and the `pwd`/`ls`/`cd`/`cat` operations
//! - [`dispatch`]: command line to operation
//! - [`script`] and [`interactive`]: the two sources of command lines

pub mod dispatch;
pub mod index;
pub mod interactive;
pub mod path;
pub mod script;
pub mod state;

pub use dispatch::{Command, CommandDispatcher, Outcome};
pub use index::{EntryIndex, Lookup};
pub use interactive::InteractiveLoop;
pub use script::ScriptRunner;
pub use state::{Cursor, Session, ShellState};

use std::fmt;

use anyhow::Result;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Whether more commands should be read after a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Dispatch one line and print its output or error.
pub async fn run_line<W: AsyncWrite + Unpin>(
    dispatcher: &mut CommandDispatcher,
    line: &str,
    out: &mut W,
) -> Result<Flow> {
    match dispatcher.dispatch(line) {
        Ok(Outcome::Output(text)) => write_line(out, &text).await?,
        Ok(Outcome::Silent) => {}
        Ok(Outcome::Quit) => return Ok(Flow::Quit),
        Err(err) => report(out, &err).await?,
    }
    Ok(Flow::Continue)
}

/// Print an error the way every command reports one.
pub async fn report<W, E>(out: &mut W, err: &E) -> Result<()>
where
    W: AsyncWrite + Unpin,
    E: fmt::Display + ?Sized,
{
    write_line(out, &format!("ERROR: {}", err)).await
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}
