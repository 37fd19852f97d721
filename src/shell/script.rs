//! Batch execution of a command file.

use std::path::Path;

use anyhow::{Result, bail};
use tokio::io::AsyncWrite;

use super::{CommandDispatcher, Flow, run_line};

/// Lines of a script, replayed in order through the dispatcher
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    lines: Vec<String>,
}

impl ScriptRunner {
    /// Read a script file. Lines end in `\r\n`; bare `\n` is accepted too.
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            bail!("script file does not exist: {}", path.display());
        }
        let text = tokio::fs::read_to_string(path).await?;
        Ok(Self::from_source(&text))
    }

    pub fn from_source(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Run every line, printing results to `out`.
    ///
    /// A failing line is reported and the next one runs. `quit` stops the
    /// script and is passed on as [`Flow::Quit`] so the session ends too.
    pub async fn run<W: AsyncWrite + Unpin>(
        &self,
        dispatcher: &mut CommandDispatcher,
        out: &mut W,
    ) -> Result<Flow> {
        for (number, line) in self.lines.iter().enumerate() {
            log::debug!("script line {}: {}", number + 1, line);
            if run_line(dispatcher, line, out).await? == Flow::Quit {
                log::info!("script quit at line {}", number + 1);
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }
}
