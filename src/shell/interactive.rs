//! The prompt loop.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::{CommandDispatcher, Flow, run_line};

/// Reads one command per prompt until `quit` or end of input
pub struct InteractiveLoop<R, W> {
    input: R,
    output: W,
}

impl<R, W> InteractiveLoop<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(dispatcher: &CommandDispatcher) -> String {
        let cwd = dispatcher
            .state()
            .cursor()
            .map(|cursor| cursor.to_string())
            .unwrap_or_default();
        format!("VSHELL[{}]>>", cwd)
    }

    pub async fn run(&mut self, dispatcher: &mut CommandDispatcher) -> Result<()> {
        let mut raw = Vec::new();
        loop {
            self.output
                .write_all(Self::prompt(dispatcher).as_bytes())
                .await?;
            self.output.flush().await?;

            raw.clear();
            if self.input.read_until(b'\n', &mut raw).await? == 0 {
                log::debug!("end of input");
                self.output.write_all(b"\n").await?;
                self.output.flush().await?;
                return Ok(());
            }

            // Invalid UTF-8 becomes U+FFFD and fails as a path, not as I/O
            let line = String::from_utf8_lossy(&raw);
            if run_line(dispatcher, &line, &mut self.output).await? == Flow::Quit {
                return Ok(());
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveEntry;
    use crate::shell::{EntryIndex, Session, ShellState};

    fn dispatcher() -> CommandDispatcher {
        CommandDispatcher::new(ShellState::new(Session::new(
            "root",
            EntryIndex::new(vec![
                ArchiveEntry::directory("root/"),
                ArchiveEntry::directory("root/docs/"),
                ArchiveEntry::file("root/docs/a.txt", "alpha"),
            ]),
        )))
    }

    async fn session(input: &str) -> String {
        let mut dispatcher = dispatcher();
        let mut repl = InteractiveLoop::new(input.as_bytes(), Vec::new());
        repl.run(&mut dispatcher).await.unwrap();
        String::from_utf8(repl.into_output()).unwrap()
    }

    #[tokio::test]
    async fn prompts_with_the_cursor() {
        let out = session("cd docs\nquit\nls\n").await;
        assert_eq!(out, "VSHELL[root]>>root/docs\nVSHELL[root/docs]>>");
    }

    #[tokio::test]
    async fn ends_on_eof() {
        let out = session("cat docs/a.txt\n").await;
        assert_eq!(out, "VSHELL[root]>>alpha\nVSHELL[root]>>\n");
    }

    #[tokio::test]
    async fn invalid_utf8_line_keeps_the_session() {
        let mut dispatcher = dispatcher();
        let input: &[u8] = b"cd \xff\npwd\nquit\n";
        let mut repl = InteractiveLoop::new(input, Vec::new());
        repl.run(&mut dispatcher).await.unwrap();

        let out = String::from_utf8(repl.into_output()).unwrap();
        assert_eq!(
            out,
            "VSHELL[root]>>ERROR: path does not exist: '\u{FFFD}'\nVSHELL[root]>>root(root)\nVSHELL[root]>>"
        );
    }

    #[tokio::test]
    async fn windows_line_endings() {
        let out = session("pwd\r\nquit\r\n").await;
        assert_eq!(out, "VSHELL[root]>>root(root)\nVSHELL[root]>>");
    }
}
