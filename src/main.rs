//! Entry point for the vshell CLI.
//!
//! Opens the archive, replays the optional script, then hands the session
//! to the interactive prompt.

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;

use vshell::{
    Archive, Cli, CommandDispatcher, Flow, InteractiveLoop, ScriptRunner, Session, ShellState, shell,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    // Nothing runs without a valid archive
    let archive = Archive::open(&cli.image).await?;
    let mut dispatcher = CommandDispatcher::new(ShellState::new(Session::from(archive)));
    let mut stdout = tokio::io::stdout();

    if let Some(script) = &cli.script {
        match ScriptRunner::load(script).await {
            Ok(runner) => {
                if runner.run(&mut dispatcher, &mut stdout).await? == Flow::Quit {
                    return Ok(());
                }
            }
            // A bad script does not prevent interactive use
            Err(err) => shell::report(&mut stdout, &err).await?,
        }
    }

    let stdin = BufReader::new(tokio::io::stdin());
    InteractiveLoop::new(stdin, stdout).run(&mut dispatcher).await
}

/// Diagnostics go to stderr so they never mix with command output.
fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = cli.log_level() {
        builder.filter_level(level);
    }
    builder.target(env_logger::Target::Stderr).init();
}
