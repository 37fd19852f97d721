use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vshell")]
#[command(version)]
#[command(about = "Browse a zip or tar archive like a directory tree", long_about = None)]
#[command(after_help = "Commands:\n  \
  pwd            print the current directory\n  \
  ls [PATH]      list a directory\n  \
  cd PATH        change directory (., .., relative paths)\n  \
  cat PATH       print a file\n  \
  quit           leave the shell\n\n\
Examples:\n  \
  vshell root.zip                  open root.zip at the prompt\n  \
  vshell -s commands.txt root.tar  run commands.txt, then prompt")]
pub struct Cli {
    /// Archive to open (.zip, .tar, .tar.gz, .tgz)
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Script of commands to run before the prompt
    #[arg(short = 's', long = "script", value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log level from `-v`; `None` leaves the choice to `RUST_LOG`
    pub fn log_level(&self) -> Option<LevelFilter> {
        match self.verbose {
            0 => None,
            1 => Some(LevelFilter::Info),
            2 => Some(LevelFilter::Debug),
            _ => Some(LevelFilter::Trace),
        }
    }
}
