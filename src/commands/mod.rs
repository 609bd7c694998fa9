//! Subcommands of the `studybuddy` binary.

use clap::Args;

use crate::logging::Verbosity;

pub mod ask;
pub mod avatar;
pub mod config;
pub mod embed;

pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("SB_GIT_DESCRIBE"),
    "\nbuilt: ",
    env!("SB_BUILD_DATE")
);

#[derive(Debug, Args, Clone, Default)]
pub struct LogArgs {
    /// Show debug logs on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Only show errors on stderr.
    #[arg(long, short, global = true)]
    quiet: bool,
}

impl LogArgs {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
