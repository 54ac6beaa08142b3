mod fmt;
mod taghelpers;

use anyhow::Result;
use clap::Subcommand;

use crate::args::Args;
use crate::cli::Session;
use crate::exit::Exit;

pub trait Command {
    fn execute(&self, args: &Args, session: &Session) -> Result<Exit>;
}

#[derive(Debug, Subcommand)]
pub enum RzlsCommand {
    /// Format Razor documents
    Fmt(self::fmt::Fmt),
    /// List the tag helpers discovered in a compilation snapshot
    Taghelpers(self::taghelpers::Taghelpers),
}

impl Command for RzlsCommand {
    fn execute(&self, args: &Args, session: &Session) -> Result<Exit> {
        match self {
            RzlsCommand::Fmt(command) => command.execute(args, session),
            RzlsCommand::Taghelpers(command) => command.execute(args, session),
        }
    }
}
