use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use rzls_conf::Settings;

use crate::args::Args;
use crate::commands::Command;
use crate::commands::RzlsCommand;
use crate::logging;

/// The main CLI structure that defines the command-line interface
#[derive(Parser)]
#[command(name = "rzls")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: RzlsCommand,

    #[command(flatten)]
    pub args: Args,
}

/// State shared by every command: where the project lives and how it is
/// configured.
#[derive(Debug)]
pub struct Session {
    pub project_root: Utf8PathBuf,
    pub settings: Settings,
}

/// Parse CLI arguments and execute the chosen command
pub fn run(args: Vec<String>) -> Result<ExitCode> {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });

    let project_root = resolve_project_root()?;
    let settings = Settings::new(&project_root).context("Failed to load settings")?;
    let _guard = logging::init_tracing(&cli.args.global, settings.debug());
    tracing::debug!(%project_root, "Loaded settings");

    let session = Session {
        project_root,
        settings,
    };
    let exit = cli.command.execute(&cli.args, &session)?;
    Ok(exit.report(cli.args.global.quiet))
}

fn resolve_project_root() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|_| anyhow::anyhow!("Current directory is not valid UTF-8"))
}
