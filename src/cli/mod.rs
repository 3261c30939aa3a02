//! CLI module; subcommands live here.
//!
//! The binary is a thin diagnostic shell over the library: `ls` and `stat`
//! drive the same session/dispatch path the sync engine uses.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

use crate::codec::LocaleEncoding;
use crate::Result;

pub mod ls;
pub mod stat;

#[derive(Debug, Clone)]
pub enum Command {
    Ls(ls::LsArgs),
    Stat(stat::StatArgs),
    None,
}

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            command: Command::None,
        }
    }
}

pub fn dispatch(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Ls(l) => ls::execute(l),
        Command::Stat(s) => stat::execute(s),
        Command::None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Locale selection for the path codec, as a CLI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum EncodingArg {
    #[default]
    Utf8,
    Latin1,
}

impl From<EncodingArg> for LocaleEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Utf8 => LocaleEncoding::Utf8,
            EncodingArg::Latin1 => LocaleEncoding::Latin1,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "syncvio", version, about = "virtual I/O dispatch for directory sync backends")]
struct Cli {
    #[command(subcommand)]
    command: Option<Subcommands>,
}

#[derive(Subcommand, Debug)]
enum Subcommands {
    /// Enumerate one directory through a bound backend.
    Ls(ls::LsArgs),
    /// Stat a single path through a bound backend.
    Stat(stat::StatArgs),
}

/// Parse CLI arguments into internal representation.
pub fn parse_args<I, S>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let argv: Vec<String> = args.into_iter().map(Into::into).collect();
    let cli = Cli::parse_from(argv);
    let command = match cli.command {
        Some(Subcommands::Ls(args)) => Command::Ls(args),
        Some(Subcommands::Stat(args)) => Command::Stat(args),
        None => Command::None,
    };

    Ok(CliArgs { command })
}

/// Build the underlying clap `Command` (useful for help/usage contract tests).
pub fn clap_command() -> clap::Command {
    Cli::command()
}
