//! Implementation of `syncvio ls` subcommand.

use clap::Args;

use crate::backend::{BackendOptions, FileStat, FileType};
use crate::codec::PathCodec;
use crate::session::{ReplicaRole, Session};
use crate::{Error, Result};

use super::{EncodingArg, OutputFormat};

#[derive(Debug, Clone, Args, Default)]
pub struct LsArgs {
    /// Universal path of the directory to enumerate.
    pub path: Option<String>,

    /// Protocol name of the backend to bind.
    #[arg(short = 'p', long = "protocol", default_value = "local")]
    pub protocol: String,

    /// Backend URL (remote protocols only).
    #[arg(long = "url")]
    pub url: Option<String>,

    /// Native locale encoding for the path codec.
    #[arg(long = "encoding", value_enum, default_value = "utf8")]
    pub encoding: EncodingArg,

    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn execute(args: LsArgs) -> Result<()> {
    let path = args.path.ok_or_else(|| Error::Cli("path is required".into()))?;

    let codec = PathCodec::new(args.encoding.into());
    let mut session = Session::new(ReplicaRole::Local, codec);
    let opts = BackendOptions {
        url: args.url,
        ..BackendOptions::default()
    };
    session.bind(&args.protocol, &opts)?;

    let handle = session.open_dir(&path)?;
    let mut entries: Vec<FileStat> = Vec::new();
    while let Some(entry) = session.read_dir(handle)? {
        entries.push(entry);
    }
    session.close_dir(handle)?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            for entry in &entries {
                println!("{} {:>12} {}", type_tag(entry.file_type), entry.size, entry.name);
            }
        }
    }

    crate::logging::log_session_metrics(&args.protocol, session.stats());
    session.unbind();
    Ok(())
}

fn type_tag(file_type: FileType) -> char {
    match file_type {
        FileType::Regular => '-',
        FileType::Directory => 'd',
        FileType::Symlink => 'l',
        FileType::Unknown => '?',
    }
}
