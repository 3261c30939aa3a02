//! Implementation of `syncvio stat` subcommand.

use clap::Args;

use crate::backend::BackendOptions;
use crate::codec::PathCodec;
use crate::session::{ReplicaRole, Session};
use crate::{Error, Result};

use super::{EncodingArg, OutputFormat};

#[derive(Debug, Clone, Args, Default)]
pub struct StatArgs {
    /// Universal path of the entry to stat.
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

pub fn execute(args: StatArgs) -> Result<()> {
    let path = args.path.ok_or_else(|| Error::Cli("path is required".into()))?;

    let codec = PathCodec::new(args.encoding.into());
    let mut session = Session::new(ReplicaRole::Local, codec);
    let opts = BackendOptions {
        url: args.url,
        ..BackendOptions::default()
    };
    session.bind(&args.protocol, &opts)?;

    let stat = session.stat(&path)?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stat)?);
        }
        OutputFormat::Text => {
            let out = format_text(&serde_json::to_value(&stat)?);
            print!("{out}");
        }
    }

    session.unbind();
    Ok(())
}

fn format_text(value: &serde_json::Value) -> String {
    // Simple deterministic formatter for object-like stat output.
    match value {
        serde_json::Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut out = String::new();
            for k in keys {
                let v = &map[&k];
                out.push_str(&format!("{k}={}\n", v));
            }
            out
        }
        other => other.to_string(),
    }
}
