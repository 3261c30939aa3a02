//! Virtual I/O layer for a directory-synchronization engine.
//!
//! The sync engine never touches a filesystem directly. It creates a
//! [`session::Session`] per replica side, binds a backend by protocol name
//! (`"local"` is always available; remote protocols are registered at
//! runtime), and issues directory and metadata operations through the
//! session's dispatch surface. Backends implement [`backend::VioBackend`] and
//! receive universal (encoding-agnostic) paths; conversion to the native
//! locale encoding happens inside each backend via [`codec::PathCodec`].

use thiserror::Error;

pub mod backend;
pub mod cli;
pub mod codec;
pub mod logging;
pub mod registry;
pub mod session;

pub type Result<T> = anyhow::Result<T>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),
    #[error("backend for protocol {0} is missing mandatory capabilities")]
    MalformedBackend(String),
    #[error("session already bound to protocol {0}")]
    AlreadyBound(String),
    #[error("no backend bound to session")]
    NotBound,
    #[error("invalid or closed directory handle")]
    InvalidHandle,
    #[error("operation not supported by backend: {0}")]
    Unsupported(&'static str),
    #[error("path not representable in {encoding}: {path}")]
    Encode { encoding: String, path: String },
    #[error("invalid {encoding} byte sequence in native path")]
    Decode { encoding: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("cli error: {0}")]
    Cli(String),
}

/// Entry point for the library, called by the CLI thin wrapper.
pub fn run<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    // Initialize logging before doing anything else. Defaults to human format for the CLI.
    logging::init_logging(logging::LogFormat::Human)?;

    let cli_args = cli::parse_args(args.into_iter().map(Into::into))?;
    cli::dispatch(cli_args)
}
