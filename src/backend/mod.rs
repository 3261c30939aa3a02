//! The backend contract: the operation set every filesystem backend (local
//! or remote-protocol) exposes to the dispatcher.
//!
//! Backends receive universal paths and perform their own native-encoding
//! conversion with the [`PathCodec`](crate::codec::PathCodec) handed to
//! [`VioBackend::init`]. Mutation operations are optional; the defaults
//! report [`Error::Unsupported`] so a backend only implements what its
//! protocol can honor.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::codec::PathCodec;
use crate::{Error, Result};

pub mod local;
pub mod memory;

/// Type of one filesystem entry. Never omitted: entries the backend cannot
/// classify report `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Regular,
    Directory,
    Symlink,
    Unknown,
}

/// Metadata for one filesystem entry, stable across all backends.
///
/// `name` is the entry's base name, never a full path. `inode` and `mode`
/// are backend-specific and absent where the protocol has no equivalent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileStat {
    pub name: String,
    pub file_type: FileType,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub inode: Option<u64>,
    pub mode: Option<u32>,
}

impl FileStat {
    pub fn new(name: impl Into<String>, file_type: FileType) -> Self {
        Self {
            name: name.into(),
            file_type,
            size: 0,
            modified: None,
            inode: None,
            mode: None,
        }
    }
}

/// Options handed to a backend at bind time. The local backend ignores all
/// of them; remote protocols use what they need.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendOptions {
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Self-reported operation table of a backend, validated at bind time.
///
/// A backend advertising an incomplete mandatory set (`open_dir`, `read_dir`,
/// `close_dir`, `stat`) is rejected as malformed before `init` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub open_dir: bool,
    pub read_dir: bool,
    pub close_dir: bool,
    pub stat: bool,
    pub mkdir: bool,
    pub rmdir: bool,
    pub rename: bool,
    pub unlink: bool,
    pub chmod: bool,
    pub set_mtime: bool,
}

impl Capabilities {
    /// The subset every backend must support.
    pub const fn mandatory() -> Self {
        Self {
            open_dir: true,
            read_dir: true,
            close_dir: true,
            stat: true,
            mkdir: false,
            rmdir: false,
            rename: false,
            unlink: false,
            chmod: false,
            set_mtime: false,
        }
    }

    /// Everything, including the optional mutation set.
    pub const fn full() -> Self {
        Self {
            open_dir: true,
            read_dir: true,
            close_dir: true,
            stat: true,
            mkdir: true,
            rmdir: true,
            rename: true,
            unlink: true,
            chmod: true,
            set_mtime: true,
        }
    }

    pub fn has_mandatory(&self) -> bool {
        self.open_dir && self.read_dir && self.close_dir && self.stat
    }
}

/// One open directory-enumeration stream. `Ok(None)` is end-of-stream.
/// A cursor is backend-private state; the dispatcher stores it opaquely and
/// drops it on close.
pub trait DirCursor {
    fn next_entry(&mut self) -> Result<Option<FileStat>>;
}

/// Operation contract a backend implements. All paths are universal; the
/// backend converts internally via the codec received in `init`.
pub trait VioBackend {
    fn protocol(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    /// Called exactly once when the backend is bound to a session. A failed
    /// init must leave no backend state visible to the dispatcher; the
    /// instance is dropped without `shutdown`.
    fn init(&mut self, opts: &BackendOptions, codec: PathCodec) -> Result<()>;

    /// Called exactly once at unbind for backend-specific teardown.
    fn shutdown(&mut self) {}

    fn open_dir(&mut self, path: &str) -> Result<Box<dyn DirCursor>>;

    fn stat(&mut self, path: &str) -> Result<FileStat>;

    fn mkdir(&mut self, _path: &str, _mode: u32) -> Result<()> {
        Err(Error::Unsupported("mkdir").into())
    }

    fn rmdir(&mut self, _path: &str) -> Result<()> {
        Err(Error::Unsupported("rmdir").into())
    }

    fn rename(&mut self, _from: &str, _to: &str) -> Result<()> {
        Err(Error::Unsupported("rename").into())
    }

    fn unlink(&mut self, _path: &str) -> Result<()> {
        Err(Error::Unsupported("unlink").into())
    }

    fn chmod(&mut self, _path: &str, _mode: u32) -> Result<()> {
        Err(Error::Unsupported("chmod").into())
    }

    fn set_mtime(&mut self, _path: &str, _mtime: SystemTime) -> Result<()> {
        Err(Error::Unsupported("set_mtime").into())
    }
}
