//! Built-in local-filesystem backend.
//!
//! Always registered, needs no external module or credentials, and keeps the
//! engine able to sync local directories on its own. Uses lstat semantics so
//! symlinks are reported as symlinks, not their targets. I/O errors pass
//! through as [`Error::Io`] with the platform's `ErrorKind` intact, so
//! permission-denied stays distinguishable from not-found.

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::codec::{base_name, PathCodec};
use crate::{Error, Result};

use super::{BackendOptions, Capabilities, DirCursor, FileStat, FileType, VioBackend};

#[derive(Debug, Default)]
pub struct LocalBackend {
    codec: PathCodec,
}

impl LocalBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a universal path and materialize it as a native PathBuf. The
    /// encoded buffer lives only for the duration of the conversion.
    fn native(&self, path: &str) -> Result<PathBuf> {
        let encoded = self.codec.encode(path)?;
        Ok(PathBuf::from(encoded.as_os_str()))
    }

    fn stat_of(&self, native: &std::path::Path, name: String) -> Result<FileStat> {
        let meta = fs::symlink_metadata(native).map_err(Error::from)?;

        let file_type = if meta.file_type().is_symlink() {
            FileType::Symlink
        } else if meta.is_dir() {
            FileType::Directory
        } else if meta.is_file() {
            FileType::Regular
        } else {
            FileType::Unknown
        };

        let mut stat = FileStat::new(name, file_type);
        stat.size = meta.len();
        stat.modified = meta.modified().ok();
        #[cfg(unix)]
        {
            use std::os::unix::fs::{MetadataExt, PermissionsExt};
            stat.inode = Some(meta.ino());
            stat.mode = Some(meta.permissions().mode());
        }
        Ok(stat)
    }
}

impl VioBackend for LocalBackend {
    fn protocol(&self) -> &'static str {
        "local"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::full()
    }

    fn init(&mut self, _opts: &BackendOptions, codec: PathCodec) -> Result<()> {
        self.codec = codec;
        Ok(())
    }

    fn open_dir(&mut self, path: &str) -> Result<Box<dyn DirCursor>> {
        let native = self.native(path)?;
        let entries = fs::read_dir(&native).map_err(Error::from)?;
        Ok(Box::new(LocalDirCursor {
            entries,
            codec: self.codec,
        }))
    }

    fn stat(&mut self, path: &str) -> Result<FileStat> {
        let native = self.native(path)?;
        self.stat_of(&native, base_name(path).to_string())
    }

    fn mkdir(&mut self, path: &str, mode: u32) -> Result<()> {
        let native = self.native(path)?;
        fs::create_dir(&native).map_err(Error::from)?;
        self.chmod(path, mode)
    }

    fn rmdir(&mut self, path: &str) -> Result<()> {
        let native = self.native(path)?;
        fs::remove_dir(&native).map_err(Error::from)?;
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let from_native = self.native(from)?;
        let to_native = self.native(to)?;
        fs::rename(&from_native, &to_native).map_err(Error::from)?;
        Ok(())
    }

    fn unlink(&mut self, path: &str) -> Result<()> {
        let native = self.native(path)?;
        fs::remove_file(&native).map_err(Error::from)?;
        Ok(())
    }

    #[cfg(unix)]
    fn chmod(&mut self, path: &str, mode: u32) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let native = self.native(path)?;
        fs::set_permissions(&native, fs::Permissions::from_mode(mode)).map_err(Error::from)?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn chmod(&mut self, _path: &str, _mode: u32) -> Result<()> {
        Err(Error::Unsupported("chmod").into())
    }

    fn set_mtime(&mut self, path: &str, mtime: SystemTime) -> Result<()> {
        let native = self.native(path)?;
        let file = fs::File::options()
            .write(true)
            .open(&native)
            .map_err(Error::from)?;
        file.set_modified(mtime).map_err(Error::from)?;
        Ok(())
    }
}

struct LocalDirCursor {
    entries: fs::ReadDir,
    codec: PathCodec,
}

impl DirCursor for LocalDirCursor {
    fn next_entry(&mut self) -> Result<Option<FileStat>> {
        let entry = match self.entries.next() {
            Some(entry) => entry.map_err(Error::from)?,
            None => return Ok(None),
        };

        // Entry names come back in native encoding; decode to universal form
        // so the engine never sees locale bytes.
        #[cfg(unix)]
        let name = {
            use std::os::unix::ffi::OsStrExt;
            self.codec.decode(entry.file_name().as_bytes())?
        };
        #[cfg(not(unix))]
        let name = entry.file_name().to_string_lossy().into_owned();

        let meta = entry.metadata().map_err(Error::from)?;
        let file_type = if meta.file_type().is_symlink() {
            FileType::Symlink
        } else if meta.is_dir() {
            FileType::Directory
        } else if meta.is_file() {
            FileType::Regular
        } else {
            FileType::Unknown
        };

        let mut stat = FileStat::new(name, file_type);
        stat.size = meta.len();
        stat.modified = meta.modified().ok();
        #[cfg(unix)]
        {
            use std::os::unix::fs::{MetadataExt, PermissionsExt};
            stat.inode = Some(meta.ino());
            stat.mode = Some(meta.permissions().mode());
        }
        Ok(Some(stat))
    }
}
