//! In-memory backend.
//!
//! A hermetic tree keyed by normalized universal paths. Registered as the
//! `"memory"` builtin so the dispatch path can be exercised without touching
//! a disk and without a remote server; it also demonstrates a backend that
//! omits part of the optional mutation set (no chmod, no set_mtime).

use std::collections::BTreeMap;
use std::io;
use std::time::SystemTime;

use crate::codec::{base_name, PathCodec};
use crate::{Error, Result};

use super::{BackendOptions, Capabilities, DirCursor, FileStat, FileType, VioBackend};

#[derive(Debug, Clone)]
struct MemNode {
    file_type: FileType,
    size: u64,
    modified: SystemTime,
}

impl MemNode {
    fn dir() -> Self {
        Self {
            file_type: FileType::Directory,
            size: 0,
            modified: SystemTime::now(),
        }
    }

    fn file(size: u64) -> Self {
        Self {
            file_type: FileType::Regular,
            size,
            modified: SystemTime::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemBackend {
    // Normalized path (no surrounding slashes, "" is the root) -> node.
    nodes: BTreeMap<String, MemNode>,
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

fn not_found(path: &str) -> anyhow::Error {
    Error::Io(io::Error::new(io::ErrorKind::NotFound, path.to_string())).into()
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a regular file, creating no parents. Used by tests and
    /// demos to set up fixtures before binding.
    pub fn insert_file(&mut self, path: &str, size: u64) {
        self.nodes.insert(normalize(path), MemNode::file(size));
    }

    /// Pre-populate a directory.
    pub fn insert_dir(&mut self, path: &str) {
        self.nodes.insert(normalize(path), MemNode::dir());
    }

    fn lookup(&self, path: &str) -> Result<&MemNode> {
        let key = normalize(path);
        if key.is_empty() {
            // The root directory always exists.
            return Err(not_found(path));
        }
        self.nodes.get(&key).ok_or_else(|| not_found(path))
    }

    fn children_of(&self, dir: &str) -> Vec<FileStat> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        self.nodes
            .iter()
            .filter(|(path, _)| {
                path.starts_with(&prefix) && !path[prefix.len()..].contains('/')
            })
            .map(|(path, node)| {
                let mut stat = FileStat::new(base_name(path), node.file_type);
                stat.size = node.size;
                stat.modified = Some(node.modified);
                stat
            })
            .collect()
    }
}

impl VioBackend for MemBackend {
    fn protocol(&self) -> &'static str {
        "memory"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            mkdir: true,
            rmdir: true,
            rename: true,
            unlink: true,
            ..Capabilities::mandatory()
        }
    }

    fn init(&mut self, _opts: &BackendOptions, _codec: PathCodec) -> Result<()> {
        // Universal paths are the native form here; no codec needed.
        Ok(())
    }

    fn open_dir(&mut self, path: &str) -> Result<Box<dyn DirCursor>> {
        let key = normalize(path);
        if !key.is_empty() {
            let node = self.lookup(path)?;
            if node.file_type != FileType::Directory {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::NotADirectory,
                    path.to_string(),
                ))
                .into());
            }
        }
        let entries = self.children_of(&key);
        Ok(Box::new(MemDirCursor {
            entries: entries.into_iter(),
        }))
    }

    fn stat(&mut self, path: &str) -> Result<FileStat> {
        if normalize(path).is_empty() {
            return Ok(FileStat::new("/", FileType::Directory));
        }
        let node = self.lookup(path)?;
        let mut stat = FileStat::new(base_name(path), node.file_type);
        stat.size = node.size;
        stat.modified = Some(node.modified);
        Ok(stat)
    }

    fn mkdir(&mut self, path: &str, _mode: u32) -> Result<()> {
        let key = normalize(path);
        if self.nodes.contains_key(&key) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                path.to_string(),
            ))
            .into());
        }
        self.nodes.insert(key, MemNode::dir());
        Ok(())
    }

    fn rmdir(&mut self, path: &str) -> Result<()> {
        let key = normalize(path);
        let node = self.lookup(path)?;
        if node.file_type != FileType::Directory {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotADirectory,
                path.to_string(),
            ))
            .into());
        }
        if !self.children_of(&key).is_empty() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::DirectoryNotEmpty,
                path.to_string(),
            ))
            .into());
        }
        self.nodes.remove(&key);
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let from_key = normalize(from);
        let node = match self.nodes.remove(&from_key) {
            Some(node) => node,
            None => return Err(not_found(from)),
        };
        // Move children along with a renamed directory.
        let from_prefix = format!("{from_key}/");
        let to_key = normalize(to);
        let moved: Vec<(String, MemNode)> = self
            .nodes
            .iter()
            .filter(|(path, _)| path.starts_with(&from_prefix))
            .map(|(path, node)| {
                (
                    format!("{to_key}/{}", &path[from_prefix.len()..]),
                    node.clone(),
                )
            })
            .collect();
        self.nodes.retain(|path, _| !path.starts_with(&from_prefix));
        self.nodes.extend(moved);
        self.nodes.insert(to_key, node);
        Ok(())
    }

    fn unlink(&mut self, path: &str) -> Result<()> {
        let key = normalize(path);
        let node = self.lookup(path)?;
        if node.file_type == FileType::Directory {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::IsADirectory,
                path.to_string(),
            ))
            .into());
        }
        self.nodes.remove(&key);
        Ok(())
    }
}

struct MemDirCursor {
    entries: std::vec::IntoIter<FileStat>,
}

impl DirCursor for MemDirCursor {
    fn next_entry(&mut self) -> Result<Option<FileStat>> {
        Ok(self.entries.next())
    }
}
