//! Session state and the VIO dispatch surface used by the sync engine.
//!
//! A session represents one replica side of a sync run. It owns at most one
//! backend binding at a time and the table of open directory handles. All
//! operations are synchronous and blocking; a session is not meant to be
//! shared across threads (use one session per thread).

use std::collections::HashMap;
use std::time::SystemTime;

use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::{BackendOptions, DirCursor, FileStat, VioBackend};
use crate::codec::PathCodec;
use crate::registry::Registry;
use crate::{Error, Result};

/// Which side of the sync run this session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplicaRole {
    #[default]
    Local,
    Remote,
}

/// Opaque token for one open directory enumeration.
///
/// The backend-private cursor state lives in the session's handle table; a
/// handle that was never opened, or was already closed, fails every use with
/// [`Error::InvalidHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirHandle {
    id: u64,
}

impl DirHandle {
    /// The never-valid handle, mirroring a null handle at the C boundary.
    pub const NULL: DirHandle = DirHandle { id: 0 };
}

/// A validated backend bound to a session. Created atomically by `bind`,
/// released exactly once by `unbind`.
struct Binding {
    binding_id: Uuid,
    protocol: String,
    backend: Box<dyn VioBackend>,
}

/// Operation counters for observability; emitted via
/// [`crate::logging::log_session_metrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStats {
    pub ops_total: u64,
    pub ops_failed: u64,
    pub handles_open: usize,
}

pub struct Session {
    role: ReplicaRole,
    codec: PathCodec,
    registry: Registry,
    binding: Option<Binding>,
    cursors: HashMap<u64, Box<dyn DirCursor>>,
    next_handle: u64,
    stats: SessionStats,
}

impl Session {
    /// A session with the builtin registry, so `"local"` is always bindable.
    pub fn new(role: ReplicaRole, codec: PathCodec) -> Self {
        Self::with_registry(role, codec, Registry::with_builtins())
    }

    pub fn with_registry(role: ReplicaRole, codec: PathCodec, registry: Registry) -> Self {
        Self {
            role,
            codec,
            registry,
            binding: None,
            cursors: HashMap::new(),
            next_handle: 1,
            stats: SessionStats::default(),
        }
    }

    pub fn role(&self) -> ReplicaRole {
        self.role
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Protocol name of the bound backend, if any.
    pub fn bound_protocol(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.protocol.as_str())
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            handles_open: self.cursors.len(),
            ..self.stats
        }
    }

    /// Bind a named backend to this session.
    ///
    /// Fails with `AlreadyBound` if a binding exists, `UnknownProtocol` if
    /// the name does not resolve, and `MalformedBackend` if the resolved
    /// backend does not advertise the mandatory capability set. A failed
    /// bind never mutates session state.
    pub fn bind(&mut self, protocol: &str, opts: &BackendOptions) -> Result<()> {
        if let Some(binding) = &self.binding {
            return Err(Error::AlreadyBound(binding.protocol.clone()).into());
        }

        let factory = self.registry.resolve(protocol)?;
        let mut backend = factory();
        if !backend.capabilities().has_mandatory() {
            return Err(Error::MalformedBackend(protocol.to_string()).into());
        }

        // On init failure the instance is dropped here; nothing was installed.
        backend.init(opts, self.codec)?;

        let binding = Binding {
            binding_id: Uuid::new_v4(),
            protocol: protocol.to_string(),
            backend,
        };
        info!(
            target: "syncvio::session",
            binding_id = %binding.binding_id,
            protocol,
            role = ?self.role,
            "backend_bound"
        );
        self.binding = Some(binding);
        Ok(())
    }

    /// Release the bound backend. Idempotent: unbinding an unbound session
    /// is a no-op. Open handles are released with the binding.
    pub fn unbind(&mut self) {
        if let Some(mut binding) = self.binding.take() {
            self.cursors.clear();
            binding.backend.shutdown();
            info!(
                target: "syncvio::session",
                binding_id = %binding.binding_id,
                protocol = binding.protocol,
                "backend_unbound"
            );
        }
    }

    fn backend(&mut self) -> Result<&mut Box<dyn VioBackend>> {
        match &mut self.binding {
            Some(binding) => Ok(&mut binding.backend),
            None => Err(Error::NotBound.into()),
        }
    }

    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        self.stats.ops_total += 1;
        if result.is_err() {
            self.stats.ops_failed += 1;
        }
        result
    }

    /// Open a directory for enumeration, returning an opaque handle.
    pub fn open_dir(&mut self, path: &str) -> Result<DirHandle> {
        let result = self.backend().and_then(|b| b.open_dir(path));
        let cursor = self.track(result)?;
        let handle = DirHandle {
            id: self.next_handle,
        };
        self.next_handle += 1;
        self.cursors.insert(handle.id, cursor);
        debug!(target: "syncvio::session", handle = handle.id, path, "dir_opened");
        Ok(handle)
    }

    /// Next entry of an open enumeration; `Ok(None)` is end-of-stream.
    pub fn read_dir(&mut self, handle: DirHandle) -> Result<Option<FileStat>> {
        if !self.is_bound() {
            return self.track(Err(Error::NotBound.into()));
        }
        let result = match self.cursors.get_mut(&handle.id) {
            Some(cursor) => cursor.next_entry(),
            None => Err(Error::InvalidHandle.into()),
        };
        self.track(result)
    }

    /// Close an open handle. Closing a null, unknown, or already-closed
    /// handle fails with `InvalidHandle` so lifecycle bugs stay visible.
    pub fn close_dir(&mut self, handle: DirHandle) -> Result<()> {
        if !self.is_bound() {
            return self.track(Err(Error::NotBound.into()));
        }
        let result = match self.cursors.remove(&handle.id) {
            Some(cursor) => {
                drop(cursor);
                debug!(target: "syncvio::session", handle = handle.id, "dir_closed");
                Ok(())
            }
            None => Err(Error::InvalidHandle.into()),
        };
        self.track(result)
    }

    pub fn stat(&mut self, path: &str) -> Result<FileStat> {
        let result = self.backend().and_then(|b| b.stat(path));
        self.track(result)
    }

    pub fn mkdir(&mut self, path: &str, mode: u32) -> Result<()> {
        let result = self.backend().and_then(|b| b.mkdir(path, mode));
        self.track(result)
    }

    pub fn rmdir(&mut self, path: &str) -> Result<()> {
        let result = self.backend().and_then(|b| b.rmdir(path));
        self.track(result)
    }

    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let result = self.backend().and_then(|b| b.rename(from, to));
        self.track(result)
    }

    pub fn unlink(&mut self, path: &str) -> Result<()> {
        let result = self.backend().and_then(|b| b.unlink(path));
        self.track(result)
    }

    pub fn chmod(&mut self, path: &str, mode: u32) -> Result<()> {
        let result = self.backend().and_then(|b| b.chmod(path, mode));
        self.track(result)
    }

    pub fn set_mtime(&mut self, path: &str, mtime: SystemTime) -> Result<()> {
        let result = self.backend().and_then(|b| b.set_mtime(path, mtime));
        self.track(result)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.unbind();
    }
}
