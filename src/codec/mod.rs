//! Path encoding between the engine's universal text form and the
//! locale-native byte form required by local filesystem calls.
//!
//! The active locale is explicit configuration, never ambient process state:
//! a [`PathCodec`] is constructed with a [`LocaleEncoding`] and behaves
//! deterministically regardless of environment. Encoding is round-trip safe
//! for every path the locale can represent and fails (never truncates) for
//! everything else.

use std::ffi::OsStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Native encoding of the local filesystem. `Latin1` models a constrained
/// single-byte locale; code points above U+00FF are unrepresentable in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleEncoding {
    #[default]
    Utf8,
    Latin1,
}

impl LocaleEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            LocaleEncoding::Utf8 => "utf-8",
            LocaleEncoding::Latin1 => "latin-1",
        }
    }
}

impl std::fmt::Display for LocaleEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Converter between universal paths and native byte buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathCodec {
    encoding: LocaleEncoding,
}

impl PathCodec {
    pub fn new(encoding: LocaleEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> LocaleEncoding {
        self.encoding
    }

    /// Encode a universal path into a native buffer. Fails with
    /// [`Error::Encode`] when the locale cannot represent the path.
    pub fn encode(&self, path: &str) -> Result<EncodedPath> {
        let bytes = match self.encoding {
            LocaleEncoding::Utf8 => path.as_bytes().to_vec(),
            LocaleEncoding::Latin1 => {
                let mut out = Vec::with_capacity(path.len());
                for ch in path.chars() {
                    let cp = ch as u32;
                    if cp > 0xFF {
                        return Err(Error::Encode {
                            encoding: self.encoding.name().to_string(),
                            path: path.to_string(),
                        }
                        .into());
                    }
                    out.push(cp as u8);
                }
                out
            }
        };

        Ok(EncodedPath {
            bytes,
            encoding: self.encoding,
        })
    }

    /// Decode a native byte buffer back into a universal path. Fails with
    /// [`Error::Decode`] on byte sequences invalid for the locale.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self.encoding {
            LocaleEncoding::Utf8 => match std::str::from_utf8(bytes) {
                Ok(s) => Ok(s.to_string()),
                Err(_) => Err(Error::Decode {
                    encoding: self.encoding.name().to_string(),
                }
                .into()),
            },
            // Latin-1 maps every byte to the code point of the same value.
            LocaleEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// Transient native-encoded path buffer.
///
/// Acquired from [`PathCodec::encode`] and released exactly once: either by
/// going out of scope or through the consuming [`EncodedPath::release`].
/// Move semantics make a double release unrepresentable.
#[derive(Debug)]
pub struct EncodedPath {
    bytes: Vec<u8>,
    encoding: LocaleEncoding,
}

impl EncodedPath {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn encoding(&self) -> LocaleEncoding {
        self.encoding
    }

    /// Borrow the buffer in the form native filesystem calls expect.
    #[cfg(unix)]
    pub fn as_os_str(&self) -> &OsStr {
        use std::os::unix::ffi::OsStrExt;
        OsStr::from_bytes(&self.bytes)
    }

    #[cfg(not(unix))]
    pub fn as_os_str(&self) -> &OsStr {
        // Non-unix targets only see buffers produced by encode(), which start
        // from valid UTF-8 input.
        OsStr::new(std::str::from_utf8(&self.bytes).unwrap_or(""))
    }

    /// Explicitly release the buffer.
    pub fn release(self) {}
}

/// Final component of a universal path, ignoring trailing slashes.
/// The root path maps to `"/"`.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rsplit_once('/') {
        Some((_, name)) => name,
        None => trimmed,
    }
}
