//! Workspace layout shared by every subcommand
//!
//! The pipeline runs each tool from the repository checkout. Logs collected
//! by earlier stages live under `archives/`, formatting results under `src/`,
//! and generated files land at the root.

use std::io;
use std::path::{Path, PathBuf};

/// Root directory the CI tools operate in
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding archived logs
    pub fn archives(&self) -> PathBuf {
        self.root.join("archives")
    }

    /// Path of an archived log
    pub fn archive(&self, file_name: &str) -> PathBuf {
        self.archives().join(file_name)
    }

    /// Path of a file under `src/`
    pub fn source(&self, relative: &str) -> PathBuf {
        self.root.join("src").join(relative)
    }

    /// Path of a file at the workspace root
    pub fn file(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Read an archived log, `None` if it does not exist
    pub fn read_archive(&self, file_name: &str) -> io::Result<Option<String>> {
        read_log(&self.archive(file_name))
    }

    /// Create `archives/` if needed
    pub fn ensure_archives(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.archives())
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Read a log file as text.
///
/// NF logs may carry ISO-8859-1 bytes. Content that is not valid UTF-8 is
/// decoded as Latin-1, which maps every byte to the code point of the same
/// value. Returns `Ok(None)` when the file does not exist.
pub fn read_log(path: &Path) -> io::Result<Option<String>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    Ok(Some(decode_log_bytes(bytes)))
}

pub(crate) fn decode_log_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}
