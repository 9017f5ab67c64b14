//! Atomic output: bytes go to a temporary file next to the destination and
//! replace it only on commit.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{PackError, PackResult};

#[derive(Debug)]
pub struct OutputSink {
    path: PathBuf,
    file: NamedTempFile,
}

impl OutputSink {
    /// Open a sink for `path`. The destination is not touched yet.
    pub fn create(path: &Path) -> PackResult<Self> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file = NamedTempFile::new_in(dir)?;
        debug!(dest = %path.display(), tmp = %file.path().display(), "opened output sink");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&mut self, bytes: &[u8]) -> PackResult<()> {
        self.file.write_all(bytes)?;
        Ok(())
    }

    /// Flush and move the temporary file over the destination.
    ///
    /// Dropping a sink without committing deletes the temporary file.
    pub fn commit(mut self) -> PackResult<PathBuf> {
        self.file.flush()?;
        self.file.as_file().sync_all()?;
        let path = self.path;
        self.file.persist(&path).map_err(|e| PackError::Commit {
            path: path.clone(),
            source: e.error,
        })?;
        Ok(path)
    }
}
