use crate::error::{ObjectifyError, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Written,
    /// Dry run: the conversion succeeded but nothing was written.
    Skipped,
    Unchanged,
}

/// Replaces files through a sibling temp file and an atomic rename.
pub struct SafeWriter {
    dry_run: bool,
    backup: bool,
}

impl SafeWriter {
    pub fn new() -> Self {
        Self {
            dry_run: false,
            backup: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn write(&self, path: &Path, content: &str) -> Result<WriteOutcome> {
        if self.dry_run {
            debug!(path = %path.display(), bytes = content.len(), "dry run, not writing");
            return Ok(WriteOutcome::Skipped);
        }

        if fs::read_to_string(path).is_ok_and(|current| current == content) {
            debug!(path = %path.display(), "content unchanged, not writing");
            return Ok(WriteOutcome::Unchanged);
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Dropped without persist on any early return, which removes it.
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| persist_error(path, e))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| persist_error(path, e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| persist_error(path, e))?;

        if let Ok(metadata) = fs::metadata(path) {
            if let Err(e) = fs::set_permissions(temp.path(), metadata.permissions()) {
                debug!(path = %path.display(), error = %e, "could not copy file permissions");
            }
        }

        if self.backup {
            let backup = backup_path(path);
            fs::copy(path, &backup)?;
            debug!(backup = %backup.display(), "wrote backup");
        }

        temp.persist(path)
            .map_err(|e| persist_error(path, e.error))?;

        Ok(WriteOutcome::Written)
    }
}

impl Default for SafeWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// `<file>.bak` next to the original.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}

fn persist_error(path: &Path, error: std::io::Error) -> ObjectifyError {
    ObjectifyError::Persist {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
