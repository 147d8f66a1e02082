pub mod report;

pub use report::{BatchReport, BatchSummary, FileReport, FileStatus};

use crate::config::ServiceEntry;
use crate::converter::{Conversion, Converter, SafeWriter, WriteOutcome};
use crate::error::ObjectifyError;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Converts a list of service files one after another. A failing file is
/// recorded and never stops the remaining entries.
pub struct BatchRunner<'a> {
    converter: &'a Converter,
    writer: &'a SafeWriter,
}

impl<'a> BatchRunner<'a> {
    pub fn new(converter: &'a Converter, writer: &'a SafeWriter) -> Self {
        Self { converter, writer }
    }

    pub fn run<F>(&self, entries: &[(PathBuf, &ServiceEntry)], mut on_file: F) -> BatchReport
    where
        F: FnMut(&FileReport),
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut files = Vec::with_capacity(entries.len());

        for (path, entry) in entries {
            let report = self.convert_entry(path, entry);
            on_file(&report);
            files.push(report);
        }

        BatchReport {
            started_at,
            duration: start.elapsed(),
            dry_run: self.writer.is_dry_run(),
            strategy: self.converter.strategy().to_string(),
            files,
        }
    }

    fn convert_entry(&self, path: &Path, entry: &ServiceEntry) -> FileReport {
        let mut methods = Vec::new();

        let status = if !path.exists() {
            debug!(path = %path.display(), "service file not found");
            FileStatus::NotFound
        } else {
            match self.converter.convert_file(path, &entry.object_name, self.writer) {
                Ok((Conversion::NoExports, _)) => {
                    info!(path = %path.display(), "no exports found");
                    FileStatus::NoExports
                }
                Ok((Conversion::Converted { exports, .. }, outcome)) => {
                    methods = exports.iter().map(|e| e.name.clone()).collect();
                    FileStatus::Converted {
                        exports: exports.len(),
                        written: outcome == WriteOutcome::Written,
                    }
                }
                Err(ObjectifyError::FileNotFound { .. }) => FileStatus::NotFound,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "conversion failed");
                    FileStatus::Failed {
                        message: e.to_string(),
                    }
                }
            }
        };

        FileReport {
            path: path.display().to_string(),
            object_name: entry.object_name.clone(),
            status,
            methods,
        }
    }
}
