use crate::error::{ObjectifyError, Result};
use regex::Regex;
use serde::Serialize;

/// Top-level `export [async] function name(` at the start of a line.
const EXPORT_PATTERN: &str = r"(?m)^export\s+(async\s+)?function\s+(\w+)\s*\(";
const ANCHORED_EXPORT_PATTERN: &str = r"^export\s+(async\s+)?function\s+(\w+)\s*\(";
const BLOCK_BOUNDARY_PATTERN: &str = r"(?m)^export\s+(?:async\s+)?function";
const EXPORT_PREFIX_PATTERN: &str = r"(?m)^export\s+";
const SIGNATURE_PATTERN: &str = r"(?m)^(async\s+)?function\s+(\w+)\s*\(";

/// One exported function declaration located in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportMatch {
    pub name: String,
    pub is_async: bool,
    /// Byte offset of the `export` keyword.
    pub offset: usize,
    /// Byte offset of the opening parenthesis of the parameter list.
    pub paren_offset: usize,
    pub line: usize,
}

impl ExportMatch {
    pub fn method_head(&self) -> String {
        if self.is_async {
            format!("async {}", self.name)
        } else {
            self.name.clone()
        }
    }
}

pub struct ExportScanner {
    export_pattern: Regex,
    anchored_export: Regex,
    block_boundary: Regex,
    export_prefix: Regex,
    signature: Regex,
}

impl ExportScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            export_pattern: compile(EXPORT_PATTERN)?,
            anchored_export: compile(ANCHORED_EXPORT_PATTERN)?,
            block_boundary: compile(BLOCK_BOUNDARY_PATTERN)?,
            export_prefix: compile(EXPORT_PREFIX_PATTERN)?,
            signature: compile(SIGNATURE_PATTERN)?,
        })
    }

    /// All export matches in order of appearance.
    pub fn find_exports(&self, source: &str) -> Vec<ExportMatch> {
        self.export_pattern
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(2)?;
                Some(ExportMatch {
                    name: name.as_str().to_string(),
                    is_async: caps.get(1).is_some(),
                    offset: whole.start(),
                    paren_offset: whole.end() - 1,
                    line: line_number(source, whole.start()),
                })
            })
            .collect()
    }

    /// Match an export declaration starting exactly at `offset`.
    pub fn export_at(&self, source: &str, offset: usize) -> Option<ExportMatch> {
        let rest = source.get(offset..)?;
        let caps = self.anchored_export.captures(rest)?;
        let whole = caps.get(0)?;
        let name = caps.get(2)?;

        Some(ExportMatch {
            name: name.as_str().to_string(),
            is_async: caps.get(1).is_some(),
            offset,
            paren_offset: offset + whole.end() - 1,
            line: line_number(source, offset),
        })
    }

    /// Offsets of every line that opens a new function block, relative to `text`.
    pub fn block_boundaries(&self, text: &str) -> Vec<usize> {
        self.block_boundary
            .find_iter(text)
            .map(|m| m.start())
            .collect()
    }

    pub fn strip_export_keywords(&self, block: &str) -> String {
        self.export_prefix.replace_all(block, "").into_owned()
    }

    pub fn strip_function_keywords(&self, block: &str) -> String {
        self.signature.replace_all(block, "${1}${2}(").into_owned()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ObjectifyError::Config {
        message: format!("Invalid built-in pattern {}: {}", pattern, e),
    })
}

/// 1-based line number of a byte offset.
pub fn line_number(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
