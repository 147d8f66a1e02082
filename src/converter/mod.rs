pub mod exports;
pub mod heuristic;
pub mod structural;
pub mod writer;

pub use exports::{ExportMatch, ExportScanner};
pub use writer::{SafeWriter, WriteOutcome};

use crate::error::{ObjectifyError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// How function boundaries are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Split at every line that starts with `export function`.
    #[default]
    Heuristic,
    /// Tokenize and follow brace depth, strings, templates and comments.
    Structural,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Heuristic => write!(f, "heuristic"),
            Strategy::Structural => write!(f, "structural"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// Nothing matched; the source must be left as it is.
    NoExports,
    Converted {
        exports: Vec<ExportMatch>,
        output: String,
    },
}

impl Conversion {
    pub fn export_count(&self) -> usize {
        match self {
            Conversion::NoExports => 0,
            Conversion::Converted { exports, .. } => exports.len(),
        }
    }
}

pub struct Converter {
    strategy: Strategy,
    indent: String,
    scanner: ExportScanner,
}

impl Converter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            strategy: Strategy::default(),
            indent: "  ".to_string(),
            scanner: ExportScanner::new()?,
        })
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent = " ".repeat(width.max(1));
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Rewrite `source` so its exported functions become methods of `object_name`.
    pub fn convert_source(&self, source: &str, object_name: &str) -> Result<Conversion> {
        validate_identifier(object_name)?;

        match self.strategy {
            Strategy::Heuristic => Ok(heuristic::convert(
                &self.scanner,
                source,
                object_name,
                &self.indent,
            )),
            Strategy::Structural => {
                structural::convert(&self.scanner, source, object_name, &self.indent)
            }
        }
    }

    /// Convert a file in place through `writer`. A file without exports is never written.
    pub fn convert_file(
        &self,
        path: &Path,
        object_name: &str,
        writer: &SafeWriter,
    ) -> Result<(Conversion, WriteOutcome)> {
        if !path.is_file() {
            return Err(ObjectifyError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let source = fs::read_to_string(path)?;
        let conversion = self.convert_source(&source, object_name)?;

        let outcome = match &conversion {
            Conversion::NoExports => {
                debug!(path = %path.display(), "no exported functions, leaving file untouched");
                WriteOutcome::Unchanged
            }
            Conversion::Converted { exports, output } => {
                info!(
                    path = %path.display(),
                    exports = exports.len(),
                    strategy = %self.strategy,
                    "converted to {}",
                    object_name
                );
                writer.write(path, output)?
            }
        };

        Ok((conversion, outcome))
    }
}

/// `<name>` must be usable as a JavaScript binding.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_alphabetic() || first == '_' || first == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ObjectifyError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

/// Indent every line that has non-whitespace content.
pub(crate) fn indent_lines(text: &str, indent: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Preamble, relocated top-level code, then the opening of the object literal.
pub(crate) fn assemble_object(preamble: &str, relocated: &[String], object_name: &str) -> String {
    let mut output = String::with_capacity(preamble.len() + 64);
    output.push_str(preamble);
    output.push_str("\n\n");

    for segment in relocated {
        output.push_str(segment);
        output.push_str("\n\n");
    }

    output.push_str(&format!("export const {} = {{\n", object_name));
    output
}
