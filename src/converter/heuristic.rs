//! Line-anchored rewrite that splits the file at every `export function` line.
//!
//! Block boundaries come from text patterns only. Everything between two
//! export lines (helpers, comments, other exports) travels with the
//! preceding method, and the separating comma is appended after the trimmed
//! block rather than after a located closing brace.

use super::exports::{ExportMatch, ExportScanner};
use super::{assemble_object, indent_lines, Conversion};
use tracing::debug;

/// Preamble (untrimmed) and raw function blocks of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSource<'a> {
    pub preamble: &'a str,
    pub blocks: Vec<&'a str>,
}

impl SplitSource<'_> {
    /// Rebuild the original text: each block boundary consumed one newline.
    pub fn reassemble(&self) -> String {
        let mut text = self.preamble.to_string();
        text.push_str(&self.blocks.join("\n"));
        text
    }
}

pub fn split_source<'a>(
    scanner: &ExportScanner,
    source: &'a str,
    first: &ExportMatch,
) -> SplitSource<'a> {
    let preamble = &source[..first.offset];
    let remaining = &source[first.offset..];

    let mut boundaries = scanner.block_boundaries(remaining);
    if boundaries.first() != Some(&0) {
        boundaries.insert(0, 0);
    }

    let blocks = boundaries
        .iter()
        .enumerate()
        .map(|(i, &start)| match boundaries.get(i + 1) {
            // The newline before the next export belongs to neither block.
            Some(&next) => &remaining[start..next.saturating_sub(1).max(start)],
            None => &remaining[start..],
        })
        .collect();

    SplitSource { preamble, blocks }
}

pub fn convert(
    scanner: &ExportScanner,
    source: &str,
    object_name: &str,
    indent: &str,
) -> Conversion {
    let exports = scanner.find_exports(source);
    let Some(first) = exports.first() else {
        return Conversion::NoExports;
    };

    let split = split_source(scanner, source, first);
    let preamble = split.preamble.trim_end();
    let last_index = split.blocks.len().saturating_sub(1);

    let mut methods = Vec::with_capacity(split.blocks.len());
    for (i, block) in split.blocks.iter().enumerate() {
        if block.trim().is_empty() || !block.starts_with("export") {
            debug!(index = i, "skipping split artifact");
            continue;
        }

        let block = scanner.strip_export_keywords(block);
        let block = scanner.strip_function_keywords(&block);
        let mut method = indent_lines(&block, indent);

        if i < last_index {
            method = format!("{},", method.trim_end());
        }
        methods.push(method);
    }

    let mut output = assemble_object(preamble, &[], object_name);
    for method in &methods {
        output.push_str(method);
        output.push('\n');
    }
    output.push_str("};\n");

    Conversion::Converted { exports, output }
}
