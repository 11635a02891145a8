use std::io;
use std::path::Path;

use thiserror::Error;

/// Requested line number does not exist in the batch input
#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {index} is out of range, input has {count} line(s)")]
pub struct LineOutOfRange {
    /// 1-based line number that was requested
    pub index: usize,
    /// Number of usable lines in the input
    pub count: usize,
}

/// Resolve a text argument that may name a file
///
/// If the value is the path of an existing file, returns the file's
/// contents; otherwise the value itself. The result is trimmed either way,
/// so trailing newlines in text files do not leak into synthesis input.
pub fn text_or_file(value: &str) -> io::Result<String> {
    let path = Path::new(value);
    if path.is_file() {
        Ok(std::fs::read_to_string(path)?.trim().to_string())
    } else {
        Ok(value.trim().to_string())
    }
}

/// Split batch input into one entry per non-empty line
///
/// Each line is trimmed; blank lines are dropped and do not count toward
/// line numbering.
pub fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Select a single 1-based line from a batch
pub fn select_line(lines: &[String], index: usize) -> Result<&str, LineOutOfRange> {
    if index == 0 || index > lines.len() {
        return Err(LineOutOfRange { index, count: lines.len() });
    }
    Ok(&lines[index - 1])
}
