//! Splitting migration text into executable SQL statements.
//!
//! The splitter is line-oriented: each line is trimmed, blank lines and
//! `//` comment lines are discarded, and a statement ends at a line whose
//! trimmed text ends with `;`. Lines of one statement are joined with a
//! single space.
//!
//! There is no awareness of string literals or block comments. A `;` or `//`
//! inside a quoted literal is treated exactly like a real terminator or
//! comment marker.

use crate::error::{CoreError, CoreResult};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

/// Prefix marking a line comment.
pub const SQL_LINE_COMMENT_START: &str = "//";

/// Suffix terminating a statement.
pub const SQL_STATEMENT_END: char = ';';

/// Lazy, single-pass iterator over the statements of a SQL text.
///
/// A trailing fragment that is never terminated is dropped when the input
/// ends; it never becomes a statement.
pub struct Statements<R> {
    lines: Lines<R>,
    buffer: String,
}

impl<R: BufRead> Statements<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            buffer: String::new(),
        }
    }

    fn push_segment(&mut self, segment: &str) {
        if segment.is_empty() {
            return;
        }
        if !self.buffer.is_empty() {
            self.buffer.push(' ');
        }
        self.buffer.push_str(segment);
    }
}

impl<R: BufRead> Iterator for Statements<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            let line = line.trim();

            if line.is_empty() || line.starts_with(SQL_LINE_COMMENT_START) {
                continue;
            }

            match line.strip_suffix(SQL_STATEMENT_END) {
                Some(content) => {
                    self.push_segment(content);
                    if self.buffer.is_empty() {
                        // A lone terminator with nothing buffered.
                        continue;
                    }
                    return Some(Ok(std::mem::take(&mut self.buffer)));
                }
                None => self.push_segment(line),
            }
        }
    }
}

/// Split everything readable from `reader` into statements.
pub fn split_sql<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    Statements::new(reader).collect()
}

/// Split in-memory SQL text into statements.
pub fn split_sql_str(sql: &str) -> Vec<String> {
    Statements::new(sql.as_bytes())
        .filter_map(Result::ok)
        .collect()
}

/// Read a SQL file from disk and split it into statements.
pub fn read_sql_file(path: &Path) -> CoreResult<Vec<String>> {
    let file = File::open(path).map_err(|e| CoreError::io(path.display().to_string(), e))?;
    split_sql(BufReader::new(file)).map_err(|e| CoreError::io(path.display().to_string(), e))
}

#[cfg(test)]
#[path = "statement_test.rs"]
mod tests;
