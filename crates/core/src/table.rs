// crates/core/src/table.rs
//! Delimited-text loader for the vendor's trends export.
//!
//! The export is a semicolon-separated file with a header row and a few
//! dozen metric columns. The contract here is narrow: preserve column names
//! and file row order. Cells stay as strings; callers decide what to parse.

use std::path::Path;

use serde::Serialize;

use crate::error::LoadError;

/// A header-plus-rows table read from a delimited text file.
#[derive(Debug, Clone, Serialize)]
pub struct DelimitedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DelimitedTable {
    /// Read a delimited file. The first line is the header.
    pub fn from_path(path: &Path, delimiter: char) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let mut lines = text.lines();

        let header = match lines.next() {
            Some(h) if !h.trim().is_empty() => h,
            _ => return Err(LoadError::EmptyFile { path: path.into() }),
        };
        let columns = split_delimited(header, delimiter);

        let rows = lines
            .filter(|line| !line.is_empty())
            .map(|line| split_delimited(line, delimiter))
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of a named column in row order, if the column exists.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }
}

/// Split one line on the delimiter, honoring double-quoted fields with
/// `""` as the embedded-quote escape.
fn split_delimited(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            c if c == delimiter && !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}
