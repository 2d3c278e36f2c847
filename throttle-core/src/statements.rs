//! `statements.rs`
//! Splits a semicolon-terminated script into individual statements.
//!
//! The splitter is line oriented and knows nothing about any query dialect:
//! a `--` anywhere on a line starts a comment, and a fragment ending in `;`
//! closes the current statement.

use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::ThrottleError;

const COMMENT_MARKER: &str = "--";
const STATEMENT_TERMINATOR: char = ';';

/// Reads `path` and returns its statements in file order.
pub fn parse_statement_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, ThrottleError> {
    let path = path.as_ref();
    debug!("Parsing statement file {}", path.display());
    let file = File::open(path)?;
    parse_statements(BufReader::new(file))
}

/// Returns the statements read from `reader`, each ending with `;`.
///
/// Multi-line statements are joined with single spaces. A trailing fragment
/// without a terminator is dropped.
pub fn parse_statements<R: BufRead>(reader: R) -> Result<Vec<String>, ThrottleError> {
    let mut statements = Vec::with_capacity(4);
    let mut current = String::new();

    for line in reader.lines() {
        let line = line?;
        let code = match line.find(COMMENT_MARKER) {
            Some(idx) => &line[..idx],
            None => line.as_str(),
        };
        let code = code.trim();
        if code.is_empty() {
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(code);

        if current.ends_with(STATEMENT_TERMINATOR) {
            statements.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        warn!("Dropping unterminated statement at end of input: {}", current);
    }

    debug!("Parsed {} statements", statements.len());
    Ok(statements)
}
