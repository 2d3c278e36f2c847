//! `throttle split`: print a script's statements, one per line.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

use throttle_core::parse_statement_file;

pub fn run_split<W: Write>(file: &Path, out: &mut W) -> Result<usize> {
    let statements = parse_statement_file(file)
        .with_context(|| format!("Failed to read statements from {}", file.display()))?;
    for stmt in &statements {
        writeln!(out, "{}", stmt)?;
    }
    Ok(statements.len())
}

pub fn run_split_stdout(file: &Path) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_split(file, &mut out)?;
    out.flush()?;
    Ok(())
}
