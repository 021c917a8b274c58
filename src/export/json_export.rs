//! JSON Export

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

/// Write a value as pretty-printed JSON followed by a newline
pub fn write_json(out: &mut dyn Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
