//! Structured output of command results.

use std::io::{self, Write};

use incli_core::Result;
use serde::Serialize;

/// Pretty-print `value` as JSON (two-space indent) followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut out: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// [`write_json`] to standard output.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    write_json(stdout.lock(), value)
}
