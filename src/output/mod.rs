//! Rendering of command results in pretty, table or json form

use std::io::Write;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod json;
pub mod table;

/// A command result that knows how to render itself
pub trait Formattable {
    fn format(&self, format: OutputFormat) -> Result<String>;
}

/// Render to stdout
pub fn print<T: Formattable + ?Sized>(data: &T, format: OutputFormat) -> Result<()> {
    write_to(&mut std::io::stdout().lock(), data, format)
}

/// Render to `out` followed by a newline
pub fn write_to<W, T>(out: &mut W, data: &T, format: OutputFormat) -> Result<()>
where
    W: Write,
    T: Formattable + ?Sized,
{
    let rendered = data.format(format)?;
    writeln!(out, "{}", rendered)?;
    Ok(())
}
