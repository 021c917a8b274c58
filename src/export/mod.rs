//! Output rendering
//!
//! Every command result implements [`Export`] and is written to stdout in
//! the selected format:
//!
//! - Text: aligned, human-readable lines
//! - JSON: pretty-printed serde output
//! - CSV: one row per value / function / collision

mod csv_export;
mod json_export;
mod reports;

use std::io::Write;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use reports::{
    CollisionRow, DecodeReport, FunctionRow, FunctionTable, LookupReport, ScanReport,
    SelectorReport,
};

/// Output format of command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// A result that can be rendered in every [`OutputFormat`]
pub trait Export: Serialize {
    /// Human-readable rendering
    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()>;

    /// CSV header
    fn csv_header(&self) -> &'static [&'static str];

    /// CSV data rows, matching the header
    fn csv_rows(&self) -> Vec<Vec<String>>;
}

/// Write `item` to `out` in the given format
pub fn write(out: &mut dyn Write, format: OutputFormat, item: &impl Export) -> Result<()> {
    match format {
        OutputFormat::Text => item.write_text(out)?,
        OutputFormat::Json => json_export::write_json(out, item)?,
        OutputFormat::Csv => {
            csv_export::write_csv(out, item.csv_header(), item.csv_rows())?;
        }
    }
    out.flush()?;
    Ok(())
}
