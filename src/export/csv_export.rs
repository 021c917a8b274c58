//! CSV Export

use std::io::Write;

use anyhow::Result;

/// Write a header and rows as CSV
pub fn write_csv(out: &mut dyn Write, header: &[&str], rows: Vec<Vec<String>>) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(out);

    // Write header
    wtr.write_record(header)?;

    // Write data rows
    let count = rows.len();
    for row in rows {
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(count)
}
