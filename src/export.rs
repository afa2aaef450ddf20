use std::io::Write;

use anyhow::{Context, Result};

use crate::dataset::Record;

/// Writes `headers` and then each record's cells in header order.
pub fn write_records<W: Write>(
    writer: &mut csv::Writer<W>,
    headers: &[String],
    records: &[&Record],
) -> Result<usize> {
    writer
        .write_record(headers)
        .context("Writing export header")?;
    for (idx, record) in records.iter().enumerate() {
        writer
            .write_record(record.values())
            .with_context(|| format!("Writing export row {}", idx + 1))?;
    }
    writer.flush().context("Flushing export output")?;
    Ok(records.len())
}
