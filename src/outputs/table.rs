//! CSV output of the result table.

use crate::error::TableError;
use crate::models::ResultTable;
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument};

/// Write `table` as CSV to any writer.
pub fn write_table<W: Write>(writer: W, table: &ResultTable) -> Result<(), TableError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.headers())?;
    for row in table.rows() {
        wtr.write_record(table.record(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `table` to `path`, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_output(path: &Path, table: &ResultTable) -> Result<(), TableError> {
    let file = std::fs::File::create(path)?;
    write_table(file, table)?;
    info!(rows = table.len(), "Wrote output table");
    Ok(())
}
