//! Input table loading.
//!
//! The input is a CSV file with a header row containing at least `URL_ID`
//! and `URL`. Other columns are carried through to the output unchanged.

use crate::error::TableError;
use crate::models::{InputRow, InputTable};
use itertools::Itertools;
use std::io::Read;
use std::path::Path;
use tracing::{info, instrument, warn};

pub const URL_ID_COLUMN: &str = "URL_ID";
pub const URL_COLUMN: &str = "URL";

/// Read an input table from any reader.
pub fn read_table<R: Read>(reader: R) -> Result<InputTable, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let id_idx = headers
        .iter()
        .position(|h| h == URL_ID_COLUMN)
        .ok_or(TableError::MissingColumn(URL_ID_COLUMN))?;
    let url_idx = headers
        .iter()
        .position(|h| h == URL_COLUMN)
        .ok_or(TableError::MissingColumn(URL_COLUMN))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(headers.len(), String::new());
        rows.push(InputRow {
            url_id: cells[id_idx].clone(),
            url: cells[url_idx].clone(),
            cells,
        });
    }

    for id in rows.iter().map(|r| r.url_id.as_str()).duplicates() {
        warn!(url_id = %id, "Duplicate URL_ID; later rows overwrite earlier article text");
    }

    Ok(InputTable { headers, rows })
}

/// Read the input table at `path`.
///
/// # Arguments
///
/// * `path` - CSV file with a header row containing `URL_ID` and `URL`
///
/// # Returns
///
/// The header names and every data row in file order. Short rows are padded
/// with empty cells; duplicate `URL_ID`s are kept and logged.
///
/// # Examples
///
/// ```ignore
/// let table = read_input(Path::new("input.csv"))?;
/// assert_eq!(table.headers[0], "URL_ID");
/// ```
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn read_input(path: &Path) -> Result<InputTable, TableError> {
    let file = std::fs::File::open(path)?;
    let table = read_table(file)?;
    info!(rows = table.rows.len(), columns = table.headers.len(), "Loaded input table");
    Ok(table)
}
