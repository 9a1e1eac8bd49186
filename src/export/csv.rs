use csv::Writer;

use crate::errors::{AppError, AppResult};

/// Write a header record plus data rows into an in-memory CSV buffer.
pub(super) fn sheet_csv(headers: &[&str], rows: &[Vec<String>]) -> AppResult<Vec<u8>> {
    let mut wtr = Writer::from_writer(Vec::new());

    wtr.write_record(headers)?;

    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.into_inner().map_err(|e| AppError::Export(e.to_string()))
}
