//! CSV export of matched rows
//!
//! The file always carries the four canonical columns in display order,
//! whatever extra columns the source table had.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use ricambi_search::{Field, Record};

use crate::error::{Error, Result};

/// Default export file name
pub const DEFAULT_FILE_NAME: &str = "risultati.csv";

fn export_error(err: csv::Error) -> Error {
    Error::export(format!("Could not write CSV: {}", err)).with_source(err)
}

/// Write `rows` as CSV with a header line. Returns the number of data rows.
pub fn write_csv<'r, W, I>(rows: I, writer: W) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'r Record>,
{
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(Field::ALL.iter().map(|f| f.header()))
        .map_err(export_error)?;

    let mut written = 0;
    for record in rows {
        out.write_record(Field::ALL.iter().map(|f| record.get(*f)))
            .map_err(export_error)?;
        written += 1;
    }
    out.flush()
        .map_err(|e| Error::export(format!("Could not flush CSV: {}", e)).with_source(e))?;
    Ok(written)
}

/// Render `rows` to an in-memory CSV string
pub fn to_csv_string<'r, I>(rows: I) -> Result<String>
where
    I: IntoIterator<Item = &'r Record>,
{
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::export("CSV output is not UTF-8").with_source(e))
}

/// Write `rows` to a file at `path`, replacing it
pub fn export_to_path<'r, I>(rows: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'r Record>,
{
    let file = File::create(path).map_err(|e| {
        Error::export(format!("Cannot create {}", path.display())).with_source(e)
    })?;
    let written = write_csv(rows, file)?;
    tracing::info!(path = %path.display(), rows = written, "Results exported");
    Ok(written)
}
