//! Inventory table loading
//!
//! Reads a workbook (`.xlsx`, `.xlsm`, `.xls`, `.ods`) or a `.csv` file
//! into a [`RawTable`], then validates the header and builds the
//! normalized [`Dataset`]. Headers are matched after trimming and title
//! casing, so `"  CODICE "` satisfies the `Codice` column.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use ricambi_search::{Dataset, Field, Record};

use crate::error::{Error, ErrorCode, Result, ResultExt};

/// Where a dataset comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSource {
    pub path: PathBuf,
    pub sheet: Option<String>,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
        }
    }

    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Identity used for memoization; the canonical path when it resolves.
    pub fn key(&self) -> (PathBuf, Option<String>) {
        let path = self
            .path
            .canonicalize()
            .unwrap_or_else(|_| self.path.clone());
        (path, self.sheet.clone())
    }
}

/// Untyped table as read from the source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Trim and title-case a header: the first letter of every run of letters
/// is uppercased, the rest lowercased.
pub fn canonical_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    for c in raw.trim_start_matches('\u{feff}').trim().chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Read a table from disk, choosing the reader by file extension.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv(path),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path, sheet),
        _ => Err(Error::unsupported_format(path)),
    }
    .context(format!("Reading {}", path.display()))
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names();

    let name = match sheet {
        Some(wanted) => names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| {
                Error::new(ErrorCode::SheetNotFound, format!("Sheet not found: {}", wanted))
                    .with_suggestion(format!("Available sheets: {}", names.join(", ")))
            })?,
        None => names
            .first()
            .cloned()
            .ok_or_else(|| Error::load("Workbook has no sheets"))?,
    };

    let range = workbook.worksheet_range(&name)?;
    let mut rows = range.rows();

    let headers = rows
        .next()
        .map(|row| row.iter().map(|c| cell_text(c).unwrap_or_default()).collect())
        .unwrap_or_default();

    let rows = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

/// Render a cell as text. Integral floats lose their fractional part so
/// numeric codes read as `608`, not `608.0`.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn read_csv(path: &Path) -> Result<RawTable> {
    let delimiter = sniff_delimiter(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}

/// Semicolon-separated exports are common from Italian-locale spreadsheets.
fn sniff_delimiter(path: &Path) -> Result<u8> {
    let mut first_line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first_line)?;

    let commas = first_line.matches(',').count();
    let semicolons = first_line.matches(';').count();
    Ok(if semicolons > commas { b';' } else { b',' })
}

/// Validate the header and build the dataset.
///
/// Missing required columns are fatal. Rows whose four columns are all
/// blank are skipped; a table left with no rows is an empty dataset.
pub fn dataset_from_table(table: &RawTable) -> Result<Dataset> {
    let headers: Vec<String> = table.headers.iter().map(|h| canonical_header(h)).collect();

    let positions: Vec<Option<usize>> = Field::ALL
        .iter()
        .map(|field| headers.iter().position(|h| h == field.header()))
        .collect();

    let mut missing: Vec<&str> = Field::ALL
        .iter()
        .zip(&positions)
        .filter(|(_, pos)| pos.is_none())
        .map(|(field, _)| field.header())
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(Error::missing_columns(&missing));
    }

    let cell = |row: &[Option<String>], idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| row.get(i).cloned().flatten())
    };

    let records: Vec<Record> = table
        .rows
        .iter()
        .filter_map(|row| {
            let values: Vec<Option<String>> = positions.iter().map(|&p| cell(row, p)).collect();
            if values.iter().all(|v| v.as_deref().is_none_or(|s| s.trim().is_empty())) {
                return None;
            }
            Some(Record::new(
                values[0].as_deref(),
                values[1].as_deref(),
                values[2].as_deref(),
                values[3].as_deref(),
            ))
        })
        .collect();

    if records.is_empty() {
        return Err(Error::empty_dataset());
    }

    Ok(Dataset::new(records))
}

/// Read and validate a dataset from `source`.
pub fn load_source(source: &DataSource) -> Result<Dataset> {
    let table = load_table(&source.path, source.sheet.as_deref())?;
    let dataset = dataset_from_table(&table).context(format!("In {}", source.path.display()))?;
    tracing::info!(
        source = %source.path.display(),
        rows = dataset.len(),
        "Inventory loaded"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table(headers: &[&str], rows: &[&[Option<&str>]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.map(String::from)).collect())
                .collect(),
        }
    }

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_canonical_header() {
        assert_eq!(canonical_header("  CODICE "), "Codice");
        assert_eq!(canonical_header("descrizione"), "Descrizione");
        assert_eq!(canonical_header("\u{feff}Ubicazione"), "Ubicazione");
        assert_eq!(canonical_header("note extra"), "Note Extra");
    }

    #[test]
    fn test_dataset_from_table() {
        let t = table(
            &["codice", " DESCRIZIONE", "Ubicazione", "categoria", "Note"],
            &[
                &[Some("C100"), Some("Perno"), Some("A1"), Some("Motori"), Some("x")],
                &[Some("C200"), None, Some("B2"), Some("Filtri"), None],
            ],
        );
        let dataset = dataset_from_table(&t).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].description, "Perno");
        assert_eq!(dataset.records()[1].description, "");
        assert_eq!(dataset.records()[1].normalized().description, "");
    }

    #[test]
    fn test_missing_columns_reported_sorted() {
        let t = table(&["Descrizione", "Codice"], &[&[Some("a"), Some("b")]]);
        let err = dataset_from_table(&t).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingColumns);
        assert!(err.message.ends_with("Categoria, Ubicazione"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_empty_dataset() {
        let t = table(
            &["Codice", "Descrizione", "Ubicazione", "Categoria"],
            &[&[None, Some(" "), None, None]],
        );
        let err = dataset_from_table(&t).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyDataset);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let t = table(
            &["Codice", "Descrizione", "Ubicazione", "Categoria"],
            &[&[Some("C1")]],
        );
        let dataset = dataset_from_table(&t).unwrap();
        assert_eq!(dataset.records()[0].category, "");
    }

    #[test]
    fn test_load_csv_comma() {
        let file = csv_file("Codice,Descrizione,Ubicazione,Categoria\nC100,Cuscinetto a sfera,A1,Motori\n");
        let dataset = load_source(&DataSource::new(file.path())).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].location, "A1");
    }

    #[test]
    fn test_load_csv_semicolon() {
        let file = csv_file("Codice;Descrizione;Ubicazione;Categoria\nC100;Vite M8, zincata;A1;Viteria\n");
        let dataset = load_source(&DataSource::new(file.path())).unwrap();
        assert_eq!(dataset.records()[0].description, "Vite M8, zincata");
    }

    #[test]
    fn test_missing_file_is_recoverable() {
        let err = load_source(&DataSource::new("/no/such/ricambi.xlsx")).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = load_table(file.path(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFormat);
    }

    #[test]
    fn test_cell_text_integral_float() {
        assert_eq!(cell_text(&Data::Float(608.0)), Some("608".to_string()));
        assert_eq!(cell_text(&Data::Float(1.5)), Some("1.5".to_string()));
        assert_eq!(cell_text(&Data::Empty), None);
    }
}
