//! Tabular file reading for CSV and XLSX uploads.

use std::io::Cursor;

use calamine::{Reader, Xlsx};

use super::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Csv,
    Xlsx,
}

impl SpreadsheetFormat {
    /// Detect the format from an uploaded file name's extension.
    pub fn from_file_name(name: &str) -> Result<Self, ImportError> {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(ImportError::UnsupportedFormat(name.to_string())),
        }
    }
}

/// One non-blank data row. `number` is the 1-based line below the header,
/// counting blank lines and blank rows, so it lines up with what the user
/// sees in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub number: usize,
    pub cells: Vec<String>,
}

impl SheetRow {
    /// Trimmed cell value, or `None` when the row is shorter than `index`.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|c| c.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetData {
    pub name: String,
    /// Normalized headers (see [`normalize_header`]).
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl SheetData {
    /// `raw_rows` pairs each row with its number below the header.
    fn from_raw(name: &str, headers: Vec<String>, raw_rows: Vec<(usize, Vec<String>)>) -> Self {
        let rows = raw_rows
            .into_iter()
            .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()))
            .map(|(number, cells)| SheetRow { number, cells })
            .collect();
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| normalize_header(h)).collect(),
            rows,
        }
    }

    /// Index of the first header equal to any of `aliases`.
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| aliases.iter().any(|alias| header == alias))
    }
}

/// Trim, drop a byte-order mark and lowercase.
pub fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Read a CSV file. Rows may be shorter than the header.
pub fn read_csv(bytes: &[u8]) -> Result<SheetData, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let header_record = reader.headers()?;
    let header_line = header_record.position().map_or(1, |p| p.line());
    let headers: Vec<String> = header_record.iter().map(str::to_string).collect();

    // The reader skips empty lines; line positions keep them counted.
    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let number = record
            .position()
            .map_or(index + 1, |p| (p.line() - header_line) as usize);
        rows.push((number, record.iter().map(str::to_string).collect()));
    }

    Ok(SheetData::from_raw("csv", headers, rows))
}

/// Read every worksheet of an XLSX workbook, in workbook order.
pub fn read_xlsx(bytes: &[u8]) -> Result<Vec<SheetData>, ImportError> {
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes.to_vec()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let mut rows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());
        let headers = rows.next().unwrap_or_default();
        let numbered = rows.enumerate().map(|(i, cells)| (i + 1, cells)).collect();
        sheets.push(SheetData::from_raw(&name, headers, numbered));
    }
    Ok(sheets)
}

/// Read a single-sheet upload: the CSV itself or the first XLSX worksheet.
pub fn read_first_sheet(format: SpreadsheetFormat, bytes: &[u8]) -> Result<SheetData, ImportError> {
    match format {
        SpreadsheetFormat::Csv => read_csv(bytes),
        SpreadsheetFormat::Xlsx => read_xlsx(bytes)?
            .into_iter()
            .next()
            .ok_or_else(|| ImportError::MissingSheet("any worksheet".to_string())),
    }
}
