//! Spreadsheet access: first worksheet, first row as headers, columns by name.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Failed to read spreadsheet {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Column '{column}' not found in spreadsheet header (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
}

/// The first worksheet of a workbook, split into a header row and data rows.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<Data>>,
}

impl Sheet {
    /// Opens an xlsx/xls/ods workbook and reads its first worksheet.
    /// A workbook without worksheets yields an empty sheet.
    pub fn open(path: &Path) -> Result<Self, SheetError> {
        let open_err = |source| SheetError::Open {
            path: path.to_path_buf(),
            source,
        };

        let mut workbook = open_workbook_auto(path).map_err(open_err)?;
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(open_err)?,
            None => return Ok(Sheet::default()),
        };

        Ok(Sheet::from_rows(range.rows().map(|row| row.to_vec())))
    }

    /// Builds a sheet from raw rows; the first row is the header.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<Data>>,
    {
        let mut rows = rows.into_iter();
        let headers = rows
            .next()
            .map(|header| {
                header
                    .iter()
                    .map(|cell| cell_text(cell).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();

        Sheet {
            headers,
            rows: rows.collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Resolves a header name (trimmed, ASCII case-insensitive) to a column index.
    pub fn column(&self, name: &str) -> Result<usize, SheetError> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SheetError::MissingColumn {
                column: wanted.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Cell text of one column for every data row, in row order.
    /// Blank and missing cells are `None`.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<String>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(cell_text))
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    if matches!(cell, Data::Empty) {
        return None;
    }
    let text = cell.to_string();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
pub(crate) fn text_row(cells: &[&str]) -> Vec<Data> {
    cells
        .iter()
        .map(|c| {
            if c.is_empty() {
                Data::Empty
            } else {
                Data::String(c.to_string())
            }
        })
        .collect()
}
