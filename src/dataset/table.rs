use std::path::{Path, PathBuf};

use crate::error::{DatasetError, DatasetResult};

/// A CSV file loaded as raw string cells under a dynamic header.
///
/// Used for inputs whose columns are not known up front: CK reports and the
/// final dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Load a CSV file. A zero-byte file loads as a table with no headers.
    ///
    /// Cells are decoded lossily, so a stray non-UTF-8 byte in one class name
    /// does not discard the rest of the report.
    pub fn load(path: &Path) -> DatasetResult<Self> {
        if !path.exists() {
            return Err(DatasetError::MissingInput(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| DatasetError::csv(path, e))?;

        let headers = reader
            .byte_headers()
            .map_err(|e| DatasetError::csv(path, e))?
            .iter()
            .map(|h| String::from_utf8_lossy(h).trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.byte_records() {
            let record = record.map_err(|e| DatasetError::csv(path, e))?;
            rows.push(
                record
                    .iter()
                    .map(|cell| String::from_utf8_lossy(cell).into_owned())
                    .collect(),
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Parsed values of a column, one entry per row. Empty or non-numeric
    /// cells become `None`.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).and_then(|cell| parse_number(cell)))
                .collect(),
        )
    }

    /// Rows where every named column holds a number, projected onto those
    /// columns in the given order.
    pub fn complete_rows(&self, columns: &[&str]) -> DatasetResult<Vec<Vec<f64>>> {
        let indices = columns
            .iter()
            .map(|column| {
                self.column_index(column)
                    .ok_or_else(|| DatasetError::MissingColumn {
                        column: column.to_string(),
                        path: self.path.clone(),
                    })
            })
            .collect::<DatasetResult<Vec<_>>>()?;

        Ok(self
            .rows
            .iter()
            .filter_map(|row| {
                indices
                    .iter()
                    .map(|&idx| row.get(idx).and_then(|cell| parse_number(cell)))
                    .collect::<Option<Vec<f64>>>()
            })
            .collect())
    }
}

/// Parse a numeric cell, treating blanks and NaN as missing.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Render an optional value as a CSV cell; missing values become empty cells.
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => String::new(),
    }
}
