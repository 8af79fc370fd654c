//! # Dataset Files
//!
//! Reading and writing the CSV files that connect pipeline stages, and the
//! join that produces the final dataset.

pub mod merge;
pub mod table;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{DatasetError, DatasetResult};
use crate::types::{AggregatedMetrics, AggregatedTable, FinalDataset, RepositoryRecord};

pub use merge::{age_in_years, create_dataset, merge_records};
pub use table::{format_number, parse_number, CsvTable};

/// Discovery CSV columns, in file order
pub const REPOSITORY_COLUMNS: [&str; 6] = [
    "name",
    "url",
    "stargazers",
    "createdAt",
    "releases",
    "primaryLanguage",
];

fn ensure_parent(path: &Path) -> DatasetResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Write discovery output. An empty list writes nothing.
pub fn save_repositories(records: &[RepositoryRecord], path: &Path) -> DatasetResult<bool> {
    if records.is_empty() {
        log::warn!("No repositories to save; {} not written", path.display());
        return Ok(false);
    }

    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path).map_err(|e| DatasetError::csv(path, e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| DatasetError::csv(path, e))?;
    }
    writer.flush().map_err(|e| DatasetError::io(path, e))?;

    log::info!("Saved {} repositories to {}", records.len(), path.display());
    Ok(true)
}

pub fn load_repositories(path: &Path) -> DatasetResult<Vec<RepositoryRecord>> {
    if !path.exists() {
        return Err(DatasetError::MissingInput(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path).map_err(|e| DatasetError::csv(path, e))?;
    reader
        .deserialize()
        .collect::<Result<Vec<RepositoryRecord>, _>>()
        .map_err(|e| DatasetError::csv(path, e))
}

pub fn save_aggregated(table: &AggregatedTable, path: &Path) -> DatasetResult<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path).map_err(|e| DatasetError::csv(path, e))?;

    let mut header = vec!["repository".to_string()];
    header.extend(table.columns.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| DatasetError::csv(path, e))?;

    for row in &table.rows {
        let mut cells = vec![row.repository.clone()];
        cells.extend(
            table
                .columns
                .iter()
                .map(|column| format_number(row.values.get(column).copied())),
        );
        writer
            .write_record(&cells)
            .map_err(|e| DatasetError::csv(path, e))?;
    }
    writer.flush().map_err(|e| DatasetError::io(path, e))?;
    Ok(())
}

pub fn load_aggregated(path: &Path) -> DatasetResult<AggregatedTable> {
    let table = CsvTable::load(path)?;
    let repo_idx = table
        .column_index("repository")
        .ok_or_else(|| DatasetError::MissingColumn {
            column: "repository".to_string(),
            path: path.to_path_buf(),
        })?;

    let columns: Vec<(usize, String)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != repo_idx)
        .map(|(idx, name)| (idx, name.clone()))
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let values: HashMap<String, f64> = columns
                .iter()
                .filter_map(|(idx, name)| {
                    row.get(*idx)
                        .and_then(|cell| parse_number(cell))
                        .map(|v| (name.clone(), v))
                })
                .collect();
            AggregatedMetrics {
                repository: row.get(repo_idx).cloned().unwrap_or_default(),
                values,
            }
        })
        .collect();

    Ok(AggregatedTable {
        columns: columns.into_iter().map(|(_, name)| name).collect(),
        rows,
    })
}

/// Write the final dataset: discovery columns, quality columns, `age_years`.
pub fn save_final(dataset: &FinalDataset, path: &Path) -> DatasetResult<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path).map_err(|e| DatasetError::csv(path, e))?;

    let mut header: Vec<String> = REPOSITORY_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(dataset.quality_columns.iter().cloned());
    header.push("age_years".to_string());
    writer
        .write_record(&header)
        .map_err(|e| DatasetError::csv(path, e))?;

    for row in &dataset.rows {
        let record = &row.record;
        let mut cells = vec![
            record.name.clone(),
            record.url.clone(),
            record.stargazers.to_string(),
            record.created_at.clone(),
            record.releases.to_string(),
            record.primary_language.clone().unwrap_or_default(),
        ];
        cells.extend(dataset.quality_columns.iter().map(|column| {
            format_number(
                row.metrics
                    .as_ref()
                    .and_then(|metrics| metrics.get(column).copied()),
            )
        }));
        cells.push(format_number(row.age_years));
        writer
            .write_record(&cells)
            .map_err(|e| DatasetError::csv(path, e))?;
    }
    writer.flush().map_err(|e| DatasetError::io(path, e))?;
    Ok(())
}
