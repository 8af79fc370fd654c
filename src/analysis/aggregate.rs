use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::dataset::{save_aggregated, CsvTable};
use crate::error::{DatasetError, DatasetResult};
use crate::types::{AggregatedMetrics, AggregatedTable};
use crate::utils::{aggregate_columns, Aggregation};

/// Suffix CK appends to its per-class report
pub const CLASS_REPORT_SUFFIX: &str = "class.csv";

/// Repository name encoded in a CK class report path.
///
/// `<dir>/<repo>class.csv` yields `<repo>`; a bare `<repo>/class.csv` yields
/// the parent directory name.
pub fn repository_from_report(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(CLASS_REPORT_SUFFIX)?;
    if stem.is_empty() {
        path.parent()?
            .file_name()?
            .to_str()
            .map(str::to_string)
    } else {
        Some(stem.to_string())
    }
}

/// Every CK class report below `root`, sorted by path
pub fn find_class_reports(root: &Path) -> Vec<PathBuf> {
    let mut reports: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map_or(false, |name| name.ends_with(CLASS_REPORT_SUFFIX))
        })
        .map(|entry| entry.into_path())
        .collect();
    reports.sort();
    reports
}

/// Aggregate one CK class table. Returns `None` when the table has no rows.
pub fn aggregate_table(
    repository: &str,
    table: &CsvTable,
    metrics: &[String],
    aggregations: &[Aggregation],
) -> Option<AggregatedMetrics> {
    if table.is_empty() {
        log::warn!("CK report for {} is empty, skipping", repository);
        return None;
    }

    let mut values = HashMap::new();
    for metric in metrics {
        let Some(column) = table.numeric_column(metric) else {
            log::warn!("Metric `{}` not found for {}", metric, repository);
            continue;
        };
        let column: Vec<f64> = column.into_iter().flatten().collect();

        for aggregation in aggregations {
            match aggregation.apply(&column) {
                Some(value) => {
                    values.insert(aggregation.column(metric), value);
                }
                None => log::warn!(
                    "No numeric `{}` values for {}, {} skipped",
                    metric,
                    repository,
                    aggregation
                ),
            }
        }
    }

    Some(AggregatedMetrics {
        repository: repository.to_string(),
        values,
    })
}

/// Aggregate every CK class report below `metrics_dir`.
///
/// Empty or unreadable reports are skipped with a warning. Fails when no
/// report produced a row.
pub fn aggregate_directory(
    metrics_dir: &Path,
    metrics: &[String],
    aggregations: &[Aggregation],
) -> DatasetResult<AggregatedTable> {
    if !metrics_dir.is_dir() {
        return Err(DatasetError::MissingInput(metrics_dir.to_path_buf()));
    }

    let reports = find_class_reports(metrics_dir);
    log::info!(
        "Found {} CK class reports in {}",
        reports.len(),
        metrics_dir.display()
    );

    let mut rows = Vec::with_capacity(reports.len());
    for report in reports {
        let Some(repository) = repository_from_report(&report) else {
            log::warn!("Cannot derive repository name from {}", report.display());
            continue;
        };

        let table = match CsvTable::load(&report) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("Skipping {}: {}", report.display(), e);
                continue;
            }
        };

        if let Some(row) = aggregate_table(&repository, &table, metrics, aggregations) {
            log::debug!("Aggregated {} ({} classes)", repository, table.rows.len());
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return Err(DatasetError::NothingToSave(metrics_dir.to_path_buf()));
    }

    rows.sort_by(|a, b| a.repository.cmp(&b.repository));

    Ok(AggregatedTable {
        columns: aggregate_columns(metrics, aggregations),
        rows,
    })
}

/// Aggregate `metrics_dir` and write the result to `output_csv`.
pub fn save_ck_metrics(
    metrics_dir: &Path,
    output_csv: &Path,
    metrics: &[String],
    aggregations: &[Aggregation],
) -> DatasetResult<AggregatedTable> {
    let table = aggregate_directory(metrics_dir, metrics, aggregations)?;
    save_aggregated(&table, output_csv)?;
    log::info!(
        "Aggregated metrics for {} repositories saved to {}",
        table.rows.len(),
        output_csv.display()
    );
    Ok(table)
}
