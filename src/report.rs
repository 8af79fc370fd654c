//! # Reporting
//!
//! Correlation plots and descriptive statistics over the final dataset.
//! Only rows holding a number in every analysed column take part.

use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::correlation::{linear_fit, spearman, Correlation};
use crate::analysis::descriptive::{describe, Summary};
use crate::dataset::{format_number, CsvTable};
use crate::error::{DatasetError, ReportError, ReportResult};
use crate::plotting::{render_scatter, ChartStyle, ChartTheme, ScatterPlot};

/// Research questions and the process metric each one examines
pub const PROCESS_METRICS: [(&str, &str); 4] = [
    ("RQ01_Popularity", "stargazers"),
    ("RQ02_Maturity", "age_years"),
    ("RQ03_Activity", "releases"),
    ("RQ04_Size", "loc_sum"),
];

/// Quality metrics and their dataset columns
pub const QUALITY_METRICS: [(&str, &str); 3] = [
    ("CBO", "cbo_median"),
    ("DIT", "dit_median"),
    ("LCOM", "lcom_median"),
];

/// Columns of the descriptive statistics table
pub const STATS_COLUMNS: [&str; 7] = [
    "stargazers",
    "age_years",
    "releases",
    "loc_sum",
    "cbo_median",
    "dit_median",
    "lcom_median",
];

/// Process metrics plotted on a log axis when all values are positive
const SKEWED_METRICS: [&str; 3] = ["stargazers", "loc_sum", "releases"];

/// Result of one research question × quality metric pair
#[derive(Debug, Clone, PartialEq)]
pub struct PairReport {
    pub research_question: String,
    pub quality_metric: String,
    pub correlation: Correlation,
    /// Image path, `None` when rendering failed
    pub plot: Option<PathBuf>,
}

/// `stargazers` → `Stargazers`, `age_years` → `Age Years`
pub fn title_case(column: &str) -> String {
    column
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Whether `column` is plotted on a log x axis: only skewed metrics whose
/// values are all positive
pub fn use_log_axis(column: &str, values: &[f64]) -> bool {
    SKEWED_METRICS.contains(&column) && !values.is_empty() && values.iter().all(|v| *v > 0.0)
}

fn analysed_columns() -> Vec<&'static str> {
    QUALITY_METRICS
        .iter()
        .chain(PROCESS_METRICS.iter())
        .map(|(_, column)| *column)
        .collect()
}

fn load_complete(dataset_csv: &Path, columns: &[&str]) -> ReportResult<Vec<Vec<f64>>> {
    let table = CsvTable::load(dataset_csv)?;
    log::info!("Loaded {} rows from {}", table.rows.len(), dataset_csv.display());

    let rows = table.complete_rows(columns)?;
    log::info!(
        "Dropped {} rows with missing values, {} remain",
        table.rows.len() - rows.len(),
        rows.len()
    );
    Ok(rows)
}

/// Compute correlations and render one scatter plot per pair.
///
/// A plot that fails to render is logged and reported with `plot: None`;
/// the remaining pairs are still produced. A `correlations.csv` summary is
/// written next to the images.
pub fn generate_graphs(dataset_csv: &Path, output_dir: &Path) -> ReportResult<Vec<PairReport>> {
    let columns = analysed_columns();
    let rows = load_complete(dataset_csv, &columns)?;

    fs::create_dir_all(output_dir).map_err(|e| ReportError::Io {
        path: output_dir.to_path_buf(),
        source: e,
    })?;
    log::info!("Writing plots to {}", output_dir.display());

    let column_values = |name: &str| -> Vec<f64> {
        let idx = columns.iter().position(|c| *c == name).unwrap_or_default();
        rows.iter().map(|row| row[idx]).collect()
    };

    let theme = ChartTheme::default();
    let style = ChartStyle::default();
    let mut reports = Vec::new();

    for (rq_name, process_column) in PROCESS_METRICS {
        let x = column_values(process_column);
        for (quality_name, quality_column) in QUALITY_METRICS {
            log::info!("Plotting {} vs {}", rq_name, quality_name);
            let y = column_values(quality_column);

            let correlation = spearman(&x, &y);
            let points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
            let log_x = use_log_axis(process_column, &x);

            let plot = ScatterPlot {
                title: format!(
                    "{}: {} vs. {}",
                    rq_name,
                    title_case(process_column),
                    quality_name
                ),
                subtitle: format!(
                    "Spearman ρ: {:.3} | p-value: {:.3}",
                    correlation.rho, correlation.p_value
                ),
                x_label: title_case(process_column),
                y_label: format!("{} ({})", quality_name, quality_column),
                points: &points,
                log_x,
                trend: linear_fit(&x, &y),
            };

            let path = output_dir.join(format!("{}_{}.png", rq_name, quality_name));
            let plot_path = match render_scatter(&plot, &path, &theme, &style) {
                Ok(()) => Some(path),
                Err(e) => {
                    log::error!("Could not render {}: {}", path.display(), e);
                    None
                }
            };

            reports.push(PairReport {
                research_question: rq_name.to_string(),
                quality_metric: quality_name.to_string(),
                correlation,
                plot: plot_path,
            });
        }
    }

    let summary_path = output_dir.join("correlations.csv");
    save_correlations(&reports, &summary_path)?;
    log::info!(
        "Generated {} of {} plots",
        reports.iter().filter(|r| r.plot.is_some()).count(),
        reports.len()
    );

    Ok(reports)
}

fn save_correlations(reports: &[PairReport], path: &Path) -> ReportResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| DatasetError::csv(path, e))?;
    writer
        .write_record(["research_question", "quality_metric", "n", "rho", "p_value"])
        .map_err(|e| DatasetError::csv(path, e))?;
    for report in reports {
        writer
            .write_record([
                report.research_question.clone(),
                report.quality_metric.clone(),
                report.correlation.n.to_string(),
                format_number(Some(report.correlation.rho)),
                format_number(Some(report.correlation.p_value)),
            ])
            .map_err(|e| DatasetError::csv(path, e))?;
    }
    writer.flush().map_err(|e| DatasetError::io(path, e))?;
    Ok(())
}

/// Descriptive statistics for [`STATS_COLUMNS`], written to `output_csv`
/// with one row per statistic.
pub fn generate_stats(dataset_csv: &Path, output_csv: &Path) -> ReportResult<Vec<Summary>> {
    let rows = load_complete(dataset_csv, &STATS_COLUMNS)?;
    let summaries = describe(&rows, STATS_COLUMNS.len());

    if let Some(parent) = output_csv.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut writer = csv::Writer::from_path(output_csv).map_err(|e| DatasetError::csv(output_csv, e))?;
    let mut header = vec!["statistic"];
    header.extend(STATS_COLUMNS);
    writer
        .write_record(&header)
        .map_err(|e| DatasetError::csv(output_csv, e))?;

    for (stat_idx, label) in Summary::LABELS.iter().enumerate() {
        let mut record = vec![label.to_string()];
        record.extend(
            summaries
                .iter()
                .map(|summary| format_number(Some(summary.values()[stat_idx]))),
        );
        writer
            .write_record(&record)
            .map_err(|e| DatasetError::csv(output_csv, e))?;
    }
    writer.flush().map_err(|e| DatasetError::io(output_csv, e))?;

    for (column, summary) in STATS_COLUMNS.iter().zip(&summaries) {
        log::info!(
            "{:<12} mean={:.3} median={:.3} std={:.3} min={:.3} max={:.3}",
            column,
            summary.mean,
            summary.median,
            summary.std,
            summary.min,
            summary.max
        );
    }
    log::info!("Statistics saved to {}", output_csv.display());

    Ok(summaries)
}
