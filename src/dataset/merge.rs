use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::dataset::{load_aggregated, load_repositories, save_final};
use crate::error::DatasetResult;
use crate::types::{AggregatedTable, FinalDataset, FinalDatasetRow, RepositoryRecord};

const DAYS_PER_YEAR: f64 = 365.25;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Elapsed days between `created_at` and `now`, divided by 365.25.
pub fn age_in_years(created_at: &str, now: DateTime<Utc>) -> Option<f64> {
    let created = DateTime::parse_from_rfc3339(created_at.trim()).ok()?;
    let days = (now - created.with_timezone(&Utc)).num_seconds() as f64 / SECONDS_PER_DAY;
    Some(days / DAYS_PER_YEAR)
}

fn warn_duplicates<'a>(label: &str, keys: impl Iterator<Item = &'a str>) {
    let mut seen = HashSet::new();
    let duplicates: HashSet<&str> = keys.filter(|key| !seen.insert(*key)).collect();
    if !duplicates.is_empty() {
        let mut names: Vec<_> = duplicates.into_iter().collect();
        names.sort_unstable();
        log::warn!(
            "{} short names are not unique, join may attach the wrong metrics: {}",
            label,
            names.join(", ")
        );
    }
}

/// Left-join repositories onto aggregated metrics by short name.
///
/// Every record is kept. Records with no matching metrics get `None`. A
/// short name that matches several aggregated rows yields one output row per
/// match, in aggregated order, so a name collision shows up as repeated
/// repositories instead of silently picking one.
pub fn merge_records(
    records: Vec<RepositoryRecord>,
    aggregated: AggregatedTable,
    now: DateTime<Utc>,
) -> FinalDataset {
    warn_duplicates("Repository", records.iter().map(RepositoryRecord::short_name));
    warn_duplicates(
        "Aggregated",
        aggregated.rows.iter().map(|row| row.repository.as_str()),
    );

    let mut by_name: HashMap<String, Vec<HashMap<String, f64>>> = HashMap::new();
    for row in aggregated.rows {
        by_name.entry(row.repository).or_default().push(row.values);
    }

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let age_years = age_in_years(&record.created_at, now);
        if age_years.is_none() {
            log::warn!(
                "Could not parse createdAt `{}` for {}",
                record.created_at,
                record.name
            );
        }

        match by_name.get(record.short_name()) {
            Some(matches) => rows.extend(matches.iter().map(|values| FinalDatasetRow {
                record: record.clone(),
                metrics: Some(values.clone()),
                age_years,
            })),
            None => rows.push(FinalDatasetRow {
                record,
                metrics: None,
                age_years,
            }),
        }
    }

    FinalDataset {
        quality_columns: aggregated.columns,
        rows,
    }
}

/// Build the final dataset from the discovery and aggregated CSV files.
pub fn create_dataset(
    repositories_csv: &Path,
    aggregated_csv: &Path,
    output_csv: &Path,
) -> DatasetResult<FinalDataset> {
    log::info!("Loading repositories from {}", repositories_csv.display());
    let records = load_repositories(repositories_csv)?;
    log::info!("Loading CK metrics from {}", aggregated_csv.display());
    let aggregated = load_aggregated(aggregated_csv)?;

    log::info!(
        "Repositories: {} rows, CK metrics: {} rows",
        records.len(),
        aggregated.rows.len()
    );

    let dataset = merge_records(records, aggregated, Utc::now());

    let missing = dataset.missing_metrics();
    if missing > 0 {
        log::warn!("{} repositories had no matching CK metrics", missing);
    }

    save_final(&dataset, output_csv)?;
    log::info!(
        "Final dataset with {} rows saved to {}",
        dataset.rows.len(),
        output_csv.display()
    );

    for row in dataset.rows.iter().take(5) {
        log::info!(
            "  {} stars={} releases={} age={:.2} metrics={}",
            row.record.name,
            row.record.stargazers,
            row.record.releases,
            row.age_years.unwrap_or(f64::NAN),
            if row.metrics.is_some() { "yes" } else { "missing" }
        );
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AggregatedMetrics;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn record(name: &str, created_at: &str) -> RepositoryRecord {
        RepositoryRecord {
            name: name.to_string(),
            url: format!("https://github.com/{}", name),
            stargazers: 10,
            created_at: created_at.to_string(),
            releases: 1,
            primary_language: Some("Java".to_string()),
        }
    }

    fn metrics(repository: &str, cbo: f64) -> AggregatedMetrics {
        AggregatedMetrics {
            repository: repository.to_string(),
            values: HashMap::from([("cbo_median".to_string(), cbo)]),
        }
    }

    #[test]
    fn test_age_of_one_year() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let created = now - Duration::hours(365 * 24 + 6);
        let age = age_in_years(&created.to_rfc3339(), now).unwrap();
        assert!((age - 1.0).abs() < 1e-9);

        let created = now - Duration::days(1461);
        let age = age_in_years(&created.to_rfc3339(), now).unwrap();
        assert!((age - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_age_unparsable() {
        assert_eq!(age_in_years("not a date", Utc::now()), None);
    }

    #[test]
    fn test_left_join_keeps_unmatched() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let records = vec![
            record("owner/alpha", "2020-01-01T00:00:00Z"),
            record("owner/beta", "2021-01-01T00:00:00Z"),
        ];
        let aggregated = AggregatedTable {
            columns: vec!["cbo_median".to_string()],
            rows: vec![metrics("alpha", 3.0)],
        };

        let dataset = merge_records(records, aggregated, now);
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.missing_metrics(), 1);
        assert_eq!(
            dataset.rows[0].metrics.as_ref().unwrap().get("cbo_median"),
            Some(&3.0)
        );
        assert!(dataset.rows[1].metrics.is_none());
        assert_eq!(dataset.quality_columns, vec!["cbo_median"]);
    }

    #[test]
    fn test_duplicate_aggregated_rows_repeat_record() {
        let now = Utc::now();
        let aggregated = AggregatedTable {
            columns: vec!["cbo_median".to_string()],
            rows: vec![metrics("alpha", 1.0), metrics("alpha", 9.0), metrics("beta", 2.0)],
        };

        let dataset = merge_records(
            vec![
                record("x/alpha", "2020-01-01T00:00:00Z"),
                record("y/gamma", "2020-01-01T00:00:00Z"),
            ],
            aggregated,
            now,
        );

        let cbo: Vec<Option<f64>> = dataset
            .rows
            .iter()
            .map(|row| row.metrics.as_ref().and_then(|m| m.get("cbo_median").copied()))
            .collect();
        assert_eq!(dataset.rows.len(), 3);
        assert_eq!(dataset.rows[0].record.name, "x/alpha");
        assert_eq!(dataset.rows[1].record.name, "x/alpha");
        assert_eq!(dataset.rows[2].record.name, "y/gamma");
        assert_eq!(cbo, vec![Some(1.0), Some(9.0), None]);
        assert_eq!(dataset.missing_metrics(), 1);
    }
}
