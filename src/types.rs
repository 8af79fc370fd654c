//! # Common Types
//!
//! This module contains the records that flow between pipeline stages:
//! repositories found by discovery, metrics aggregated from CK output, and
//! the joined rows of the final dataset.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A repository returned by the search API.
///
/// Field names serialize to the discovery CSV header
/// `name,url,stargazers,createdAt,releases,primaryLanguage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    /// Owner and repository, e.g. `spring-projects/spring-boot`
    pub name: String,
    /// Web URL of the repository
    pub url: String,
    /// Number of stargazers at discovery time
    pub stargazers: u64,
    /// Creation timestamp as returned by the API (RFC 3339)
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Total number of releases
    pub releases: u64,
    /// Primary language, if the API reports one
    #[serde(rename = "primaryLanguage")]
    pub primary_language: Option<String>,
}

impl RepositoryRecord {
    /// The last `/` segment of `name`, used as the join key against CK output.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Aggregated CK metrics for one repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedMetrics {
    /// Short repository name derived from the CK report file name
    pub repository: String,
    /// `<metric>_<aggregation>` → value
    pub values: HashMap<String, f64>,
}

/// The aggregated metrics table, with its columns in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedTable {
    /// Value columns, excluding `repository`
    pub columns: Vec<String>,
    pub rows: Vec<AggregatedMetrics>,
}

/// One row of the final dataset: a repository joined with its metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalDatasetRow {
    pub record: RepositoryRecord,
    /// `None` when no aggregated metrics matched the repository
    pub metrics: Option<HashMap<String, f64>>,
    /// `None` when `createdAt` could not be parsed
    pub age_years: Option<f64>,
}

/// The joined dataset produced by the merge stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalDataset {
    /// Quality columns carried over from the aggregated table
    pub quality_columns: Vec<String>,
    pub rows: Vec<FinalDatasetRow>,
}

impl FinalDataset {
    /// Number of rows that found no aggregated metrics.
    pub fn missing_metrics(&self) -> usize {
        self.rows.iter().filter(|row| row.metrics.is_none()).count()
    }
}

/// Outcome of a collection batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionSummary {
    pub processed: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, String)>,
}
