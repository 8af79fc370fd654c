//! # Repository Quality Mining Library
//!
//! `repo_quality` collects popular Java repositories from GitHub, measures
//! their code quality with the CK tool and relates process metrics
//! (popularity, maturity, activity, size) to quality metrics (CBO, DIT, LCOM).
//!
//! ## Stages
//!
//! - Discovery of repositories through the GitHub GraphQL search API
//! - Cloning and CK analysis, one repository at a time
//! - Aggregation of per-class reports into one row per repository
//! - Merging repository metadata with aggregated metrics
//! - Spearman correlation plots and descriptive statistics
//!
//! ## Example
//!
//! ```no_run
//! use repo_quality::analysis::aggregate_directory;
//! use repo_quality::utils::Aggregation;
//! use std::path::Path;
//!
//! let metrics = vec!["cbo".to_string(), "loc".to_string()];
//! let table = aggregate_directory(
//!     Path::new("ck_collected_metrics"),
//!     &metrics,
//!     &[Aggregation::Median, Aggregation::Sum],
//! )?;
//! println!("{} repositories", table.rows.len());
//! # Ok::<(), repo_quality::error::DatasetError>(())
//! ```

pub mod analysis;
pub mod app;
pub mod dataset;
pub mod discovery;
pub mod error;
pub mod plotting;
pub mod report;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use app::{Cli, Pipeline, PipelineConfig};
pub use types::{AggregatedTable, FinalDataset, RepositoryRecord};
