use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};
use std::fmt;
use std::str::FromStr;

/// Aggregate statistic applied to a column of per-class values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Median,
    Mean,
    Sum,
}

impl Aggregation {
    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::Median => "median",
            Aggregation::Mean => "mean",
            Aggregation::Sum => "sum",
        }
    }

    /// Apply the aggregation. Median and mean of an empty column are undefined.
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        match self {
            Aggregation::Sum => Some(values.iter().sum()),
            _ if values.is_empty() => None,
            Aggregation::Mean => Some(Statistics::mean(values)),
            Aggregation::Median => median(values),
        }
    }

    /// Column name for a metric under this aggregation, e.g. `cbo_median`
    pub fn column(&self, metric: &str) -> String {
        format!("{}_{}", metric, self.name())
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "median" => Ok(Aggregation::Median),
            "mean" => Ok(Aggregation::Mean),
            "sum" => Ok(Aggregation::Sum),
            other => Err(format!("unknown aggregation `{}`", other)),
        }
    }
}

/// Median of the data; the mean of the two middle values for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Median::median(&Data::new(values.to_vec())))
}

/// Output columns for every metric × aggregation pair, metric-major
pub fn aggregate_columns(metrics: &[String], aggregations: &[Aggregation]) -> Vec<String> {
    metrics
        .iter()
        .flat_map(|metric| aggregations.iter().map(move |agg| agg.column(metric)))
        .collect()
}
