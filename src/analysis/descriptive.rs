use statrs::statistics::Statistics;

use crate::utils::median;

/// Summary statistics of one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1)
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Row labels in output order
    pub const LABELS: [&'static str; 5] = ["mean", "median", "std", "min", "max"];

    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                mean: f64::NAN,
                median: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
            };
        }

        Self {
            mean: Statistics::mean(values),
            median: median(values).unwrap_or(f64::NAN),
            std: Statistics::std_dev(values),
            min: Statistics::min(values),
            max: Statistics::max(values),
        }
    }

    /// Values in the order of [`Summary::LABELS`]
    pub fn values(&self) -> [f64; 5] {
        [self.mean, self.median, self.std, self.min, self.max]
    }
}

/// Summaries for each column of a row-major table
pub fn describe(rows: &[Vec<f64>], columns: usize) -> Vec<Summary> {
    (0..columns)
        .map(|col| {
            let values: Vec<f64> = rows.iter().filter_map(|row| row.get(col).copied()).collect();
            Summary::of(&values)
        })
        .collect()
}
