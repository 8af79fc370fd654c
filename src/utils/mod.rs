mod aggregation;

pub use aggregation::{aggregate_columns, median, Aggregation};
