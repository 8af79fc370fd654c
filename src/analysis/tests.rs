use super::aggregate::*;
use crate::error::DatasetError;
use crate::utils::Aggregation;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CLASS_HEADER: &str = "file,class,type,cbo,dit,lcom,loc";

fn default_metrics() -> Vec<String> {
    ["cbo", "dit", "lcom", "loc"].iter().map(|m| m.to_string()).collect()
}

fn write_report(root: &Path, repo: &str, body: &str) {
    let dir = root.join(repo);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}class.csv", repo)), body).unwrap();
}

#[test]
fn test_repository_from_report() {
    assert_eq!(
        repository_from_report(Path::new("metrics/demo/democlass.csv")),
        Some("demo".to_string())
    );
    assert_eq!(
        repository_from_report(Path::new("metrics/demo/class.csv")),
        Some("demo".to_string())
    );
    assert_eq!(repository_from_report(Path::new("metrics/demo/demomethod.csv")), None);
}

#[test]
fn test_known_aggregates() {
    let temp_dir = TempDir::new().unwrap();
    write_report(
        temp_dir.path(),
        "alpha",
        &format!(
            "{}\nA.java,A,class,1,1,0,10\nB.java,B,class,2,1,0,20\nC.java,C,class,3,2,1,30\nD.java,D,class,4,2,1,\n",
            CLASS_HEADER
        ),
    );

    let table = aggregate_directory(
        temp_dir.path(),
        &default_metrics(),
        &[Aggregation::Median, Aggregation::Mean, Aggregation::Sum],
    )
    .unwrap();

    assert_eq!(table.rows.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row.repository, "alpha");
    assert_eq!(row.values["cbo_median"], 2.5);
    assert_eq!(row.values["cbo_mean"], 2.5);
    assert_eq!(row.values["loc_sum"], 60.0);
    assert_eq!(table.columns.len(), 12);
    assert_eq!(table.columns[0], "cbo_median");
}

#[test]
fn test_empty_report_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    write_report(temp_dir.path(), "empty", &format!("{}\n", CLASS_HEADER));
    write_report(temp_dir.path(), "blank", "");
    write_report(
        temp_dir.path(),
        "full",
        &format!("{}\nA.java,A,class,5,1,0,10\n", CLASS_HEADER),
    );

    let table = aggregate_directory(temp_dir.path(), &default_metrics(), &[Aggregation::Median]).unwrap();

    let names: Vec<&str> = table.rows.iter().map(|r| r.repository.as_str()).collect();
    assert_eq!(names, vec!["full"]);
}

#[test]
fn test_missing_metric_column_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    write_report(temp_dir.path(), "partial", "class,cbo\nA,3\nB,5\n");

    let table = aggregate_directory(temp_dir.path(), &default_metrics(), &[Aggregation::Median]).unwrap();

    let row = &table.rows[0];
    assert_eq!(row.values.get("cbo_median"), Some(&4.0));
    assert_eq!(row.values.get("dit_median"), None);
}

#[test]
fn test_nothing_to_save() {
    let temp_dir = TempDir::new().unwrap();
    write_report(temp_dir.path(), "empty", &format!("{}\n", CLASS_HEADER));
    let output = temp_dir.path().join("ck_metrics.csv");

    let result = save_ck_metrics(temp_dir.path(), &output, &default_metrics(), &[Aggregation::Sum]);
    assert!(matches!(result, Err(DatasetError::NothingToSave(_))));
    assert!(!output.exists());
}

#[test]
fn test_missing_directory() {
    let result = aggregate_directory(Path::new("/nonexistent/metrics"), &default_metrics(), &[Aggregation::Sum]);
    assert!(matches!(result, Err(DatasetError::MissingInput(_))));
}

#[test]
fn test_rows_sorted_and_other_reports_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let body = format!("{}\nA.java,A,class,1,1,0,10\n", CLASS_HEADER);
    write_report(temp_dir.path(), "zeta", &body);
    write_report(temp_dir.path(), "beta", &body);
    fs::write(temp_dir.path().join("beta").join("betamethod.csv"), "method,loc\nm,1\n").unwrap();

    let reports = find_class_reports(temp_dir.path());
    assert_eq!(reports.len(), 2);

    let table = aggregate_directory(temp_dir.path(), &default_metrics(), &[Aggregation::Sum]).unwrap();
    let names: Vec<&str> = table.rows.iter().map(|r| r.repository.as_str()).collect();
    assert_eq!(names, vec!["beta", "zeta"]);
}
