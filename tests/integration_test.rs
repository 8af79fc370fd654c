use pretty_assertions::assert_eq;
use repo_quality::analysis::save_ck_metrics;
use repo_quality::dataset::{create_dataset, save_repositories, CsvTable};
use repo_quality::report::{generate_graphs, generate_stats};
use repo_quality::types::RepositoryRecord;
use repo_quality::utils::Aggregation;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CLASS_HEADER: &str = "file,class,type,cbo,dit,lcom,loc";

fn write_report(metrics_root: &Path, repo: &str, rows: &[(u32, u32, u32, u32)]) {
    let dir = metrics_root.join(repo);
    fs::create_dir_all(&dir).unwrap();
    let mut body = format!("{}\n", CLASS_HEADER);
    for (i, (cbo, dit, lcom, loc)) in rows.iter().enumerate() {
        body.push_str(&format!("C{0}.java,C{0},class,{1},{2},{3},{4}\n", i, cbo, dit, lcom, loc));
    }
    fs::write(dir.join(format!("{}class.csv", repo)), body).unwrap();
}

fn record(name: &str, stars: u64, created_at: &str, releases: u64) -> RepositoryRecord {
    RepositoryRecord {
        name: name.to_string(),
        url: format!("https://github.com/{}", name),
        stargazers: stars,
        created_at: created_at.to_string(),
        releases,
        primary_language: Some("Java".to_string()),
    }
}

/// Four analysed repositories plus one that never produced a report
fn setup_workspace(root: &Path) {
    let metrics_root = root.join("ck_collected_metrics");
    write_report(&metrics_root, "alpha", &[(1, 1, 0, 10), (3, 1, 2, 30)]);
    write_report(&metrics_root, "beta", &[(2, 1, 1, 50), (4, 2, 3, 70)]);
    write_report(&metrics_root, "gamma", &[(5, 2, 4, 100), (7, 3, 6, 200)]);
    write_report(&metrics_root, "delta", &[(8, 3, 9, 400), (10, 4, 11, 600)]);

    let records = vec![
        record("org/alpha", 100, "2021-01-01T00:00:00Z", 1),
        record("org/beta", 200, "2019-01-01T00:00:00Z", 4),
        record("org/gamma", 300, "2017-01-01T00:00:00Z", 9),
        record("org/delta", 400, "2015-01-01T00:00:00Z", 16),
        record("org/unanalysed", 500, "2013-01-01T00:00:00Z", 25),
    ];
    save_repositories(&records, &root.join("collected_repos.csv")).unwrap();
}

#[test]
fn test_full_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    setup_workspace(root);

    let metrics: Vec<String> = ["cbo", "dit", "lcom", "loc"].iter().map(|m| m.to_string()).collect();
    let aggregated = save_ck_metrics(
        &root.join("ck_collected_metrics"),
        &root.join("ck_metrics.csv"),
        &metrics,
        &[Aggregation::Median, Aggregation::Mean, Aggregation::Sum],
    )
    .unwrap();
    assert_eq!(aggregated.rows.len(), 4);
    assert_eq!(aggregated.rows[0].repository, "alpha");
    assert_eq!(aggregated.rows[0].values["cbo_median"], 2.0);
    assert_eq!(aggregated.rows[0].values["loc_sum"], 40.0);

    let dataset = create_dataset(
        &root.join("collected_repos.csv"),
        &root.join("ck_metrics.csv"),
        &root.join("final_dataset.csv"),
    )
    .unwrap();
    assert_eq!(dataset.rows.len(), 5);
    assert_eq!(dataset.missing_metrics(), 1);

    let table = CsvTable::load(&root.join("final_dataset.csv")).unwrap();
    assert_eq!(table.headers.len(), 6 + 12 + 1);
    assert_eq!(table.headers.last().map(String::as_str), Some("age_years"));
    let cbo_median = table.numeric_column("cbo_median").unwrap();
    assert_eq!(cbo_median[4], None);
    let ages = table.numeric_column("age_years").unwrap();
    assert!(ages.iter().all(|age| age.is_some_and(|a| a > 0.0)));

    let summaries = generate_stats(&root.join("final_dataset.csv"), &root.join("results/stats.csv")).unwrap();
    assert_eq!(summaries.len(), 7);
    // only the four analysed repositories are complete
    assert_eq!(summaries[0].mean, 250.0);
    assert_eq!(summaries[0].min, 100.0);
    let stats = fs::read_to_string(root.join("results/stats.csv")).unwrap();
    assert_eq!(stats.lines().count(), 6);

    let reports = generate_graphs(&root.join("final_dataset.csv"), &root.join("results")).unwrap();
    assert_eq!(reports.len(), 12);
    for report in &reports {
        assert_eq!(report.correlation.n, 4);
        // every process metric grows together with every quality metric
        assert!((report.correlation.rho - 1.0).abs() < 1e-9, "{:?}", report);
    }
    assert!(root.join("results/correlations.csv").is_file());
}

#[test]
fn test_merge_without_metrics_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    setup_workspace(root);

    let result = create_dataset(
        &root.join("collected_repos.csv"),
        &root.join("ck_metrics.csv"),
        &root.join("final_dataset.csv"),
    );
    assert!(result.is_err());
    assert!(!root.join("final_dataset.csv").exists());
}
