use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::{CkRunner, CloneOptions, Collector};
use crate::discovery::DEFAULT_ENDPOINT;
use crate::error::ConfigError;
use crate::utils::Aggregation;

/// Settings for the whole pipeline. Every field has a default, so a config
/// file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub discovery: DiscoveryConfig,
    pub collection: CollectionConfig,
    pub aggregation: AggregationConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub endpoint: String,
    pub query: String,
    pub page_size: u32,
    pub target: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            query: "language:java stars:>1 sort:stars-desc".to_string(),
            page_size: 10,
            target: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub ck_jar: PathBuf,
    pub java: String,
    pub clone_dir: PathBuf,
    pub metrics_dir: PathBuf,
    /// 0 clones full history
    pub clone_depth: i32,
    pub branch: Option<String>,
    pub use_jars: bool,
    pub max_files_per_partition: u32,
    pub variables_and_fields: bool,
    pub limit: Option<usize>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            ck_jar: PathBuf::from("ck-0.7.1-SNAPSHOT-jar-with-dependencies.jar"),
            java: "java".to_string(),
            clone_dir: PathBuf::from("temp_repo_cloned"),
            metrics_dir: PathBuf::from("ck_collected_metrics"),
            clone_depth: 1,
            branch: None,
            use_jars: true,
            max_files_per_partition: 0,
            variables_and_fields: false,
            limit: None,
        }
    }
}

impl CollectionConfig {
    pub fn collector(&self) -> Collector {
        Collector {
            clone_root: self.clone_dir.clone(),
            metrics_root: self.metrics_dir.clone(),
            clone_options: CloneOptions {
                depth: self.clone_depth,
                branch: self.branch.clone(),
                fetch_tags: false,
            },
            ck: CkRunner {
                java: self.java.clone(),
                jar: self.ck_jar.clone(),
                use_jars: self.use_jars,
                max_files_per_partition: self.max_files_per_partition,
                variables_and_fields: self.variables_and_fields,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub metrics: Vec<String>,
    pub aggregations: Vec<Aggregation>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            metrics: ["cbo", "dit", "lcom", "loc"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            aggregations: vec![Aggregation::Median, Aggregation::Mean, Aggregation::Sum],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub repositories_csv: PathBuf,
    pub aggregated_csv: PathBuf,
    pub final_csv: PathBuf,
    pub results_dir: PathBuf,
    pub stats_csv: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            repositories_csv: PathBuf::from("collected_repos.csv"),
            aggregated_csv: PathBuf::from("ck_metrics.csv"),
            final_csv: PathBuf::from("final_dataset.csv"),
            results_dir: PathBuf::from("results"),
            stats_csv: PathBuf::from("results/stats.csv"),
        }
    }
}

impl PipelineConfig {
    /// Load from a TOML file, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let config = PipelineConfig::load(None).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.discovery.page_size, 10);
        assert_eq!(config.collection.clone_depth, 1);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.toml");
        fs::write(
            &path,
            r#"
[discovery]
target = 50

[aggregation]
metrics = ["cbo", "wmc"]
aggregations = ["median"]
"#,
        )
        .unwrap();

        let config = PipelineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.discovery.target, 50);
        assert_eq!(config.discovery.page_size, 10);
        assert_eq!(config.aggregation.metrics, vec!["cbo", "wmc"]);
        assert_eq!(config.aggregation.aggregations, vec![Aggregation::Median]);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.toml");
        fs::write(&path, "discovery = 3").unwrap();

        assert!(matches!(
            PipelineConfig::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_collector_from_config() {
        let config = CollectionConfig {
            clone_depth: 0,
            branch: Some("main".to_string()),
            ..Default::default()
        };
        let collector = config.collector();
        assert_eq!(collector.clone_options.depth, 0);
        assert_eq!(collector.clone_options.branch.as_deref(), Some("main"));
        assert_eq!(collector.ck.java, "java");
    }
}
