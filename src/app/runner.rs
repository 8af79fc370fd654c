use anyhow::{bail, Context, Result};
use std::time::Instant;

use crate::analysis::save_ck_metrics;
use crate::app::cli::{Cli, Command};
use crate::app::config::PipelineConfig;
use crate::dataset::{create_dataset, save_repositories};
use crate::discovery::{discover, GitHubClient};
use crate::report::{generate_graphs, generate_stats};
use crate::types::CollectionSummary;

/// Stage runner for one invocation of the command line tool
pub struct Pipeline {
    config: PipelineConfig,
    token: Option<String>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, token: Option<String>) -> Self {
        Self { config, token }
    }

    /// Load the configuration file, apply overrides and run the command
    pub async fn from_cli(cli: Cli) -> Result<()> {
        let mut config = PipelineConfig::load(cli.config.as_deref())?;
        cli.command.apply(&mut config);

        let pipeline = Pipeline::new(config, cli.token);
        pipeline.execute(&cli.command).await
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn execute(&self, command: &Command) -> Result<()> {
        let started = Instant::now();
        match command {
            Command::Discover(_) => {
                self.discover().await?;
            }
            Command::Collect(_) => {
                self.collect().await?;
            }
            Command::Aggregate(_) => self.aggregate()?,
            Command::Merge(_) => self.merge()?,
            Command::Graphs(_) => self.graphs()?,
            Command::Stats(_) => self.stats()?,
            Command::Run(_) => self.run_all().await?,
        }
        log::info!("Done in {:.2}s", started.elapsed().as_secs_f64());
        Ok(())
    }

    /// Returns whether any repository was saved
    pub async fn discover(&self) -> Result<bool> {
        let settings = &self.config.discovery;
        let client = GitHubClient::new(self.token.clone().unwrap_or_default(), settings.endpoint.clone())?;

        let records = discover(&client, &settings.query, settings.page_size, settings.target)
            .await
            .context("repository discovery failed")?;

        let path = &self.config.paths.repositories_csv;
        save_repositories(&records, path).with_context(|| format!("could not save {}", path.display()))
    }

    pub async fn collect(&self) -> Result<CollectionSummary> {
        let collector = self.config.collection.collector();
        let summary = collector
            .run_collection(&self.config.paths.repositories_csv, self.config.collection.limit)
            .await
            .context("metric collection could not start")?;

        for (url, reason) in &summary.failed {
            log::warn!("Failed: {} ({})", url, reason);
        }
        Ok(summary)
    }

    pub fn aggregate(&self) -> Result<()> {
        let metrics_dir = &self.config.collection.metrics_dir;
        save_ck_metrics(
            metrics_dir,
            &self.config.paths.aggregated_csv,
            &self.config.aggregation.metrics,
            &self.config.aggregation.aggregations,
        )
        .with_context(|| format!("could not aggregate reports in {}", metrics_dir.display()))?;
        Ok(())
    }

    pub fn merge(&self) -> Result<()> {
        let paths = &self.config.paths;
        create_dataset(&paths.repositories_csv, &paths.aggregated_csv, &paths.final_csv)
            .context("could not build the final dataset")?;
        Ok(())
    }

    pub fn graphs(&self) -> Result<()> {
        let paths = &self.config.paths;
        let reports = generate_graphs(&paths.final_csv, &paths.results_dir).context("could not generate graphs")?;
        for report in &reports {
            log::info!(
                "{} x {}: rho={:.3} p={:.3} n={}",
                report.research_question,
                report.quality_metric,
                report.correlation.rho,
                report.correlation.p_value,
                report.correlation.n
            );
        }
        Ok(())
    }

    pub fn stats(&self) -> Result<()> {
        let paths = &self.config.paths;
        generate_stats(&paths.final_csv, &paths.stats_csv).context("could not compute statistics")?;
        Ok(())
    }

    async fn run_all(&self) -> Result<()> {
        log::info!("Stage 1/6: discovery");
        if !self.discover().await? {
            bail!("discovery returned no repositories");
        }

        log::info!("Stage 2/6: collection");
        let summary = self.collect().await?;
        if summary.succeeded.is_empty() {
            log::warn!("No repository was analysed successfully");
        }

        log::info!("Stage 3/6: aggregation");
        self.aggregate()?;

        log::info!("Stage 4/6: merge");
        self.merge()?;

        log::info!("Stage 5/6: graphs");
        self.graphs()?;

        log::info!("Stage 6/6: statistics");
        self.stats()?;
        Ok(())
    }
}
