use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::app::config::PipelineConfig;
use crate::utils::Aggregation;

#[derive(Parser, Debug)]
#[command(name = "repo-quality")]
#[command(about = "Mine popular GitHub repositories and relate process metrics to code quality", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML file with pipeline settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// GitHub personal access token, needed for discovery
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search GitHub and write the repository list
    Discover(DiscoverArgs),
    /// Clone each listed repository and run CK on it
    Collect(CollectArgs),
    /// Summarise per-class CK reports into one row per repository
    Aggregate(AggregateArgs),
    /// Join repository metadata with aggregated metrics
    Merge(MergeArgs),
    /// Render correlation plots for every research question
    Graphs(GraphsArgs),
    /// Write descriptive statistics of the final dataset
    Stats(StatsArgs),
    /// Run every stage in order
    Run(RunArgs),
}

#[derive(Args, Debug, Default)]
pub struct DiscoverArgs {
    /// Number of repositories to collect
    #[arg(short = 'n', long)]
    pub target: Option<usize>,

    /// GitHub search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Repositories requested per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Output CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct CollectArgs {
    /// Repository list produced by discovery
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Path to the CK jar
    #[arg(long)]
    pub ck_jar: Option<PathBuf>,

    /// Only process the first N repositories
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Clone depth, 0 for full history
    #[arg(long)]
    pub depth: Option<i32>,

    /// Branch to clone instead of the default
    #[arg(long)]
    pub branch: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct AggregateArgs {
    /// Directory holding CK reports
    #[arg(short, long)]
    pub metrics_dir: Option<PathBuf>,

    /// Output CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Metric columns to aggregate
    #[arg(long, value_delimiter = ',')]
    pub metrics: Option<Vec<String>>,

    /// Aggregations to apply (median, mean, sum)
    #[arg(long, value_delimiter = ',')]
    pub aggregations: Option<Vec<Aggregation>>,
}

#[derive(Args, Debug, Default)]
pub struct MergeArgs {
    /// Repository list produced by discovery
    #[arg(short, long)]
    pub repositories: Option<PathBuf>,

    /// Aggregated metrics CSV
    #[arg(short, long)]
    pub metrics: Option<PathBuf>,

    /// Output CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct GraphsArgs {
    /// Final dataset CSV
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Directory for the images
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Final dataset CSV
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Output CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Number of repositories to discover
    #[arg(short = 'n', long)]
    pub target: Option<usize>,

    /// Only collect metrics for the first N repositories
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Path to the CK jar
    #[arg(long)]
    pub ck_jar: Option<PathBuf>,
}

fn set<T>(slot: &mut T, value: &Option<T>)
where
    T: Clone,
{
    if let Some(value) = value {
        *slot = value.clone();
    }
}

impl Command {
    /// Apply command line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut PipelineConfig) {
        match self {
            Command::Discover(args) => {
                set(&mut config.discovery.target, &args.target);
                set(&mut config.discovery.query, &args.query);
                set(&mut config.discovery.page_size, &args.page_size);
                set(&mut config.paths.repositories_csv, &args.output);
            }
            Command::Collect(args) => {
                set(&mut config.paths.repositories_csv, &args.input);
                set(&mut config.collection.ck_jar, &args.ck_jar);
                set(&mut config.collection.clone_depth, &args.depth);
                if args.limit.is_some() {
                    config.collection.limit = args.limit;
                }
                if args.branch.is_some() {
                    config.collection.branch = args.branch.clone();
                }
            }
            Command::Aggregate(args) => {
                set(&mut config.collection.metrics_dir, &args.metrics_dir);
                set(&mut config.paths.aggregated_csv, &args.output);
                set(&mut config.aggregation.metrics, &args.metrics);
                set(&mut config.aggregation.aggregations, &args.aggregations);
            }
            Command::Merge(args) => {
                set(&mut config.paths.repositories_csv, &args.repositories);
                set(&mut config.paths.aggregated_csv, &args.metrics);
                set(&mut config.paths.final_csv, &args.output);
            }
            Command::Graphs(args) => {
                set(&mut config.paths.final_csv, &args.dataset);
                set(&mut config.paths.results_dir, &args.output_dir);
            }
            Command::Stats(args) => {
                set(&mut config.paths.final_csv, &args.dataset);
                set(&mut config.paths.stats_csv, &args.output);
            }
            Command::Run(args) => {
                set(&mut config.discovery.target, &args.target);
                set(&mut config.collection.ck_jar, &args.ck_jar);
                if args.limit.is_some() {
                    config.collection.limit = args.limit;
                }
            }
        }
    }
}
