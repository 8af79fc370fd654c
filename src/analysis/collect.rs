use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task::spawn_blocking;

use crate::analysis::ck::CkRunner;
use crate::analysis::git::{clone_repository, remove_dir_forced, repository_name, CloneOptions};
use crate::dataset::load_repositories;
use crate::error::{CollectError, CollectResult};
use crate::types::CollectionSummary;

/// Where clones and CK reports go, and how each repository is processed
#[derive(Debug, Clone)]
pub struct Collector {
    pub clone_root: PathBuf,
    pub metrics_root: PathBuf,
    pub clone_options: CloneOptions,
    pub ck: CkRunner,
}

impl Collector {
    pub fn clone_path(&self, name: &str) -> PathBuf {
        self.clone_root.join(name)
    }

    /// Directory dedicated to one repository's reports
    pub fn output_dir(&self, name: &str) -> PathBuf {
        self.metrics_root.join(name)
    }

    /// Prefix handed to CK, so its class report lands at
    /// `<metrics_root>/<name>/<name>class.csv`
    pub fn output_prefix(&self, name: &str) -> PathBuf {
        self.output_dir(name).join(name)
    }

    /// Clone, analyse and clean up one repository.
    ///
    /// The clone directory is removed before returning whether or not the
    /// clone or the analysis succeeded. Returns the repository short name.
    pub async fn collect_repository(&self, url: &str) -> CollectResult<String> {
        let name = repository_name(url).ok_or_else(|| CollectError::InvalidUrl(url.to_string()))?;
        let clone_path = self.clone_path(&name);

        log::info!("--- Processing: {} ---", name);

        if clone_path.exists() {
            log::warn!("Removing stale clone at {}", clone_path.display());
            remove_blocking(clone_path.clone()).await?;
        }

        let result = self.clone_and_analyze(url, &name, &clone_path).await;

        let cleanup = remove_blocking(clone_path.clone()).await;
        match &cleanup {
            Ok(()) => log::debug!("Removed clone {}", clone_path.display()),
            Err(e) => log::error!("Could not remove clone {}: {}", clone_path.display(), e),
        }

        result?;
        cleanup?;
        log::info!("Finished: {}", name);
        Ok(name)
    }

    async fn clone_and_analyze(&self, url: &str, name: &str, clone_path: &Path) -> CollectResult<()> {
        let started = Instant::now();
        {
            let url = url.to_string();
            let dest = clone_path.to_path_buf();
            let options = self.clone_options.clone();
            spawn_blocking(move || clone_repository(&url, &dest, &options).map(|_| ())).await??;
        }
        log::info!("Cloned {} in {:.2}s", name, started.elapsed().as_secs_f64());

        let output_dir = self.output_dir(name);
        fs::create_dir_all(&output_dir).map_err(|e| CollectError::io(&output_dir, e))?;

        let started = Instant::now();
        let output = self.ck.run(clone_path, &self.output_prefix(name)).await?;
        if !output.stderr.trim().is_empty() {
            log::debug!("CK stderr for {}: {}", name, output.stderr.trim());
        }
        log::info!(
            "Analysed {} in {:.2}s, reports in {}",
            name,
            started.elapsed().as_secs_f64(),
            output_dir.display()
        );
        Ok(())
    }

    /// Process every URL in order. A failing repository is logged and
    /// recorded, and the batch moves on.
    pub async fn collect_all<I, S>(&self, urls: I) -> CollectionSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = CollectionSummary::default();

        for url in urls {
            let url = url.as_ref();
            summary.processed += 1;
            match self.collect_repository(url).await {
                Ok(name) => summary.succeeded.push(name),
                Err(e) => {
                    log::error!("Error processing {}: {}", url, e);
                    summary.failed.push((url.to_string(), e.to_string()));
                }
            }
        }

        summary
    }

    /// Run collection over the `url` column of a discovery CSV.
    ///
    /// Fails before touching any repository when the CK jar or the CSV is
    /// missing. `limit` restricts the run to the first rows.
    pub async fn run_collection(&self, repositories_csv: &Path, limit: Option<usize>) -> CollectResult<CollectionSummary> {
        if !self.ck.jar_exists() {
            return Err(CollectError::MissingJar(self.ck.jar.clone()));
        }
        let records = load_repositories(repositories_csv)?;

        for dir in [&self.clone_root, &self.metrics_root] {
            fs::create_dir_all(dir).map_err(|e| CollectError::io(dir, e))?;
        }

        let take = limit.unwrap_or(records.len());
        log::info!(
            "Collecting metrics for {} of {} repositories",
            take.min(records.len()),
            records.len()
        );

        let summary = self
            .collect_all(records.iter().take(take).map(|record| record.url.as_str()))
            .await;

        log::info!(
            "Collection finished: {} processed, {} succeeded, {} failed",
            summary.processed,
            summary.succeeded.len(),
            summary.failed.len()
        );
        Ok(summary)
    }
}

async fn remove_blocking(path: PathBuf) -> CollectResult<()> {
    let target = path.clone();
    spawn_blocking(move || remove_dir_forced(&target))
        .await?
        .map_err(|e| CollectError::io(path, e))
}
