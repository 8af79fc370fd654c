use git2::build::RepoBuilder;
use git2::{AutotagOption, FetchOptions, Repository};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// How a repository is cloned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOptions {
    /// History depth to fetch; 0 fetches everything
    pub depth: i32,
    /// Restrict the clone to this branch
    pub branch: Option<String>,
    pub fetch_tags: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            depth: 1,
            branch: None,
            fetch_tags: false,
        }
    }
}

/// Short repository name from a clone URL: last path segment without `.git`
pub fn repository_name(url: &str) -> Option<String> {
    let segment = url.trim_end_matches('/').rsplit('/').next()?;
    let name = segment.strip_suffix(".git").unwrap_or(segment);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Clone `url` into `dest`, shallow by default
pub fn clone_repository(url: &str, dest: &Path, options: &CloneOptions) -> Result<Repository, git2::Error> {
    let mut fetch = FetchOptions::new();
    if options.depth > 0 {
        fetch.depth(options.depth);
    }
    if !options.fetch_tags {
        fetch.download_tags(AutotagOption::None);
    }

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch);

    if let Some(branch) = options.branch.clone() {
        builder.branch(&branch);
        builder.remote_create(move |repo, name, url| {
            let refspec = format!("+refs/heads/{0}:refs/remotes/{1}/{0}", branch, name);
            repo.remote_with_fetch(name, url, &refspec)
        });
    }

    builder.clone(url, dest)
}

/// Remove a directory tree, clearing read-only flags and retrying once if
/// the first attempt fails. A missing directory is not an error.
#[allow(clippy::permissions_set_readonly_false)]
pub fn remove_dir_forced(path: &Path) -> io::Result<()> {
    if !path.exists() {
        return Ok(());
    }

    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(first) => {
            log::debug!(
                "Removing {} failed ({}), clearing read-only flags",
                path.display(),
                first
            );
            for entry in WalkDir::new(path).into_iter().flatten() {
                if let Ok(metadata) = entry.metadata() {
                    let mut permissions = metadata.permissions();
                    if permissions.readonly() {
                        permissions.set_readonly(false);
                        let _ = fs::set_permissions(entry.path(), permissions);
                    }
                }
            }
            fs::remove_dir_all(path)
        }
    }
}
