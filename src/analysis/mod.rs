pub mod aggregate;
pub mod ck;
pub mod collect;
pub mod correlation;
pub mod descriptive;
pub mod git;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate_directory, save_ck_metrics};
pub use ck::CkRunner;
pub use collect::Collector;
pub use correlation::{spearman, Correlation};
pub use descriptive::{describe, Summary};
pub use git::{clone_repository, remove_dir_forced, repository_name, CloneOptions};
