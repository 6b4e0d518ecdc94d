//! Change sets: which files a build touched

pub mod github;
pub mod fixed;

pub use fixed::StaticChangeSet;
pub use github::GithubClient;

use crate::plugin::{Build, Repo};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Error types for change set lookups
#[derive(Debug, Error)]
pub enum ChangeSetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Trait for change set lookups - allows for different implementations
#[async_trait]
pub trait ChangeSetProvider: Send + Sync {
    /// Files changed by a single commit
    async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<String>, ChangeSetError>;

    /// Files changed between two commits
    async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>, ChangeSetError>;
}

#[async_trait]
impl<T: ChangeSetProvider + ?Sized> ChangeSetProvider for Arc<T> {
    async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<String>, ChangeSetError> {
        (**self).get_commit(owner, repo, sha).await
    }

    async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>, ChangeSetError> {
        (**self).compare_commits(owner, repo, base, head).await
    }
}

/// Files changed by the build: the pushed commit alone on a first push,
/// otherwise everything between `before` and `after`
pub async fn changed_files<C>(
    provider: &C,
    build: &Build,
    repo: &Repo,
) -> Result<Vec<String>, ChangeSetError>
where
    C: ChangeSetProvider + ?Sized,
{
    if build.is_first_commit() {
        debug!(sha = %build.after, "listing files of a single commit");
        provider
            .get_commit(&repo.namespace, &repo.name, &build.after)
            .await
    } else {
        debug!(base = %build.before, head = %build.after, "comparing commits");
        provider
            .compare_commits(&repo.namespace, &repo.name, &build.before, &build.after)
            .await
    }
}
