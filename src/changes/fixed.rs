//! Change set known up front

use crate::changes::{ChangeSetError, ChangeSetProvider};
use async_trait::async_trait;

/// Answers every lookup with the same file list
///
/// Used when the caller already knows what changed (local runs, replays).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticChangeSet {
    files: Vec<String>,
}

impl StaticChangeSet {
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }
}

#[async_trait]
impl ChangeSetProvider for StaticChangeSet {
    async fn get_commit(
        &self,
        _owner: &str,
        _repo: &str,
        _sha: &str,
    ) -> Result<Vec<String>, ChangeSetError> {
        Ok(self.files.clone())
    }

    async fn compare_commits(
        &self,
        _owner: &str,
        _repo: &str,
        _base: &str,
        _head: &str,
    ) -> Result<Vec<String>, ChangeSetError> {
        Ok(self.files.clone())
    }
}
