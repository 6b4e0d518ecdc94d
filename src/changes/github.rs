//! GitHub REST client for change sets

use crate::changes::{ChangeSetError, ChangeSetProvider};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default API root; GitHub Enterprise installs use `https://<host>/api/v3/`
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/";

const USER_AGENT: &str = concat!("pipeline-rewrite/", env!("CARGO_PKG_VERSION"));
const MEDIA_TYPE: &str = "application/vnd.github+json";

/// Looks up changed files through the GitHub commits and compare APIs
#[derive(Debug, Clone)]
pub struct GithubClient {
    /// API root, without trailing slash
    endpoint: String,

    /// Personal access or installation token
    token: Option<String>,

    /// Shared HTTP client with connection pooling
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<CommitFile>,
}

#[derive(Debug, Deserialize)]
struct CommitFile {
    filename: String,
}

impl GithubClient {
    pub fn new(
        endpoint: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ChangeSetError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn commit_url(&self, owner: &str, repo: &str, sha: &str) -> String {
        format!("{}/repos/{}/{}/commits/{}", self.endpoint, owner, repo, sha)
    }

    fn compare_url(&self, owner: &str, repo: &str, base: &str, head: &str) -> String {
        format!(
            "{}/repos/{}/{}/compare/{}...{}",
            self.endpoint, owner, repo, base, head
        )
    }

    async fn fetch_files(&self, url: &str) -> Result<Vec<String>, ChangeSetError> {
        debug!(url, "requesting change set");

        let mut request = self.http_client.get(url).header(ACCEPT, MEDIA_TYPE);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChangeSetError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: FileList = response.json().await?;
        Ok(body.files.into_iter().map(|file| file.filename).collect())
    }
}

#[async_trait]
impl ChangeSetProvider for GithubClient {
    async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<String>, ChangeSetError> {
        self.fetch_files(&self.commit_url(owner, repo, sha)).await
    }

    async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>, ChangeSetError> {
        self.fetch_files(&self.compare_url(owner, repo, base, head))
            .await
    }
}
