//! Request and response payloads exchanged with the CI server

use serde::{Deserialize, Serialize};

/// Sha the CI server sends as `before` for a branch's first push
pub const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

/// Build that triggered the request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Build {
    pub id: i64,
    pub number: i64,
    pub parent: i64,
    pub event: String,
    pub action: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub trigger: String,

    /// Commit before the push (empty or all zeros when there is none)
    pub before: String,

    /// Commit being built
    pub after: String,
}

impl Build {
    /// The push has no parent commit to compare against
    pub fn is_first_commit(&self) -> bool {
        self.before.is_empty() || self.before == ZERO_SHA
    }
}

/// Repository the build belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repo {
    pub id: i64,
    pub namespace: String,
    pub name: String,
    pub slug: String,

    /// Path of the pipeline definition inside the repository
    pub config: String,
}

/// Raw pipeline definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: String,
}

/// Conversion request: rewrite `config` for this build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertRequest {
    pub build: Build,
    pub repo: Repo,
    pub config: Config,
}

/// Account asking to be admitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub machine: bool,
    pub admin: bool,
    pub active: bool,
}

/// Admission request: decide whether (and as whom) a user gets in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionRequest {
    pub event: String,
    pub user: User,
}

/// A resolved secret value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Secret {
    pub name: String,
    pub data: String,

    /// Available to image pulls
    pub pull: bool,

    /// Available to builds from forks
    pub fork: bool,
}

/// Secret lookup: find `name` under `path` for this build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretRequest {
    pub path: String,
    pub name: String,
    pub build: Build,
    pub repo: Repo,
}
