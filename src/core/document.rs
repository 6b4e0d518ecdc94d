//! Pipeline document model

use crate::core::condition::ConditionSet;
use crate::core::record::{Fields, Open};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Kind of document the rewrite rules operate on
pub const PIPELINE_KIND: &str = "pipeline";

/// Kind of a standalone secret declaration
pub const SECRET_KIND: &str = "secret";

/// Known keys of a document in the stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentFields {
    /// Document name (not required to be unique)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Document kind (`pipeline`, `secret`, ...)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// Pipeline steps
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,

    /// Pipeline volumes, kept opaque
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Value>,

    /// Cache declarations, consumed by the cache rule
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cache: Vec<CacheSpec>,

    /// Deploy declaration, consumed by the deploy rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy: Option<DeploySpec>,

    /// Pipeline-level trigger conditions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<ConditionSet>,
}

impl Fields for DocumentFields {
    const NAMES: &'static [&'static str] = &[
        "name", "kind", "steps", "volumes", "cache", "deploy", "trigger",
    ];
}

/// One document of a pipeline definition stream
pub type Document = Open<DocumentFields>;

impl Open<DocumentFields> {
    /// An empty pipeline document
    pub fn pipeline(name: impl Into<String>) -> Self {
        Open::new(DocumentFields {
            name: name.into(),
            kind: PIPELINE_KIND.to_string(),
            ..Default::default()
        })
    }

    /// Only pipeline documents take part in rewriting
    pub fn is_pipeline(&self) -> bool {
        self.kind == PIPELINE_KIND
    }
}

/// Known keys of a pipeline step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepFields {
    /// Step-level conditions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<ConditionSet>,
}

impl Fields for StepFields {
    const NAMES: &'static [&'static str] = &["when"];
}

/// A pipeline step: conditions plus everything else (`name`, `image`, ...)
pub type Step = Open<StepFields>;

impl Open<StepFields> {
    /// A step carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        Open::new(StepFields::default()).with_attr("name", name.into())
    }

    pub fn name(&self) -> Option<&str> {
        self.attr("name").and_then(Value::as_str)
    }
}

/// A directory to cache between builds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSpec {
    /// File used to build the cache key
    pub hash: String,

    /// Location to cache
    pub path: String,

    /// How long the cache is kept, in days
    pub ttl: i64,
}

/// Deployment of the pipeline's image through terraform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploySpec {
    pub repo: String,
    pub registry: String,
    pub terraform: String,
    pub region: String,
}
