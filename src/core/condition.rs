//! Path conditions attached to pipelines (`trigger`) and steps (`when`)

use crate::core::record::{mapping, sequence, Fields, Open};
use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::debug;

/// `*` stays inside one path segment, `**` spans directories
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Include/exclude glob lists matched against a changed file path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
}

impl Condition {
    pub fn has_includes(&self) -> bool {
        !self.include.is_empty()
    }

    pub fn has_excludes(&self) -> bool {
        !self.exclude.is_empty()
    }

    /// No patterns at all: the condition places no constraint on paths
    pub fn is_unconstrained(&self) -> bool {
        !self.has_includes() && !self.has_excludes()
    }

    /// Check a path against the condition
    ///
    /// An exclude hit always wins. Otherwise an include hit matches, and an
    /// empty include list matches everything.
    pub fn matches(&self, path: &str) -> bool {
        if self.excludes(path) {
            return false;
        }
        if self.includes(path) {
            return true;
        }
        self.include.is_empty()
    }

    fn includes(&self, path: &str) -> bool {
        self.include.iter().any(|pattern| glob_matches(pattern, path))
    }

    fn excludes(&self, path: &str) -> bool {
        self.exclude.iter().any(|pattern| glob_matches(pattern, path))
    }
}

fn glob_matches(pattern: &str, path: &str) -> bool {
    match Pattern::new(pattern) {
        Ok(compiled) => compiled.matches_with(path, MATCH_OPTIONS),
        Err(err) => {
            debug!(pattern, error = %err, "ignoring invalid path pattern");
            false
        }
    }
}

/// Known keys of a condition set; everything else (`event`, `branch`, ...)
/// stays in the overflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionFields {
    #[serde(skip_serializing_if = "Condition::is_unconstrained")]
    pub paths: Condition,
}

impl Fields for ConditionFields {
    const NAMES: &'static [&'static str] = &["paths"];
}

/// A `trigger` or `when` block
pub type ConditionSet = Open<ConditionFields>;

impl Open<ConditionFields> {
    /// Rewrite the `event` condition so nothing can ever trigger this block
    pub fn exclude_all_events(&mut self) {
        self.attrs.insert(
            Value::from("event"),
            mapping([("exclude", sequence(["*"]))]),
        );
    }

    /// Whether any of the changed files satisfies the path condition
    pub fn matches_any(&self, files: &[String]) -> bool {
        files.iter().any(|file| self.paths.matches(file))
    }
}
