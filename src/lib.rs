//! pipeline-rewrite - a conversion chain for Drone pipeline definitions
//!
//! Pipeline definitions pass through an ordered chain of rules that inject
//! cache steps, skip stages no changed file is relevant to, and expand
//! deploy declarations. The same chain composer also serves admission and
//! secret lookup plugins.

pub mod chain;
pub mod changes;
pub mod cli;
pub mod config;
pub mod core;
pub mod plugin;
pub mod rules;

// Re-export commonly used types
pub use chain::{Admit, Capability, Chain, Convert, Find, Outcome, Participant, PluginError};
pub use changes::{ChangeSetError, ChangeSetProvider, GithubClient, StaticChangeSet};
pub use config::{ConfigError, Settings};
pub use crate::core::{Document, DocumentError};
pub use plugin::{ConvertRequest, PluginContext, RuleEvent};
pub use rules::{conversion_chain, CacheRule, DeployRule, PathFilterRule};
