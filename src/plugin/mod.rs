//! Plugin contract: payloads, the per-call context and its events

pub mod events;
pub mod request;

pub use events::{EventHandler, PluginContext, RuleEvent};
pub use request::{
    AdmissionRequest, Build, Config, ConvertRequest, Repo, Secret, SecretRequest, User,
};
