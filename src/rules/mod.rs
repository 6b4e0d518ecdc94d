//! Conversion rules
//!
//! Each rule decodes the whole document stream, rewrites it and encodes it
//! again, so the next rule in the chain sees a plain pipeline definition.
//! A rule that cannot decode, encode or gather what it needs declines: the
//! chain then yields no result and the caller keeps the original pipeline.

pub mod cache;
pub mod deploy;
pub mod paths;

pub use cache::CacheRule;
pub use deploy::DeployRule;
pub use paths::PathFilterRule;

use crate::chain::{Chain, Convert, Outcome};
use crate::changes::ChangeSetProvider;
use crate::core::{codec, Document, DocumentError};
use crate::plugin::{Config, ConvertRequest, PluginContext, RuleEvent};
use std::fmt::Display;
use tracing::{debug, error};

/// The standard conversion chain: caching, then path filtering, then deploy
pub fn conversion_chain<C>(provider: C) -> Chain<Convert>
where
    C: ChangeSetProvider + 'static,
{
    Chain::new()
        .with(CacheRule::new())
        .with(PathFilterRule::new(provider))
        .with(DeployRule::new())
}

fn decode(request: &ConvertRequest) -> Result<Vec<Document>, DocumentError> {
    codec::parse(&request.config.data)
}

fn encode(
    rule: &'static str,
    cx: &PluginContext,
    request: &ConvertRequest,
    documents: &[Document],
) -> Outcome<Config> {
    match codec::serialize(documents) {
        Ok(data) => Outcome::Produced(Config { data }),
        Err(err) => decline(rule, cx, request, err),
    }
}

/// Log the failure, report it on the context and produce no result
fn decline<T>(
    rule: &'static str,
    cx: &PluginContext,
    request: &ConvertRequest,
    error: impl Display,
) -> Outcome<T> {
    error!(
        rule,
        build_id = request.build.id,
        repo_namespace = %request.repo.namespace,
        repo_name = %request.repo.name,
        "{}",
        error
    );
    cx.emit(RuleEvent::Failed {
        rule,
        error: error.to_string(),
    });
    Outcome::Declined
}

fn report_rewrite(rule: &'static str, cx: &PluginContext, request: &ConvertRequest, document: &Document) {
    debug!(
        rule,
        build_id = request.build.id,
        repo_namespace = %request.repo.namespace,
        repo_name = %request.repo.name,
        stage_name = %document.name,
        "rewrote stage"
    );
    cx.emit(RuleEvent::DocumentRewritten {
        rule,
        document: document.name.clone(),
    });
}
