//! Path filter rule: skips stages and steps no changed file is relevant to
//!
//! A skip is expressed by rewriting the block's `event` condition to
//! exclude every event, leaving the rest of the condition intact.

use crate::chain::{Convert, Outcome, Participant};
use crate::changes::{changed_files, ChangeSetProvider};
use crate::core::{ConditionSet, Document};
use crate::plugin::{Config, ConvertRequest, PluginContext, RuleEvent};
use async_trait::async_trait;
use tracing::debug;

pub const NAME: &str = "paths";

/// Skips pipelines and steps whose path conditions match no changed file
pub struct PathFilterRule<C> {
    provider: C,
}

impl<C: ChangeSetProvider> PathFilterRule<C> {
    pub fn new(provider: C) -> Self {
        Self { provider }
    }
}

fn constrained(conditions: &Option<ConditionSet>) -> bool {
    conditions
        .as_ref()
        .is_some_and(|set| !set.paths.is_unconstrained())
}

/// Whether any pipeline or step declares path patterns at all
pub fn should_get_files(documents: &[Document]) -> bool {
    documents
        .iter()
        .filter(|document| document.is_pipeline())
        .any(|document| {
            constrained(&document.trigger)
                || document.steps.iter().any(|step| constrained(&step.when))
        })
}

/// Force a skip on a condition set unless a changed file satisfies it
///
/// Returns whether the set was rewritten.
fn skip_unless_matched(conditions: &mut Option<ConditionSet>, files: &[String]) -> bool {
    let Some(set) = conditions
        .as_mut()
        .filter(|set| !set.paths.is_unconstrained())
    else {
        return false;
    };
    if set.matches_any(files) {
        return false;
    }
    set.exclude_all_events();
    true
}

/// Apply the changed files to a pipeline and its steps
///
/// Pipeline and step conditions are evaluated independently. Returns
/// whether anything was rewritten.
pub fn update(document: &mut Document, files: &[String]) -> bool {
    if !document.is_pipeline() {
        return false;
    }

    let mut updated = skip_unless_matched(&mut document.trigger, files);
    for step in document.steps.iter_mut() {
        updated |= skip_unless_matched(&mut step.when, files);
    }
    updated
}

#[async_trait]
impl<C: ChangeSetProvider> Participant<Convert> for PathFilterRule<C> {
    async fn apply(&self, cx: &PluginContext, request: &ConvertRequest) -> Outcome<Config> {
        let mut documents = match super::decode(request) {
            Ok(documents) => documents,
            Err(err) => return super::decline(NAME, cx, request, err),
        };

        if !should_get_files(&documents) {
            debug!(
                build_id = request.build.id,
                "no path conditions, change set not needed"
            );
            cx.emit(RuleEvent::ChangeSetSkipped);
            return Outcome::Produced(request.config.clone());
        }

        let files = match changed_files(&self.provider, &request.build, &request.repo).await {
            Ok(files) => files,
            Err(err) => return super::decline(NAME, cx, request, err),
        };
        cx.emit(RuleEvent::ChangeSetFetched { files: files.len() });

        for document in documents.iter_mut() {
            if update(document, &files) {
                super::report_rewrite(NAME, cx, request, document);
            }
        }

        super::encode(NAME, cx, request, &documents)
    }
}
