//! Chain composer
//!
//! Conversion rules, admission plugins and secret plugins are all chained the
//! same way: participants run in order, each one may produce a result,
//! decline, or fail. A [`Capability`] describes how one plugin family reacts
//! to those outcomes; [`Chain`] runs the loop once for all of them.

pub mod kinds;

pub use kinds::{Admit, Convert, Find};

use crate::plugin::PluginContext;
use async_trait::async_trait;
use std::ops::ControlFlow;
use thiserror::Error;

/// Hard failure of a chain participant
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// What a participant made of a request
#[derive(Debug)]
pub enum Outcome<T> {
    /// A result for the next stage (or the caller)
    Produced(T),
    /// No opinion; the capability decides whether the chain goes on
    Declined,
    /// Abort the chain and report the error
    Failed(PluginError),
}

impl<T> From<Result<Option<T>, PluginError>> for Outcome<T> {
    fn from(result: Result<Option<T>, PluginError>) -> Self {
        match result {
            Ok(Some(value)) => Outcome::Produced(value),
            Ok(None) => Outcome::Declined,
            Err(err) => Outcome::Failed(err),
        }
    }
}

/// One plugin family sharing the chain protocol
pub trait Capability: Send + Sync + 'static {
    type Request: Clone + Send + Sync;
    type Output: Send;

    /// Whether a declining participant ends the chain (otherwise the next
    /// participant is asked)
    const DECLINE_ENDS_CHAIN: bool;

    /// Fold a produced output into the request seen by the next stage, or
    /// break out of the chain with it
    fn fold(request: &mut Self::Request, output: Self::Output) -> ControlFlow<Self::Output>;

    /// Result once every participant has run without breaking out
    fn finish(request: Self::Request) -> Option<Self::Output>;
}

/// Trait for chain participants of one capability
#[async_trait]
pub trait Participant<K: Capability>: Send + Sync {
    async fn apply(&self, cx: &PluginContext, request: &K::Request) -> Outcome<K::Output>;
}

/// Ordered participants of one capability
pub struct Chain<K: Capability> {
    participants: Vec<Box<dyn Participant<K>>>,
}

impl<K: Capability> Chain<K> {
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
        }
    }

    /// Append a participant to the end of the chain
    pub fn with<P>(mut self, participant: P) -> Self
    where
        P: Participant<K> + 'static,
    {
        self.participants.push(Box::new(participant));
        self
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Run the participants in order
    ///
    /// `Ok(None)` means the chain produced nothing: a participant declined a
    /// chain that stops on decline, or a first-match chain found nothing.
    pub async fn apply(
        &self,
        cx: &PluginContext,
        mut request: K::Request,
    ) -> Result<Option<K::Output>, PluginError> {
        for participant in &self.participants {
            match participant.apply(cx, &request).await {
                Outcome::Failed(err) => return Err(err),
                Outcome::Declined if K::DECLINE_ENDS_CHAIN => return Ok(None),
                Outcome::Declined => continue,
                Outcome::Produced(output) => {
                    if let ControlFlow::Break(output) = K::fold(&mut request, output) {
                        return Ok(Some(output));
                    }
                }
            }
        }

        Ok(K::finish(request))
    }
}

impl<K: Capability> Default for Chain<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// A chain is itself a participant, so chains nest
#[async_trait]
impl<K: Capability> Participant<K> for Chain<K> {
    async fn apply(&self, cx: &PluginContext, request: &K::Request) -> Outcome<K::Output> {
        Chain::<K>::apply(self, cx, request.clone()).await.into()
    }
}
