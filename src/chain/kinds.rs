//! The three plugin families that share the chain protocol

use crate::chain::Capability;
use crate::plugin::{AdmissionRequest, Config, ConvertRequest, Secret, SecretRequest, User};
use std::ops::ControlFlow;

/// Pipeline rewrites: each stage rewrites the previous stage's output
#[derive(Debug, Clone, Copy)]
pub struct Convert;

impl Capability for Convert {
    type Request = ConvertRequest;
    type Output = Config;

    const DECLINE_ENDS_CHAIN: bool = true;

    fn fold(request: &mut ConvertRequest, output: Config) -> ControlFlow<Config> {
        request.config = output;
        ControlFlow::Continue(())
    }

    fn finish(request: ConvertRequest) -> Option<Config> {
        Some(request.config)
    }
}

/// Access decisions: each stage vouches for the user the previous one admitted
#[derive(Debug, Clone, Copy)]
pub struct Admit;

impl Capability for Admit {
    type Request = AdmissionRequest;
    type Output = User;

    const DECLINE_ENDS_CHAIN: bool = true;

    fn fold(request: &mut AdmissionRequest, output: User) -> ControlFlow<User> {
        request.user = output;
        ControlFlow::Continue(())
    }

    fn finish(request: AdmissionRequest) -> Option<User> {
        Some(request.user)
    }
}

/// Secret lookups: the first backend that knows the secret answers
#[derive(Debug, Clone, Copy)]
pub struct Find;

impl Capability for Find {
    type Request = SecretRequest;
    type Output = Secret;

    const DECLINE_ENDS_CHAIN: bool = false;

    fn fold(_request: &mut SecretRequest, output: Secret) -> ControlFlow<Secret> {
        ControlFlow::Break(output)
    }

    fn finish(_request: SecretRequest) -> Option<Secret> {
        None
    }
}
