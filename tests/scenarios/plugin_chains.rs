//! Test: admission and secret chains built from the same composer

use async_trait::async_trait;
use pipeline_rewrite::plugin::{AdmissionRequest, Secret, SecretRequest, User};
use pipeline_rewrite::{Admit, Chain, Find, Outcome, Participant, PluginContext, PluginError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Admits members of an organization, declining everyone else
struct OrgMembers {
    members: Vec<&'static str>,
}

#[async_trait]
impl Participant<Admit> for OrgMembers {
    async fn apply(&self, _cx: &PluginContext, request: &AdmissionRequest) -> Outcome<User> {
        if self.members.contains(&request.user.login.as_str()) {
            Outcome::Produced(request.user.clone())
        } else {
            Outcome::Declined
        }
    }
}

/// Marks admitted users active
struct Activate;

#[async_trait]
impl Participant<Admit> for Activate {
    async fn apply(&self, _cx: &PluginContext, request: &AdmissionRequest) -> Outcome<User> {
        Outcome::Produced(User {
            active: true,
            ..request.user.clone()
        })
    }
}

/// Secret store backed by a map, counting lookups
struct Store {
    secrets: HashMap<&'static str, &'static str>,
    lookups: Arc<AtomicUsize>,
}

#[async_trait]
impl Participant<Find> for Store {
    async fn apply(&self, _cx: &PluginContext, request: &SecretRequest) -> Outcome<Secret> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match self.secrets.get(request.name.as_str()) {
            Some(data) => Outcome::Produced(Secret {
                name: request.name.clone(),
                data: data.to_string(),
                ..Default::default()
            }),
            None => Outcome::Declined,
        }
    }
}

struct Unavailable;

#[async_trait]
impl Participant<Find> for Unavailable {
    async fn apply(&self, _cx: &PluginContext, _request: &SecretRequest) -> Outcome<Secret> {
        Outcome::Failed(PluginError::Internal("store unavailable".to_string()))
    }
}

fn admission(login: &str) -> AdmissionRequest {
    AdmissionRequest {
        event: "login".to_string(),
        user: User {
            login: login.to_string(),
            ..Default::default()
        },
    }
}

fn lookup(name: &str) -> SecretRequest {
    SecretRequest {
        name: name.to_string(),
        path: "drone".to_string(),
        ..Default::default()
    }
}

fn store(secrets: &[(&'static str, &'static str)], lookups: &Arc<AtomicUsize>) -> Store {
    Store {
        secrets: secrets.iter().copied().collect(),
        lookups: lookups.clone(),
    }
}

#[tokio::test]
async fn test_admission_threads_the_user() {
    let chain = Chain::<Admit>::new()
        .with(OrgMembers {
            members: vec!["octocat"],
        })
        .with(Activate);
    let cx = PluginContext::new();

    let user = chain.apply(&cx, admission("octocat")).await.unwrap().unwrap();
    assert_eq!(user.login, "octocat");
    assert!(user.active);

    assert!(chain.apply(&cx, admission("mallory")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_first_store_with_the_secret_wins() {
    let lookups = Arc::new(AtomicUsize::new(0));
    let chain = Chain::<Find>::new()
        .with(store(&[("token", "primary")], &lookups))
        .with(store(&[("token", "fallback"), ("bucket", "s3://cache")], &lookups))
        .with(Unavailable);
    let cx = PluginContext::new();

    let secret = chain.apply(&cx, lookup("token")).await.unwrap().unwrap();
    assert_eq!(secret.data, "primary");
    assert_eq!(lookups.load(Ordering::SeqCst), 1);

    let secret = chain.apply(&cx, lookup("bucket")).await.unwrap().unwrap();
    assert_eq!(secret.data, "s3://cache");
    assert_eq!(lookups.load(Ordering::SeqCst), 3);

    let err = chain.apply(&cx, lookup("missing")).await.unwrap_err();
    assert!(err.to_string().contains("store unavailable"));
}

#[tokio::test]
async fn test_nested_secret_chains() {
    let lookups = Arc::new(AtomicUsize::new(0));
    let inner = Chain::<Find>::new().with(store(&[], &lookups));
    let chain = Chain::<Find>::new()
        .with(inner)
        .with(store(&[("token", "outer")], &lookups));

    let secret = chain
        .apply(&PluginContext::new(), lookup("token"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(secret.data, "outer");
    assert_eq!(lookups.load(Ordering::SeqCst), 2);

    assert!(Chain::<Find>::new()
        .apply(&PluginContext::new(), lookup("token"))
        .await
        .unwrap()
        .is_none());
}
