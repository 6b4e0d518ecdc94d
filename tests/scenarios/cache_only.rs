//! Test: cache rule on its own

use crate::helpers::*;
use pipeline_rewrite::{CacheRule, Chain, Convert};

fn cache_chain() -> Chain<Convert> {
    Chain::new().with(CacheRule::new())
}

/// A pipeline with one cache declaration and no steps
#[tokio::test]
async fn test_single_cache_declaration() {
    let yaml = r#"
kind: pipeline
name: default
cache:
  - hash: a
    path: /cache
    ttl: 0
"#;

    let recorder = EventRecorder::default();
    let output = run_chain(&cache_chain(), &recorder, request(yaml, BEFORE))
        .await
        .unwrap();

    let expected = r#"
kind: pipeline
name: default
steps:
  - name: Restore /cache
    image: andrewstucki/s3-cache
    settings:
      pull: true
      restore: true
      hash: a
      root: {from_secret: cache_bucket}
      access_key: {from_secret: cache_access_key}
      secret_key: {from_secret: cache_secret_key}
  - name: Uploading /cache
    image: andrewstucki/s3-cache
    settings:
      pull: true
      rebuild: true
      hash: a
      mount: [/cache]
      root: {from_secret: cache_bucket}
      access_key: {from_secret: cache_access_key}
      secret_key: {from_secret: cache_secret_key}
  - name: Setting TTL for /cache
    image: andrewstucki/s3-cache
    settings:
      pull: true
      flush: true
      hash: a
      flush_age: 5
      root: {from_secret: cache_bucket}
      access_key: {from_secret: cache_access_key}
      secret_key: {from_secret: cache_secret_key}
---
kind: secret
name: cache_access_key
get:
  path: drone
  name: cache-access-key
---
kind: secret
name: cache_secret_key
get:
  path: drone
  name: cache-secret-key
---
kind: secret
name: cache_bucket
get:
  path: drone
  name: cache-bucket
"#;

    assert_same_yaml(&output, expected);
    assert_eq!(recorder.rewritten("cache"), vec!["default"]);
}

/// Applying the rule twice appends the secret documents twice
#[tokio::test]
async fn test_secrets_appended_on_every_pass() {
    let yaml = "kind: pipeline\nname: default\nsteps:\n  - name: build\n    image: rust\n";

    let chain = Chain::<Convert>::new().with(CacheRule::new()).with(CacheRule::new());
    let recorder = EventRecorder::default();
    let output = run_chain(&chain, &recorder, request(yaml, BEFORE))
        .await
        .unwrap();

    let documents = yaml_documents(&output);
    assert_eq!(documents.len(), 7);
    assert_eq!(step_names(&documents[0]), vec!["build"]);
    assert!(recorder.rewritten("cache").is_empty());
}

/// Unknown keys and their order survive the rewrite
#[tokio::test]
async fn test_unknown_keys_are_preserved() {
    let yaml = r#"kind: pipeline
type: docker
name: default
platform:
  os: linux
  arch: arm64
steps:
- name: build
  image: rust:1.80
  commands:
  - cargo build --release
  depends_on: []
node:
  pool: large
"#;

    let recorder = EventRecorder::default();
    let output = run_chain(&cache_chain(), &recorder, request(yaml, BEFORE))
        .await
        .unwrap();

    let first = output.split("---\n").next().unwrap();
    assert_same_yaml(first, yaml);

    let keys: Vec<_> = first
        .lines()
        .filter(|line| !line.starts_with(&[' ', '-'][..]))
        .filter_map(|line| line.split(':').next())
        .collect();
    assert_eq!(keys, vec!["kind", "type", "name", "platform", "steps", "node"]);
}

/// A malformed stream yields no result instead of an error
#[tokio::test]
async fn test_malformed_stream_yields_no_result() {
    let recorder = EventRecorder::default();
    let output = run_chain(&cache_chain(), &recorder, request("- just\n- a list\n", BEFORE)).await;

    assert!(output.is_none());
    assert_eq!(recorder.failures(), 1);
}
