//! Test: cache, path filter and deploy rules chained together

use crate::helpers::*;
use pipeline_rewrite::conversion_chain;
use std::sync::atomic::Ordering;

const PIPELINE: &str = r#"
kind: pipeline
type: docker
name: default
platform:
  os: linux
steps:
  - name: test
    image: golang:1.21
    commands:
      - go test ./...
    when:
      paths:
        include: ["**/*.go", "go.sum"]
  - name: docs
    image: node
    commands:
      - yarn docs
    when:
      branch: [main]
      paths:
        include: ["docs/**"]
cache:
  - hash: go.sum
    path: /go/pkg/mod
trigger:
  branch: [main]
deploy:
  repo: hello-world
  registry: 1234.dkr.ecr.us-east-1.amazonaws.com
"#;

#[tokio::test]
async fn test_full_chain() {
    let provider = MockChangeSet::with_files(&["cmd/server/main.go"]);
    let recorder = EventRecorder::default();
    let output = run_chain(&conversion_chain(provider.clone()), &recorder, request(PIPELINE, BEFORE))
        .await
        .unwrap();

    let documents = yaml_documents(&output);
    let names: Vec<_> = documents.iter().filter_map(|d| d["name"].as_str()).collect();
    assert_eq!(
        names,
        vec![
            "default",
            "cache_access_key",
            "cache_secret_key",
            "cache_bucket",
            "deploy_access_key",
            "deploy_secret_key",
        ]
    );

    let pipeline = &documents[0];
    assert_eq!(
        step_names(pipeline),
        vec![
            "Restore /go/pkg/mod",
            "test",
            "docs",
            "Uploading /go/pkg/mod",
            "Setting TTL for /go/pkg/mod",
            "initialize terraform and ecr",
            "publish",
            "deploy",
        ]
    );
    assert!(!is_skipped(&pipeline["steps"][1]["when"]));
    assert!(is_skipped(&pipeline["steps"][2]["when"]));
    assert_eq!(pipeline["steps"][2]["when"]["branch"][0].as_str(), Some("main"));
    assert!(pipeline["trigger"].get("event").is_none());
    assert!(pipeline.get("cache").is_none());
    assert!(pipeline.get("deploy").is_none());
    assert_eq!(pipeline["type"].as_str(), Some("docker"));
    assert_eq!(pipeline["platform"]["os"].as_str(), Some("linux"));

    assert_eq!(provider.compare_calls.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.rewritten("cache"), vec!["default"]);
    assert_eq!(recorder.rewritten("paths"), vec!["default"]);
    assert_eq!(recorder.rewritten("deploy"), vec!["default"]);
    assert_eq!(recorder.failures(), 0);
}

/// The path filter failing stops the chain before the deploy rule runs
#[tokio::test]
async fn test_provider_failure_stops_the_chain() {
    let provider = MockChangeSet::failing(502);
    let recorder = EventRecorder::default();
    let output = run_chain(&conversion_chain(provider.clone()), &recorder, request(PIPELINE, BEFORE)).await;

    assert!(output.is_none());
    assert_eq!(recorder.rewritten("cache"), vec!["default"]);
    assert!(recorder.rewritten("deploy").is_empty());
    assert_eq!(recorder.failures(), 1);
}

/// Without path conditions the change set is never fetched
#[tokio::test]
async fn test_chain_without_path_conditions() {
    let yaml = r#"
kind: pipeline
name: default
steps:
  - name: build
    image: rust
cache:
  - hash: Cargo.lock
    path: target
    ttl: 2
"#;

    let provider = MockChangeSet::failing(500);
    let recorder = EventRecorder::default();
    let output = run_chain(&conversion_chain(provider.clone()), &recorder, request(yaml, BEFORE))
        .await
        .unwrap();

    assert_eq!(provider.calls(), 0);
    let documents = yaml_documents(&output);
    assert_eq!(documents.len(), 6);
    assert_eq!(
        step_names(&documents[0]),
        vec!["Restore target", "build", "Uploading target", "Setting TTL for target"]
    );
    assert_eq!(documents[0]["steps"][3]["settings"]["flush_age"].as_i64(), Some(2));
}
