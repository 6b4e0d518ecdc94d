//! Cache rule: turns `cache` declarations into restore and store steps

use crate::chain::{Convert, Outcome, Participant};
use crate::core::record::{mapping, sequence};
use crate::core::secret::{declaration, from_secret};
use crate::core::{Document, Open, Step, StepFields};
use crate::plugin::{Config, ConvertRequest, PluginContext};
use async_trait::async_trait;
use serde_yaml::Value;

pub const NAME: &str = "cache";

/// Image that restores, rebuilds and expires caches in S3
pub const CACHE_IMAGE: &str = "andrewstucki/s3-cache";

/// Cache lifetime when a declaration gives none
pub const DEFAULT_TTL_DAYS: i64 = 5;

const ACCESS_KEY_SECRET: &str = "cache_access_key";
const SECRET_KEY_SECRET: &str = "cache_secret_key";
const BUCKET_SECRET: &str = "cache_bucket";

/// Injects cache restore/store steps into pipelines that declare `cache`
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheRule;

impl CacheRule {
    pub fn new() -> Self {
        Self
    }
}

/// Replace a pipeline's cache declarations with explicit steps
///
/// Restore steps go in front of the existing steps, upload and flush steps
/// after them, each in declaration order. Returns whether the document
/// changed.
pub fn update(document: &mut Document) -> bool {
    if !document.is_pipeline() || document.cache.is_empty() {
        return false;
    }

    let mut restore = Vec::new();
    let mut store = Vec::new();
    for cache in document.cache.iter().filter(|cache| !cache.path.is_empty()) {
        let ttl = if cache.ttl <= 0 {
            DEFAULT_TTL_DAYS
        } else {
            cache.ttl
        };
        let hash = Value::from(cache.hash.as_str());

        restore.push(cache_step(
            format!("Restore {}", cache.path),
            [("restore", Value::Bool(true)), ("hash", hash.clone())],
        ));
        store.push(cache_step(
            format!("Uploading {}", cache.path),
            [
                ("rebuild", Value::Bool(true)),
                ("hash", hash.clone()),
                ("mount", sequence([cache.path.as_str()])),
            ],
        ));
        store.push(cache_step(
            format!("Setting TTL for {}", cache.path),
            [
                ("flush", Value::Bool(true)),
                ("hash", hash),
                ("flush_age", Value::from(ttl)),
            ],
        ));
    }

    let existing = std::mem::take(&mut document.steps);
    document.steps = restore.into_iter().chain(existing).chain(store).collect();
    document.cache.clear();

    true
}

fn cache_step<const N: usize>(name: String, settings: [(&'static str, Value); N]) -> Step {
    let settings = [("pull", Value::Bool(true))]
        .into_iter()
        .chain(settings)
        .chain([
            ("root", from_secret(BUCKET_SECRET)),
            ("access_key", from_secret(ACCESS_KEY_SECRET)),
            ("secret_key", from_secret(SECRET_KEY_SECRET)),
        ]);

    Open::new(StepFields::default())
        .with_attr("name", name)
        .with_attr("image", CACHE_IMAGE)
        .with_attr("settings", mapping(settings))
}

/// Declare the storage credentials the cache steps reference
///
/// Appended whether or not any pipeline used caching.
pub fn append_secrets(documents: &mut Vec<Document>) {
    documents.extend([
        declaration(ACCESS_KEY_SECRET, "cache-access-key"),
        declaration(SECRET_KEY_SECRET, "cache-secret-key"),
        declaration(BUCKET_SECRET, "cache-bucket"),
    ]);
}

#[async_trait]
impl Participant<Convert> for CacheRule {
    async fn apply(&self, cx: &PluginContext, request: &ConvertRequest) -> Outcome<Config> {
        let mut documents = match super::decode(request) {
            Ok(documents) => documents,
            Err(err) => return super::decline(NAME, cx, request, err),
        };

        for document in documents.iter_mut() {
            if update(document) {
                super::report_rewrite(NAME, cx, request, document);
            }
        }
        append_secrets(&mut documents);

        super::encode(NAME, cx, request, &documents)
    }
}
