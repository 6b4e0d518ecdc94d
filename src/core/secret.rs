//! Secret indirections emitted into rewritten pipelines
//!
//! The rewrite never resolves secret values. It references secrets by name
//! (`from_secret`) and appends `kind: secret` documents telling the secret
//! backend which external key each name maps to.

use crate::core::document::{Document, DocumentFields, SECRET_KIND};
use crate::core::record::{mapping, Open};
use serde_yaml::Value;

/// Path under which the external secret store keeps pipeline secrets
pub const SECRET_STORE_PATH: &str = "drone";

/// `{from_secret: <name>}`
pub fn from_secret(name: &str) -> Value {
    mapping([("from_secret", Value::from(name))])
}

/// A secret document exposing `external_key` from the store as `name`
pub fn declaration(name: &str, external_key: &str) -> Document {
    Open::new(DocumentFields {
        name: name.to_string(),
        kind: SECRET_KIND.to_string(),
        ..Default::default()
    })
    .with_attr(
        "get",
        mapping([
            ("path", Value::from(SECRET_STORE_PATH)),
            ("name", Value::from(external_key)),
        ]),
    )
}
