//! Multi-document YAML stream codec

use crate::core::document::Document;
use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;

/// Errors decoding or encoding a document stream
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to decode document {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Document {index} is a {found}, expected a mapping")]
    NotAMapping { index: usize, found: &'static str },

    #[error("Failed to encode document {index}: {source}")]
    Encode {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Decode every document in the stream, in order
///
/// Merge keys (`<<: *anchor`) are expanded before the rules see a document.
/// The first malformed document fails the whole parse. Empty documents carry
/// nothing and are dropped.
pub fn parse(text: &str) -> Result<Vec<Document>, DocumentError> {
    let mut documents = Vec::new();

    for (index, deserializer) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let mut value = Value::deserialize(deserializer)
            .map_err(|source| DocumentError::Decode { index, source })?;
        value
            .apply_merge()
            .map_err(|source| DocumentError::Decode { index, source })?;

        match value {
            Value::Null => continue,
            Value::Mapping(mapping) => {
                let document = Document::from_mapping(mapping)
                    .map_err(|source| DocumentError::Decode { index, source })?;
                documents.push(document);
            }
            other => {
                return Err(DocumentError::NotAMapping {
                    index,
                    found: value_kind(&other),
                })
            }
        }
    }

    Ok(documents)
}

/// Encode the documents back into one stream separated by `---`
pub fn serialize(documents: &[Document]) -> Result<String, DocumentError> {
    let mut out = String::new();

    for (index, document) in documents.iter().enumerate() {
        let text = serde_yaml::to_string(document)
            .map_err(|source| DocumentError::Encode { index, source })?;
        if index > 0 {
            out.push_str("---\n");
        }
        out.push_str(&text);
    }

    Ok(out)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
