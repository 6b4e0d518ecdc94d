//! Core document model
//!
//! This module defines the records a pipeline definition decodes into, the
//! stream codec, path conditions, and the secret indirections the rewrite
//! rules emit.

pub mod codec;
pub mod condition;
pub mod document;
pub mod record;
pub mod secret;

pub use codec::{parse, serialize, DocumentError};
pub use condition::{Condition, ConditionSet};
pub use document::*;
pub use record::{Fields, Open};
