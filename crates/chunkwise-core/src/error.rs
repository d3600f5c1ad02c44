//! Error types for building classifiers and namers.
//!
//! Classification and naming themselves never fail. Errors only surface when
//! configuration is turned into a [`Classifier`](crate::Classifier) or a
//! [`ChunkNamer`](crate::ChunkNamer).

use thiserror::Error;

use crate::naming::TemplateKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("output template '{template}' is missing the {{contentHash}} placeholder")]
    MissingContentHash { template: String },

    #[error("unknown placeholder '{{{name}}}' in output template '{template}'")]
    UnknownPlaceholder { name: String, template: String },

    #[error("placeholder '{{{name}}}' cannot be used in {kind} templates")]
    UnsupportedPlaceholder { name: String, kind: TemplateKind },

    #[error("unclosed placeholder in output template '{template}'")]
    UnclosedPlaceholder { template: String },

    #[error("output template cannot be empty")]
    EmptyTemplate,

    #[error("invalid package pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid source subtree '{subtree}': {reason}")]
    InvalidSubtree { subtree: String, reason: String },

    #[error("hash length {0} is out of range (expected 4 to 64)")]
    HashLength(usize),
}
