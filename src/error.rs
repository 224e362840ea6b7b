mod error_kind;

pub use self::error_kind::ErrorKind;
use crate::wire::MalformedMapError;
use std::fmt::Display;
use thiserror::Error as ThisError;

/// Error that aborts the whole document conversion. Every variant carries the path of the
/// offending config attribute or wire element.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A capped nested block occurs more times than its parent allows.
    #[error("`{parent}` cannot have more than {max} `{block}` block(s), found {found}.")]
    TooManyNestedBlocks {
        block: String,
        parent: String,
        max: usize,
        found: usize,
    },
    /// A cross-field invariant of a config block doesn't hold.
    #[error("`{path}`: {message}")]
    InvariantViolation { path: String, message: String },
    /// A tagged-entry map can't be decoded.
    #[error("`{path}`: malformed map: {source}")]
    MalformedMap {
        path: String,
        #[source]
        source: MalformedMapError,
    },
    /// The wire document doesn't match the expected shape.
    #[error("`{path}`: {message}")]
    MalformedWireInput { path: String, message: String },
}

impl Error {
    /// Creates a new error for a broken config invariant.
    pub fn invariant<P: Display, M: Into<String>>(path: P, message: M) -> Self {
        Self::InvariantViolation {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Creates a new error for an unexpected wire document shape.
    pub fn malformed<P: Display, M: Into<String>>(path: P, message: M) -> Self {
        Self::MalformedWireInput {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Returns the category of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooManyNestedBlocks { .. } | Self::InvariantViolation { .. } => {
                ErrorKind::StructuralViolation
            }
            Self::MalformedMap { .. } | Self::MalformedWireInput { .. } => {
                ErrorKind::MalformedWireInput
            }
        }
    }

    /// Returns the path of the config attribute or wire element the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::TooManyNestedBlocks { parent, .. } => parent,
            Self::InvariantViolation { path, .. }
            | Self::MalformedMap { path, .. }
            | Self::MalformedWireInput { path, .. } => path,
        }
    }
}
