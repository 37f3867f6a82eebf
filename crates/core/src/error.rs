//! Error types raised while compiling game definitions.

use thiserror::Error;

/// Failures surfaced by the compiler pipeline.
///
/// Only [`CompileError::MalformedDefinition`] and [`CompileError::Parse`]
/// abort a compilation. Unresolved references and unknown tokens are
/// reported internally, logged, and then degraded to pass-through values.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A structurally required field is missing or has an unusable shape.
    #[error("malformed definition: {field}: {reason}")]
    MalformedDefinition {
        /// Dotted path of the offending field (e.g. `map.hexes`).
        field: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A `copy` reference points at nothing.
    #[error("unresolved {kind} reference '{reference}'")]
    UnresolvedReference {
        /// What kind of reference failed (`hex`, `variation`).
        kind: &'static str,
        /// The dangling reference itself.
        reference: String,
    },

    /// A color, token type or share type the tables do not know about.
    #[error("unknown {kind} '{token}'")]
    UnknownToken {
        /// Vocabulary the token was looked up in.
        kind: &'static str,
        /// The unrecognised token.
        token: String,
    },

    /// Raw definition data could not be decoded.
    #[error("failed to decode definition: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CompileError {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDefinition {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the compiler.
pub type Result<T> = std::result::Result<T, CompileError>;
