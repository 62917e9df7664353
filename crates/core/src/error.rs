//! Error types for shader assembly.
//!
//! Every variant describes a defect in static data (templates, the token
//! table, or a profile definition) rather than a condition a player can
//! trigger, so all of them are exercised at test time.

use thiserror::Error;

/// Errors produced while resolving placeholders or assembling shader text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    /// Template text referenced a `$NAME` that is not in the token table.
    #[error("unknown placeholder token: ${0}")]
    UnknownToken(String),

    /// The profile lacks a feature the token structurally requires.
    #[error("profile '{profile}' cannot resolve ${token}: {reason}")]
    UnsupportedCapability {
        token: String,
        profile: String,
        reason: String,
    },

    /// Assembled text violates a structural rule of the shading language.
    #[error("invalid ordering in assembled shader: {0}")]
    InvalidOrdering(String),

    /// A profile definition could not be parsed or is internally inconsistent.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// No built-in profile exists with the given name.
    #[error("unknown profile: {0}")]
    UnknownProfile(String),
}
