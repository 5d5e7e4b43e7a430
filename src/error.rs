//! Error types for entisql.

use crate::config::SettingsError;

/// Errors raised while building entity models or compiling statements.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required argument was blank, empty or otherwise unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// One side of a join could not be resolved to a concrete attribute.
    #[error("Invalid relation for selector {selector}: {reason}")]
    InvalidRelation { selector: String, reason: String },

    /// A selector did not match any attribute of the entity.
    #[error("Attribute '{property}' not found on entity {entity}")]
    UnresolvedAttribute { entity: String, property: String },

    /// The definition provider rejected an entity definition.
    #[error("Invalid definition for {entity}: {reason}")]
    InvalidDefinition { entity: String, reason: String },

    /// A blank identifier was passed to the name qualifier.
    #[error("Identifier must not be blank")]
    InvalidIdentifier,

    /// The dialect cannot express the requested statement shape.
    #[error("{feature} is not implemented for dialect {dialect}")]
    NotSupported {
        dialect: &'static str,
        feature: &'static str,
    },

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
