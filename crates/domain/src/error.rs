// crates/domain/src/error.rs

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A raw value could not be coerced into a field's declared type.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A date-time string was not valid ISO-8601.
    #[error("parse error: {0}")]
    ParseError(String),

    /// A filter failed construction-time validation.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    #[error("unknown field `{field}` on entity {entity}")]
    UnknownField { entity: String, field: String },
}

impl Error {
    #[inline]
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Error::TypeMismatch(msg.into())
    }

    #[inline]
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Error::ParseError(msg.into())
    }

    #[inline]
    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Error::InvalidFilter(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
