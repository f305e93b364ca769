// crates/adapt/src/lib.rs

pub mod client;
pub mod mapping;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use client::SearchClient;
pub use store::{DictStore, SearchStore, Store};

use std::error::Error as StdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Domain(#[from] domain::Error),

    #[error("entity not found: {key}")]
    EntityNotFound { key: String },

    // ─────────────────────────────────────────────────────────────────────
    // Search backend
    // ─────────────────────────────────────────────────────────────────────
    /// The search client failed; the transport error is kept as the source.
    #[error("search backend error: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync + 'static>),

    /// The backend answered, but not in the shape a store can decode.
    #[error("malformed search response: {0}")]
    MalformedResponse(String),

    /// More documents matched than one response carried.
    #[error("search returned {returned} hits but {total} ({relation}) matched")]
    Truncated {
        returned: usize,
        total: u64,
        relation: String,
    },
}

impl Error {
    #[inline]
    pub fn entity_not_found(key: impl Into<String>) -> Self {
        Error::EntityNotFound { key: key.into() }
    }

    #[inline]
    pub fn backend(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Backend(Box::new(err))
    }

    #[inline]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedResponse(msg.into())
    }

    /// Errors caused by caller input rather than by the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Domain(
                domain::Error::InvalidFilter(_)
                    | domain::Error::InvalidOperator(_)
                    | domain::Error::UnknownField { .. }
                    | domain::Error::TypeMismatch(_)
                    | domain::Error::ParseError(_)
            )
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::EntityNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let err = Error::entity_not_found("7");
        assert!(err.is_not_found());
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "entity not found: 7");

        let err: Error = domain::Error::invalid_filter("Is filter missing field.").into();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "invalid filter: Is filter missing field.");

        let err = Error::backend(std::io::Error::other("connection refused"));
        assert!(!err.is_client_error());
        assert!(StdError::source(&err).is_some());

        let err = Error::Truncated {
            returned: 10,
            total: 10_000,
            relation: "gte".into(),
        };
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "search returned 10 hits but 10000 (gte) matched");
    }
}
