// crates/adapt/src/client.rs

use serde_json::Value as Json;
use std::error::Error as StdError;

// ─────────────────────────────────────────────────────────────────────────────
// Port / trait: the edge layer implements this over its transport.
// ─────────────────────────────────────────────────────────────────────────────

/// Minimal document-store surface of a search engine.
///
/// Documents are JSON objects keyed by id within a named index. Calls are
/// synchronous; each one is a single request from the store's point of view.
#[cfg_attr(test, mockall::automock(type Error = std::io::Error;))]
pub trait SearchClient: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    /// The stored `_source` of a document, or `None` if the id is unknown.
    fn get(&self, index: &str, id: &str) -> Result<Option<Json>, Self::Error>;

    /// Create or replace a document.
    fn index(&self, index: &str, id: &str, document: &Json) -> Result<(), Self::Error>;

    /// Returns `false` when there was no such document.
    fn delete(&self, index: &str, id: &str) -> Result<bool, Self::Error>;

    /// Execute a search request body and return the raw response.
    fn search(&self, index: &str, body: &Json) -> Result<Json, Self::Error>;

    fn create_index(&self, index: &str, body: &Json) -> Result<(), Self::Error>;

    /// Missing indices are not an error.
    fn delete_index(&self, index: &str) -> Result<(), Self::Error>;
}
