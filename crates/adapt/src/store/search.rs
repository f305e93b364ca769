// crates/adapt/src/store/search.rs

use std::marker::PhantomData;

use domain::{Entity, Filter, Record};
use serde_json::{json, Value as Json};
use tracing::{debug, trace, warn};

use crate::client::SearchClient;
use crate::mapping::index_mapping;
use crate::store::Store;
use crate::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Search-engine backed Store, talking through the SearchClient port
// ─────────────────────────────────────────────────────────────────────────────

/// Store persisting entities as documents in one search index.
///
/// Writes send the document representation; `read` compiles every filter
/// into one non-scoring `bool.filter` query.
#[derive(Debug)]
pub struct SearchStore<E, C> {
    client: C,
    index: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, C: SearchClient> SearchStore<E, C> {
    pub fn new(client: C, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
            _entity: PhantomData,
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Create the index with the mapping derived from `E`'s field table.
    pub fn ensure_index(&self) -> Result<()> {
        let body = index_mapping::<E>();
        debug!(index = %self.index, "create index");
        trace!(%body, "index mapping");
        self.client
            .create_index(&self.index, &body)
            .map_err(Error::backend)
    }

    /// The request body `read` sends for `filters`.
    pub fn query(filters: &[Filter]) -> Json {
        let fragments: Vec<Json> = filters.iter().map(Filter::to_query).collect();
        json!({ "query": { "bool": { "filter": fragments } } })
    }

    fn write(&self, entity: &E, key: &str) -> Result<()> {
        let document = Json::Object(entity.to_document());
        self.client
            .index(&self.index, key, &document)
            .map_err(Error::backend)
    }

    fn decode(source: &Json) -> Result<E> {
        let record: &Record = source
            .as_object()
            .ok_or_else(|| Error::malformed(format!("document source is not an object: {source}")))?;
        Ok(E::from_document(record)?)
    }

    /// Fail when `hits.total` says more documents matched than were returned.
    /// A response without a total is taken as complete.
    fn check_complete(&self, response: &Json, returned: usize) -> Result<()> {
        let Some(total) = response.get("hits").and_then(|h| h.get("total")) else {
            return Ok(());
        };
        let (value, relation) = match total {
            // Older engines report a bare count.
            Json::Number(n) => (n.as_u64(), "eq"),
            other => (
                other.get("value").and_then(Json::as_u64),
                other.get("relation").and_then(Json::as_str).unwrap_or("eq"),
            ),
        };
        let value =
            value.ok_or_else(|| Error::malformed(format!("unreadable hits.total: {total}")))?;

        if relation == "eq" && value <= returned as u64 {
            return Ok(());
        }
        warn!(index = %self.index, returned, total = value, relation, "search results truncated");
        Err(Error::Truncated {
            returned,
            total: value,
            relation: relation.to_string(),
        })
    }
}

impl<E: Entity, C: SearchClient> Store<E> for SearchStore<E, C> {
    fn get(&self, key: &str) -> Result<E> {
        debug!(index = %self.index, key, "get");
        match self.client.get(&self.index, key).map_err(Error::backend)? {
            Some(source) => Self::decode(&source),
            None => Err(Error::entity_not_found(key)),
        }
    }

    fn create(&self, entity: &E, key: &str) -> Result<()> {
        debug!(index = %self.index, key, "create");
        self.write(entity, key)
    }

    fn update(&self, entity: &E, key: &str) -> Result<()> {
        debug!(index = %self.index, key, "update");
        self.write(entity, key)
    }

    fn delete(&self, key: &str) -> Result<()> {
        debug!(index = %self.index, key, "delete");
        if self.client.delete(&self.index, key).map_err(Error::backend)? {
            Ok(())
        } else {
            Err(Error::entity_not_found(key))
        }
    }

    fn read(&self, filters: &[Filter]) -> Result<Vec<E>> {
        let body = Self::query(filters);
        debug!(index = %self.index, filters = filters.len(), "read");
        trace!(%body, "search body");

        let response = self
            .client
            .search(&self.index, &body)
            .map_err(Error::backend)?;

        let Some(hits) = response
            .get("hits")
            .and_then(|h| h.get("hits"))
            .and_then(Json::as_array)
        else {
            warn!(index = %self.index, "search response without hits.hits");
            return Err(Error::malformed("missing hits.hits"));
        };

        self.check_complete(&response, hits.len())?;

        hits.iter()
            .map(|hit| {
                let source = hit
                    .get("_source")
                    .ok_or_else(|| Error::malformed("hit without _source"))?;
                Self::decode(source)
            })
            .collect()
    }
}
