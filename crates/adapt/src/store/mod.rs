// crates/adapt/src/store/mod.rs

pub mod mem;
pub mod search;

pub use mem::DictStore;
pub use search::SearchStore;

use domain::{Entity, Filter};

use crate::Result;

/// Keyed collection of one entity type.
///
/// Methods take `&self`; implementations synchronise internally. `create` and
/// `update` are both unconditional upserts.
pub trait Store<E: Entity>: Send + Sync {
    /// Fails with `EntityNotFound` when the key is absent.
    fn get(&self, key: &str) -> Result<E>;

    fn create(&self, entity: &E, key: &str) -> Result<()>;

    fn update(&self, entity: &E, key: &str) -> Result<()>;

    /// Fails with `EntityNotFound` when the key is absent.
    fn delete(&self, key: &str) -> Result<()>;

    /// Every stored entity satisfying all `filters`; an empty slice matches
    /// everything.
    fn read(&self, filters: &[Filter]) -> Result<Vec<E>>;
}
