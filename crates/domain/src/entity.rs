// crates/domain/src/entity.rs

use std::collections::HashMap;
use std::fmt::Debug;

use serde_json::{Map as JsonMap, Value as Json};

use crate::error::{Error, Result};
use crate::field::FieldDescriptor;
use crate::value::{self, FromValue, Value};

/// Search-engine document: document name → serialized value.
pub type Record = JsonMap<String, Json>;

/// Field name → typed value, `None` when absent. Values keep their runtime
/// representation; nothing is renamed or serialized.
pub type Generic = HashMap<String, Option<Value>>;

// ─────────────────────────────────────────────────────────────────────────────
// Entity contract
// ─────────────────────────────────────────────────────────────────────────────

/// A typed record with a static table of field descriptors.
///
/// Implementors provide the field table, per-field access and construction
/// from parsed values; the generic and document conversions are derived from
/// those three.
pub trait Entity: Sized + Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The static field registry of this entity type.
    fn fields() -> &'static [FieldDescriptor];

    /// Current value of the named field; `None` when absent.
    fn value(&self, field: &str) -> Option<Value>;

    /// Build an instance from already-parsed field values.
    fn from_values(values: FieldValues) -> Result<Self>;

    /// Short type name used in error messages.
    fn entity_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Look a field descriptor up by its own name.
    fn field(name: &str) -> Option<&'static FieldDescriptor> {
        Self::fields().iter().find(|f| f.name() == name)
    }

    /// Field name → current value for every declared field.
    fn to_generic(&self) -> Generic {
        Self::fields()
            .iter()
            .map(|field| (field.name().to_string(), self.value(field.name())))
            .collect()
    }

    /// Read each declared field under its own name. Values of another type
    /// are coerced to the declared one; missing keys are absent.
    fn from_generic(data: &Generic) -> Result<Self> {
        let mut values = HashMap::new();
        for field in Self::fields() {
            let Some(v) = data.get(field.name()).cloned().flatten() else {
                continue;
            };
            let v = value::coerce(field.ty(), v).map_err(|err| qualify::<Self>(field, err))?;
            values.insert(field.name(), v);
        }
        Self::from_values(FieldValues::new::<Self>(values))
    }

    /// Document name → serialized value for every declared field.
    fn to_document(&self) -> Record {
        Self::fields()
            .iter()
            .map(|field| {
                let raw = value::serialize_opt(self.value(field.name()).as_ref());
                (field.document_name().to_string(), raw)
            })
            .collect()
    }

    fn from_document(data: &Record) -> Result<Self> {
        let mut values = HashMap::new();
        for field in Self::fields() {
            let raw = data.get(field.document_name()).unwrap_or(&Json::Null);
            let parsed = value::parse(field.ty(), raw).map_err(|err| qualify::<Self>(field, err))?;
            if let Some(v) = parsed {
                values.insert(field.name(), v);
            }
        }
        Self::from_values(FieldValues::new::<Self>(values))
    }
}

/// Prefix type mismatches with `Entity.field`.
fn qualify<E: Entity>(field: &FieldDescriptor, err: Error) -> Error {
    match err {
        Error::TypeMismatch(msg) => {
            Error::type_mismatch(format!("{}.{}: {msg}", E::entity_name(), field.name()))
        }
        other => other,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsed values handed to Entity::from_values
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed field values keyed by field name, drained by `from_values`.
#[derive(Debug, Default)]
pub struct FieldValues {
    entity: &'static str,
    values: HashMap<&'static str, Value>,
}

impl FieldValues {
    fn new<E: Entity>(values: HashMap<&'static str, Value>) -> Self {
        Self {
            entity: E::entity_name(),
            values,
        }
    }

    /// Take a field that the entity cannot represent as absent.
    pub fn required<T: FromValue>(&mut self, name: &str) -> Result<T> {
        match self.values.remove(name) {
            Some(v) => T::from_value(v).map_err(|e| self.annotate(name, e)),
            None => Err(Error::type_mismatch(format!(
                "{}.{name} is required but absent",
                self.entity
            ))),
        }
    }

    /// Take a nullable field.
    pub fn optional<T: FromValue>(&mut self, name: &str) -> Result<Option<T>> {
        self.values
            .remove(name)
            .map(|v| T::from_value(v).map_err(|e| self.annotate(name, e)))
            .transpose()
    }

    fn annotate(&self, name: &str, err: Error) -> Error {
        match err {
            Error::TypeMismatch(msg) => {
                Error::type_mismatch(format!("{}.{name}: {msg}", self.entity))
            }
            other => other,
        }
    }
}
