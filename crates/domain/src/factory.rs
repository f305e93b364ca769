// crates/domain/src/factory.rs

use serde_json::Value as Json;
use tracing::debug;

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::filter::{Filter, FilterDescription};
use crate::operator::Operator;
use crate::value;

/// Builds filters from their generic description, resolving field names
/// against an entity's registry.
pub struct FilterFactory;

impl FilterFactory {
    /// Inverse of [`Filter::to_description`].
    pub fn build<E: Entity>(description: &FilterDescription) -> Result<Filter> {
        let operator: Operator = description.operator.parse()?;

        if operator == Operator::Or {
            let filters = description
                .filters
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(Self::build::<E>)
                .collect::<Result<Vec<_>>>()?;
            return Filter::new(operator, None, None, filters);
        }

        let field = match description.field.as_deref() {
            Some(name) => Some(E::field(name).ok_or_else(|| Error::UnknownField {
                entity: E::entity_name().to_string(),
                field: name.to_string(),
            })?),
            None => None,
        };

        // Arrays parse element-wise against the field's element type.
        let value = match (field, description.value.as_ref()) {
            (Some(f), Some(raw)) => value::parse(f.ty(), raw)?,
            _ => None,
        };

        debug!(%operator, field = ?description.field, "building filter");
        Filter::new(operator, field, value, Vec::new())
    }

    /// Build from a JSON object of the description shape.
    pub fn from_json<E: Entity>(raw: &Json) -> Result<Filter> {
        let description: FilterDescription = serde_json::from_value(raw.clone())
            .map_err(|e| Error::invalid_filter(format!("malformed filter description: {e}")))?;
        Self::build::<E>(&description)
    }
}
