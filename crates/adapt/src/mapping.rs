// crates/adapt/src/mapping.rs

use domain::{Entity, FieldDescriptor, ScalarType};
use serde_json::{json, Map, Value as Json};

/// Index creation body derived from an entity's field table.
///
/// Properties are keyed by document name. A string field whose keyword alias
/// is `<document_name>.<sub>` becomes `text` with a `keyword` sub-field;
/// other strings are plain `keyword`.
pub fn index_mapping<E: Entity>() -> Json {
    let properties: Map<String, Json> = E::fields()
        .iter()
        .map(|field| (field.document_name().to_string(), property(field)))
        .collect();

    json!({ "mappings": { "properties": properties } })
}

fn property(field: &FieldDescriptor) -> Json {
    match field.ty().element() {
        ScalarType::String => match keyword_subfield(field) {
            Some(sub) => json!({
                "type": "text",
                "fields": { sub: { "type": "keyword" } }
            }),
            None => json!({ "type": "keyword" }),
        },
        ScalarType::Integer => json!({ "type": "long" }),
        ScalarType::Float => json!({ "type": "double" }),
        ScalarType::Boolean => json!({ "type": "boolean" }),
        // Date-times carry nanoseconds; `date` would round them to millis.
        ScalarType::DateTime => json!({ "type": "date_nanos" }),
    }
}

fn keyword_subfield(field: &FieldDescriptor) -> Option<&'static str> {
    let alias = field.keyword_alias()?;
    alias
        .strip_prefix(field.document_name())
        .and_then(|rest| rest.strip_prefix('.'))
        .filter(|sub| !sub.is_empty())
}
