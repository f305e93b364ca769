// crates/domain/src/filter.rs

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::field::FieldDescriptor;
use crate::operator::Operator;
use crate::value::{serialize, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Operand payloads
//
// Payload fields are private: the only way to obtain one is through
// `Filter::new`, which validates operands against the field's declared type.
// ─────────────────────────────────────────────────────────────────────────────

/// `field == value` / `field != value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    field: &'static FieldDescriptor,
    value: Value,
}

/// `field ∈ values` / `field ∉ values`; `values` is a non-empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    field: &'static FieldDescriptor,
    values: Value,
}

/// `field > bound` / `field < bound` on an ordered field.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    field: &'static FieldDescriptor,
    bound: Value,
}

impl Comparison {
    pub fn field(&self) -> &'static FieldDescriptor {
        self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Membership {
    pub fn field(&self) -> &'static FieldDescriptor {
        self.field
    }

    pub fn values(&self) -> &[Value] {
        self.values.as_list().unwrap_or_default()
    }
}

impl Range {
    pub fn field(&self) -> &'static FieldDescriptor {
        self.field
    }

    pub fn bound(&self) -> &Value {
        &self.bound
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter AST
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable predicate over entities.
///
/// Each node evaluates directly against a typed entity (`evaluate`) and
/// compiles to a search-engine query fragment (`to_query`); both consumers
/// read the same node, so the two backends agree on semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Is(Comparison),
    IsNot(Comparison),
    IsOneOf(Membership),
    IsNotOneOf(Membership),
    GreaterThan(Range),
    LessThan(Range),
    Exists(&'static FieldDescriptor),
    DoesNotExist(&'static FieldDescriptor),
    Or(Vec<Filter>),
}

impl Filter {
    /// Validated constructor shared by the typed helpers and the factory.
    ///
    /// `filters` is only read for [`Operator::Or`]; `value` is ignored by the
    /// existence operators.
    pub fn new(
        operator: Operator,
        field: Option<&'static FieldDescriptor>,
        value: Option<Value>,
        filters: Vec<Filter>,
    ) -> Result<Self> {
        let label = operator.label();
        let field = || {
            field.ok_or_else(|| Error::invalid_filter(format!("{label} filter missing field.")))
        };
        let value = || {
            value.ok_or_else(|| Error::invalid_filter(format!("{label} filter missing 'value'.")))
        };

        match operator {
            Operator::Or => Ok(Filter::Or(filters)),
            Operator::Exists => Ok(Filter::Exists(field()?)),
            Operator::DoesNotExist => Ok(Filter::DoesNotExist(field()?)),
            Operator::Is | Operator::IsNot => {
                let (field, value) = (field()?, value()?);
                check_type(field, &value)?;
                let cmp = Comparison { field, value };
                Ok(if operator == Operator::Is {
                    Filter::Is(cmp)
                } else {
                    Filter::IsNot(cmp)
                })
            }
            Operator::IsOneOf | Operator::IsNotOneOf => {
                let (field, values) = (field()?, value()?);
                let items = values.as_list().ok_or_else(|| {
                    Error::invalid_filter(format!("{label} filter 'value' must be a list."))
                })?;
                if items.is_empty() {
                    return Err(Error::invalid_filter(format!(
                        "{label} filter 'value' must not be empty."
                    )));
                }
                for item in items {
                    check_type(field, item)?;
                }
                let membership = Membership { field, values };
                Ok(if operator == Operator::IsOneOf {
                    Filter::IsOneOf(membership)
                } else {
                    Filter::IsNotOneOf(membership)
                })
            }
            Operator::GreaterThan | Operator::LessThan => {
                let field = field()?;
                if field.ty().is_list() || !field.ty().element().is_ordered() {
                    return Err(Error::invalid_filter(format!(
                        "Field {} is not a numeric field",
                        field.name()
                    )));
                }
                let bound = value()?;
                check_type(field, &bound)?;
                let range = Range { field, bound };
                Ok(if operator == Operator::GreaterThan {
                    Filter::GreaterThan(range)
                } else {
                    Filter::LessThan(range)
                })
            }
        }
    }

    pub fn is(field: &'static FieldDescriptor, value: impl Into<Value>) -> Result<Self> {
        Self::new(Operator::Is, Some(field), Some(value.into()), Vec::new())
    }

    pub fn is_not(field: &'static FieldDescriptor, value: impl Into<Value>) -> Result<Self> {
        Self::new(Operator::IsNot, Some(field), Some(value.into()), Vec::new())
    }

    pub fn is_one_of(field: &'static FieldDescriptor, values: impl Into<Value>) -> Result<Self> {
        Self::new(Operator::IsOneOf, Some(field), Some(values.into()), Vec::new())
    }

    pub fn is_not_one_of(field: &'static FieldDescriptor, values: impl Into<Value>) -> Result<Self> {
        Self::new(Operator::IsNotOneOf, Some(field), Some(values.into()), Vec::new())
    }

    pub fn greater_than(field: &'static FieldDescriptor, value: impl Into<Value>) -> Result<Self> {
        Self::new(Operator::GreaterThan, Some(field), Some(value.into()), Vec::new())
    }

    pub fn less_than(field: &'static FieldDescriptor, value: impl Into<Value>) -> Result<Self> {
        Self::new(Operator::LessThan, Some(field), Some(value.into()), Vec::new())
    }

    pub fn exists(field: &'static FieldDescriptor) -> Self {
        Filter::Exists(field)
    }

    pub fn does_not_exist(field: &'static FieldDescriptor) -> Self {
        Filter::DoesNotExist(field)
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn operator(&self) -> Operator {
        match self {
            Filter::Is(_) => Operator::Is,
            Filter::IsNot(_) => Operator::IsNot,
            Filter::IsOneOf(_) => Operator::IsOneOf,
            Filter::IsNotOneOf(_) => Operator::IsNotOneOf,
            Filter::GreaterThan(_) => Operator::GreaterThan,
            Filter::LessThan(_) => Operator::LessThan,
            Filter::Exists(_) => Operator::Exists,
            Filter::DoesNotExist(_) => Operator::DoesNotExist,
            Filter::Or(_) => Operator::Or,
        }
    }

    /// The referenced field; `None` for `Or`.
    pub fn field(&self) -> Option<&'static FieldDescriptor> {
        match self {
            Filter::Is(c) | Filter::IsNot(c) => Some(c.field),
            Filter::IsOneOf(m) | Filter::IsNotOneOf(m) => Some(m.field),
            Filter::GreaterThan(r) | Filter::LessThan(r) => Some(r.field),
            Filter::Exists(f) | Filter::DoesNotExist(f) => Some(*f),
            Filter::Or(_) => None,
        }
    }

    /// The literal operand; membership operands are returned as a list.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Filter::Is(c) | Filter::IsNot(c) => Some(&c.value),
            Filter::IsOneOf(m) | Filter::IsNotOneOf(m) => Some(&m.values),
            Filter::GreaterThan(r) | Filter::LessThan(r) => Some(&r.bound),
            Filter::Exists(_) | Filter::DoesNotExist(_) | Filter::Or(_) => None,
        }
    }

    pub fn filters(&self) -> &[Filter] {
        match self {
            Filter::Or(filters) => filters,
            _ => &[],
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // In-memory evaluation
    // ─────────────────────────────────────────────────────────────────────

    /// Evaluate this filter against a typed entity.
    ///
    /// List fields match when any element does, and an empty list counts as
    /// absent, the way the search engine indexes arrays.
    pub fn evaluate<E: Entity>(&self, entity: &E) -> bool {
        match self {
            Filter::Is(c) => any_element(entity, c.field, |v| *v == c.value),
            Filter::IsNot(c) => !any_element(entity, c.field, |v| *v == c.value),
            Filter::IsOneOf(m) => any_element(entity, m.field, |v| m.values().contains(v)),
            Filter::IsNotOneOf(m) => !any_element(entity, m.field, |v| m.values().contains(v)),
            Filter::GreaterThan(r) => any_element(entity, r.field, |v| {
                v.partial_cmp(&r.bound) == Some(Ordering::Greater)
            }),
            Filter::LessThan(r) => {
                any_element(entity, r.field, |v| v.partial_cmp(&r.bound) == Some(Ordering::Less))
            }
            Filter::Exists(field) => present(entity, field).is_some(),
            Filter::DoesNotExist(field) => present(entity, field).is_none(),
            Filter::Or(filters) => filters.iter().any(|f| f.evaluate(entity)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Search-engine query compilation
    // ─────────────────────────────────────────────────────────────────────

    /// Compile to a query-DSL fragment.
    ///
    /// Equality and membership target the keyword name; ranges and existence
    /// target the document name.
    pub fn to_query(&self) -> Json {
        match self {
            Filter::Is(c) => term(c),
            Filter::IsNot(c) => must_not(term(c)),
            Filter::IsOneOf(m) => terms(m),
            Filter::IsNotOneOf(m) => must_not(terms(m)),
            Filter::GreaterThan(r) => range(r, "gt"),
            Filter::LessThan(r) => range(r, "lt"),
            Filter::Exists(field) => exists(field),
            Filter::DoesNotExist(field) => must_not(exists(field)),
            // An empty `should` would match every document.
            Filter::Or(filters) if filters.is_empty() => json!({ "match_none": {} }),
            Filter::Or(filters) => json!({
                "bool": {
                    "should": filters.iter().map(Filter::to_query).collect::<Vec<_>>()
                }
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Serialized form
    // ─────────────────────────────────────────────────────────────────────

    /// Generic description of this filter; the factory's inverse.
    pub fn to_description(&self) -> FilterDescription {
        match self {
            Filter::Or(filters) => FilterDescription {
                field: None,
                operator: Operator::Or.as_str().to_string(),
                value: None,
                filters: Some(filters.iter().map(Filter::to_description).collect()),
            },
            other => FilterDescription {
                field: other.field().map(|f| f.name().to_string()),
                operator: other.operator().as_str().to_string(),
                value: other.value().map(serialize),
                filters: None,
            },
        }
    }
}

/// Operands are single elements: the field's type, or the element type of a
/// list field.
fn check_type(field: &FieldDescriptor, value: &Value) -> Result<()> {
    let element = field.ty().element();
    if value.scalar_type() == Some(element) {
        Ok(())
    } else {
        Err(Error::invalid_filter(format!(
            "Value {value} is not of type {element}"
        )))
    }
}

fn present<E: Entity>(entity: &E, field: &FieldDescriptor) -> Option<Value> {
    entity
        .value(field.name())
        .filter(|v| v.as_list().map_or(true, |items| !items.is_empty()))
}

fn any_element<E: Entity>(
    entity: &E,
    field: &FieldDescriptor,
    matches: impl Fn(&Value) -> bool,
) -> bool {
    present(entity, field).is_some_and(|v| match &v {
        Value::List(items) => items.iter().any(&matches),
        scalar => matches(scalar),
    })
}

fn term(c: &Comparison) -> Json {
    json!({ "term": { c.field.keyword_name(): serialize(&c.value) } })
}

fn terms(m: &Membership) -> Json {
    json!({ "terms": { m.field.keyword_name(): serialize(&m.values) } })
}

fn range(r: &Range, bound: &str) -> Json {
    json!({ "range": { r.field.document_name(): { bound: serialize(&r.bound) } } })
}

fn exists(field: &FieldDescriptor) -> Json {
    json!({ "exists": { "field": field.document_name() } })
}

fn must_not(inner: Json) -> Json {
    json!({ "bool": { "must_not": inner } })
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Is(c) => write!(f, "{} is {}", c.field.name(), c.value),
            Filter::IsNot(c) => write!(f, "{} is not {}", c.field.name(), c.value),
            Filter::IsOneOf(m) => write!(f, "{} is one of {}", m.field.name(), m.values),
            Filter::IsNotOneOf(m) => write!(f, "{} is not one of {}", m.field.name(), m.values),
            Filter::GreaterThan(r) => write!(f, "{} is greater than {}", r.field.name(), r.bound),
            Filter::LessThan(r) => write!(f, "{} is less than {}", r.field.name(), r.bound),
            Filter::Exists(field) => write!(f, "{} exists", field.name()),
            Filter::DoesNotExist(field) => write!(f, "{} does not exist", field.name()),
            Filter::Or(filters) => {
                for (i, filter) in filters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" OR ")?;
                    }
                    write!(f, "{filter}")?;
                }
                Ok(())
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generic description (wire form)
// ─────────────────────────────────────────────────────────────────────────────

/// `{"field": .., "operator": .., "value": .., "filters": [..]}` with absent
/// keys omitted. `operator` stays a plain string so that unknown operators
/// surface as `InvalidOperator` from the factory rather than a serde error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    pub operator: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Json>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterDescription>>,
}
