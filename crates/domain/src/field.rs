// crates/domain/src/field.rs

use std::fmt::{self, Display, Formatter};

// ─────────────────────────────────────────────────────────────────────────────
// Declared field types
// ─────────────────────────────────────────────────────────────────────────────

/// Element type of a field (or of each element of a list field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
}

impl ScalarType {
    /// Types that support ordering comparisons (`gt` / `lt`).
    pub fn is_ordered(self) -> bool {
        matches!(self, ScalarType::Integer | ScalarType::Float | ScalarType::DateTime)
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Float => "float",
            ScalarType::Boolean => "boolean",
            ScalarType::DateTime => "date-time",
        };
        f.write_str(name)
    }
}

/// Declared type of an entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Scalar(ScalarType),
    List(ScalarType),
}

impl FieldType {
    pub const STRING: FieldType = FieldType::Scalar(ScalarType::String);
    pub const INTEGER: FieldType = FieldType::Scalar(ScalarType::Integer);
    pub const FLOAT: FieldType = FieldType::Scalar(ScalarType::Float);
    pub const BOOLEAN: FieldType = FieldType::Scalar(ScalarType::Boolean);
    pub const DATE_TIME: FieldType = FieldType::Scalar(ScalarType::DateTime);

    /// The scalar type of the field, or of each element for list fields.
    pub fn element(self) -> ScalarType {
        match self {
            FieldType::Scalar(t) | FieldType::List(t) => t,
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, FieldType::List(_))
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(t) => write!(f, "{t}"),
            FieldType::List(t) => write!(f, "list of {t}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Static metadata for one attribute of an entity type.
///
/// Descriptors live in a `static` table per entity type, so the builder
/// methods are `const`:
///
/// ```
/// use domain::{FieldDescriptor, FieldType};
///
/// static FIELDS: [FieldDescriptor; 2] = [
///     FieldDescriptor::new("name", FieldType::STRING).keyword("name.keyword"),
///     FieldDescriptor::new("timestamp", FieldType::DATE_TIME).document("@timestamp"),
/// ];
///
/// assert_eq!(FIELDS[0].keyword_name(), "name.keyword");
/// assert_eq!(FIELDS[1].document_name(), "@timestamp");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    name: &'static str,
    ty: FieldType,
    document_alias: Option<&'static str>,
    keyword_alias: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            document_alias: None,
            keyword_alias: None,
        }
    }

    /// Name the field is stored under in the search document.
    pub const fn document(mut self, alias: &'static str) -> Self {
        self.document_alias = Some(alias);
        self
    }

    /// Non-analyzed name used for exact equality / membership.
    pub const fn keyword(mut self, alias: &'static str) -> Self {
        self.keyword_alias = Some(alias);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ty(&self) -> FieldType {
        self.ty
    }

    pub fn document_alias(&self) -> Option<&'static str> {
        self.document_alias
    }

    pub fn keyword_alias(&self) -> Option<&'static str> {
        self.keyword_alias
    }

    /// Document alias, else the field's own name.
    pub fn document_name(&self) -> &'static str {
        self.document_alias.unwrap_or(self.name)
    }

    /// Keyword alias, else document alias, else the field's own name.
    pub fn keyword_name(&self) -> &'static str {
        self.keyword_alias.unwrap_or_else(|| self.document_name())
    }
}
