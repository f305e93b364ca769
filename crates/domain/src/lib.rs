// crates/domain/src/lib.rs
//
// Entity model, typed field values and the filter AST shared by every store.

pub mod entity;
pub mod error;
pub mod factory;
pub mod field;
pub mod filter;
pub mod operator;
pub mod value;

#[cfg(test)]
mod fixtures;

pub use entity::{Entity, FieldValues, Generic, Record};
pub use error::{Error, Result};
pub use factory::FilterFactory;
pub use field::{FieldDescriptor, FieldType, ScalarType};
pub use filter::{Comparison, Filter, FilterDescription, Membership, Range};
pub use operator::Operator;
pub use value::{FromValue, Value};
