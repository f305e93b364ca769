// crates/domain/src/operator.rs

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Closed operator vocabulary. The serialized strings are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "is_not")]
    IsNot,
    #[serde(rename = "is_in")]
    IsOneOf,
    #[serde(rename = "is_not_in")]
    IsNotOneOf,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "exists")]
    Exists,
    #[serde(rename = "does_not_exist")]
    DoesNotExist,
    #[serde(rename = "or")]
    Or,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Is,
        Operator::IsNot,
        Operator::IsOneOf,
        Operator::IsNotOneOf,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::Exists,
        Operator::DoesNotExist,
        Operator::Or,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Is => "is",
            Operator::IsNot => "is_not",
            Operator::IsOneOf => "is_in",
            Operator::IsNotOneOf => "is_not_in",
            Operator::GreaterThan => "gt",
            Operator::LessThan => "lt",
            Operator::Exists => "exists",
            Operator::DoesNotExist => "does_not_exist",
            Operator::Or => "or",
        }
    }

    /// Human label used in validation messages.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Operator::Is => "Is",
            Operator::IsNot => "Is Not",
            Operator::IsOneOf => "Is One Of",
            Operator::IsNotOneOf => "Is Not One Of",
            Operator::GreaterThan => "Greater Than",
            Operator::LessThan => "Less Than",
            Operator::Exists => "Exists",
            Operator::DoesNotExist => "Does Not Exist",
            Operator::Or => "Or",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::InvalidOperator(s.to_string()))
    }
}
