// crates/domain/src/fixtures.rs
//
// Shared test entity: five records keyed "1".."5".

use chrono::{NaiveDate, NaiveDateTime};

use crate::entity::{Entity, FieldValues};
use crate::error::Result;
use crate::field::{FieldDescriptor, FieldType, ScalarType};
use crate::value::Value;

static TEST_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::new("key", FieldType::STRING),
    FieldDescriptor::new("count", FieldType::INTEGER),
    FieldDescriptor::new("name", FieldType::STRING).keyword("name.keyword"),
    FieldDescriptor::new("timestamp", FieldType::DATE_TIME).document("@timestamp"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct TestEntity {
    pub key: String,
    pub count: i64,
    pub name: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
}

impl Entity for TestEntity {
    fn fields() -> &'static [FieldDescriptor] {
        &TEST_FIELDS
    }

    fn value(&self, field: &str) -> Option<Value> {
        match field {
            "key" => Some(self.key.clone().into()),
            "count" => Some(self.count.into()),
            "name" => self.name.clone().map(Value::from),
            "timestamp" => self.timestamp.map(Value::from),
            _ => None,
        }
    }

    fn from_values(mut values: FieldValues) -> Result<Self> {
        Ok(Self {
            key: values.required("key")?,
            count: values.required("count")?,
            name: values.optional("name")?,
            timestamp: values.optional("timestamp")?,
        })
    }
}

/// Entity with a list field and a float field.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub tags: Option<Vec<String>>,
    pub score: Option<f64>,
}

static TAGGED_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::new("tags", FieldType::List(ScalarType::String)),
    FieldDescriptor::new("score", FieldType::FLOAT),
];

impl Entity for Tagged {
    fn fields() -> &'static [FieldDescriptor] {
        &TAGGED_FIELDS
    }

    fn value(&self, field: &str) -> Option<Value> {
        match field {
            "tags" => self.tags.clone().map(Value::from),
            "score" => self.score.map(Value::from),
            _ => None,
        }
    }

    fn from_values(mut values: FieldValues) -> Result<Self> {
        Ok(Self {
            tags: values.optional("tags")?,
            score: values.optional("score")?,
        })
    }
}

pub fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

pub fn test_entities() -> Vec<TestEntity> {
    [
        ("1", 1, dt(2023, 1, 1)),
        ("2", 2, dt(2023, 2, 1)),
        ("3", 2, dt(2024, 1, 1)),
        ("4", 4, dt(2024, 2, 1)),
        ("5", 5, dt(2024, 3, 1)),
    ]
    .into_iter()
    .map(|(key, count, timestamp)| TestEntity {
        key: key.to_string(),
        count,
        name: Some(format!("test {key}")),
        timestamp: Some(timestamp),
    })
    .collect()
}

pub fn field(name: &str) -> &'static FieldDescriptor {
    TestEntity::field(name).expect("declared test field")
}
