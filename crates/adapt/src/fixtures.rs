// crates/adapt/src/fixtures.rs

use chrono::{NaiveDate, NaiveDateTime};
use domain::{Entity, FieldDescriptor, FieldType, FieldValues, Result, Value};

static ITEM_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::new("key", FieldType::STRING),
    FieldDescriptor::new("count", FieldType::INTEGER),
    FieldDescriptor::new("name", FieldType::STRING).keyword("name.keyword"),
    FieldDescriptor::new("timestamp", FieldType::DATE_TIME).document("@timestamp"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub key: String,
    pub count: i64,
    pub name: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
}

impl Entity for Item {
    fn fields() -> &'static [FieldDescriptor] {
        &ITEM_FIELDS
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

pub fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

/// Keys "1".."5", counts 1,2,2,4,5.
pub fn entities() -> Vec<Item> {
    [
        ("1", 1, dt(2023, 1, 1)),
        ("2", 2, dt(2023, 2, 1)),
        ("3", 2, dt(2024, 1, 1)),
        ("4", 4, dt(2024, 2, 1)),
        ("5", 5, dt(2024, 3, 1)),
    ]
    .into_iter()
    .map(|(key, count, timestamp)| Item {
        key: key.to_string(),
        count,
        name: Some(format!("test {key}")),
        timestamp: Some(timestamp),
    })
    .collect()
}

pub fn field(name: &str) -> &'static FieldDescriptor {
    Item::field(name).expect("declared item field")
}
