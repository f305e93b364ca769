// crates/edge/tests/http_store.rs
//
// SearchStore over HttpSearchClient against a scripted loopback server.

mod support;

use adapt::Store;
use chrono::{NaiveDate, NaiveDateTime};
use domain::{Entity, FieldDescriptor, FieldType, FieldValues, Filter, Value};
use edge::{HttpSearchClient, SearchSettings};
use serde_json::json;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static EVENT_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::new("key", FieldType::STRING),
    FieldDescriptor::new("count", FieldType::INTEGER),
    FieldDescriptor::new("timestamp", FieldType::DATE_TIME).document("@timestamp"),
];

#[derive(Debug, Clone, PartialEq)]
struct Event {
    key: String,
    count: i64,
    timestamp: Option<NaiveDateTime>,
}

impl Entity for Event {
    fn fields() -> &'static [FieldDescriptor] {
        &EVENT_FIELDS
    }

    fn value(&self, field: &str) -> Option<Value> {
        match field {
            "key" => Some(self.key.clone().into()),
            "count" => Some(self.count.into()),
            "timestamp" => self.timestamp.map(Value::from),
            _ => None,
        }
    }

    fn from_values(mut values: FieldValues) -> domain::Result<Self> {
        Ok(Self {
            key: values.required("key")?,
            count: values.required("count")?,
            timestamp: values.optional("timestamp")?,
        })
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

fn timestamp(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

#[test]
fn crud_and_read_over_http() {
    init_tracing();

    let event = Event {
        key: "7".into(),
        count: 3,
        timestamp: Some(timestamp(2024, 2, 1)),
    };
    let source = json!({ "key": "7", "count": 3, "@timestamp": "2024-02-01T00:00:00" });

    let (url, server) = support::serve(vec![
        ("200 OK", json!({ "acknowledged": true }).to_string()),
        ("201 Created", json!({ "result": "created" }).to_string()),
        (
            "200 OK",
            json!({ "_id": "7", "found": true, "_source": source }).to_string(),
        ),
        (
            "200 OK",
            json!({ "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [ { "_id": "7", "_source": source } ]
            } })
            .to_string(),
        ),
        ("404 Not Found", json!({ "result": "not_found" }).to_string()),
    ]);

    let mut settings = SearchSettings::new(url);
    settings.timeout_ms = 5_000;
    settings.max_hits = 25;
    let store = HttpSearchClient::new(settings).unwrap().store::<Event>("events");

    store.ensure_index().unwrap();
    store.create(&event, "7").unwrap();
    assert_eq!(store.get("7").unwrap(), event);

    let field = Event::field("timestamp").unwrap();
    let found = store
        .read(&[Filter::greater_than(field, timestamp(2024, 1, 1)).unwrap()])
        .unwrap();
    assert_eq!(found, vec![event]);

    assert!(store.delete("8").unwrap_err().is_not_found());

    let requests = server.join().unwrap();
    assert!(requests[0].starts_with("PUT /events HTTP/1.1"));
    assert!(requests[0].contains(r#""@timestamp":{"type":"date_nanos"}"#));
    assert!(requests[1].starts_with("PUT /events/_doc/7?refresh=true HTTP/1.1"));
    assert!(requests[2].starts_with("GET /events/_doc/7 HTTP/1.1"));
    assert!(requests[3].starts_with("POST /events/_search?size=25&track_total_hits=true HTTP/1.1"));
    assert!(requests[3].ends_with(
        r#"{"query":{"bool":{"filter":[{"range":{"@timestamp":{"gt":"2024-01-01T00:00:00"}}}]}}}"#
    ));
    assert!(requests[4].starts_with("DELETE /events/_doc/8?refresh=true HTTP/1.1"));
}
