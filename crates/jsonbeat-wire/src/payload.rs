use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Nested fixture ────────────────────────────────────────────────────────

/// One entry of the fixed `things` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thing {
    pub foo: String,
    pub baz: String,
}

/// The static `nested` block carried by every status payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nested {
    pub thing: String,
    pub things: Vec<Thing>,
}

impl Nested {
    /// `{ "thing": "something", "things": [ { "foo": "bar", "baz": "buz" } ] }`
    pub fn fixture() -> Self {
        Self {
            thing: "something".to_string(),
            things: vec![Thing {
                foo: "bar".to_string(),
                baz: "buz".to_string(),
            }],
        }
    }

    fn to_value(&self) -> Value {
        let things = self
            .things
            .iter()
            .map(|t| {
                let mut entry = Map::new();
                entry.insert("foo".to_string(), Value::from(t.foo.as_str()));
                entry.insert("baz".to_string(), Value::from(t.baz.as_str()));
                Value::Object(entry)
            })
            .collect();

        let mut map = Map::new();
        map.insert("thing".to_string(), Value::from(self.thing.as_str()));
        map.insert("things".to_string(), Value::Array(things));
        Value::Object(map)
    }
}

// ── StatusPayload ─────────────────────────────────────────────────────────

/// A decoded status chunk, as read back by stream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    /// Milliseconds since the Unix epoch at emitter startup.
    pub start: u64,
    pub nested: Nested,
    /// Milliseconds since the Unix epoch at emission.
    pub now: u64,
}

// ── Template ──────────────────────────────────────────────────────────────

/// The base record `{start, nested}` every structured write is merged onto.
///
/// Records are rebuilt on each call; nothing built here is retained.
#[derive(Debug, Clone)]
pub struct Template {
    start: u64,
    nested: Value,
}

impl Template {
    pub fn new(start: u64) -> Self {
        Self {
            start,
            nested: Nested::fixture().to_value(),
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    /// Fresh copy of `{start, nested}`.
    pub fn base(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("start".to_string(), Value::from(self.start));
        map.insert("nested".to_string(), self.nested.clone());
        map
    }

    /// Shallow merge: keys in `overrides` replace template values in place,
    /// new keys are appended after the template keys.
    pub fn merge(&self, overrides: Map<String, Value>) -> Map<String, Value> {
        let mut map = self.base();
        for (key, value) in overrides {
            map.insert(key, value);
        }
        map
    }

    /// `{start, nested, now}`.
    pub fn status(&self, now: u64) -> Map<String, Value> {
        let mut map = self.base();
        map.insert("now".to_string(), Value::from(now));
        map
    }
}
