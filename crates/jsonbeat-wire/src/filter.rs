//! GraphQL-style field selection over JSON values.
//!
//! A query such as `{ now nested { thing } }` keeps only the named keys of
//! every object, recursing into nested objects and into each element of
//! arrays. A field with `(entries: true)` turns a map into a list of
//! `{ "key": ..., "value": ... }` objects before selecting into it.

use std::io;

use graphql_parser::query::{self as gql, Definition, OperationDefinition, SelectionSet};
use serde_json::{Map, Value};

use crate::decoder::Decoder;
use crate::error::{DecodeError, FilterError};

// ── Selection ─────────────────────────────────────────────────────────────

/// One node of the selection tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Leaf key. Compound values under it keep their shape but lose their keys.
    Field(String),
    Object(String, Vec<Selection>),
    /// Map rewritten as `[{key, value}]`, then filtered element-wise.
    Entries(String, Vec<Selection>),
}

// ── Filter ────────────────────────────────────────────────────────────────

/// A parsed query, reusable across values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    selection: Vec<Selection>,
}

impl Filter {
    /// Parses a query. Only the first definition counts; a mutation,
    /// subscription, or fragment there yields an empty selection.
    pub fn parse(query: &str) -> Result<Self, FilterError> {
        let doc = gql::parse_query::<&str>(query).map_err(|err| FilterError::Query(err.to_string()))?;

        let selection = match doc.definitions.into_iter().next() {
            Some(Definition::Operation(OperationDefinition::SelectionSet(set))) => selections(set)?,
            Some(Definition::Operation(OperationDefinition::Query(q))) => selections(q.selection_set)?,
            _ => Vec::new(),
        };
        Ok(Self { selection })
    }

    pub fn selection(&self) -> &[Selection] {
        &self.selection
    }

    pub fn apply(&self, value: &Value) -> Value {
        apply(&self.selection, value)
    }

    /// Decodes a concatenated stream from `reader`, filtering each value.
    pub fn apply_stream<'a, R: io::Read + 'a>(
        &'a self,
        reader: R,
    ) -> impl Iterator<Item = Result<Value, DecodeError>> + 'a {
        Decoder::new(reader).map(move |item| item.map(|value| self.apply(&value)))
    }
}

/// Parses `query` and applies it to `value`.
pub fn filter_value(query: &str, value: &Value) -> Result<Value, FilterError> {
    Ok(Filter::parse(query)?.apply(value))
}

/// Parses `query` and applies it to the single JSON document `json`.
pub fn filter_str(query: &str, json: &str) -> Result<Value, FilterError> {
    let filter = Filter::parse(query)?;
    let value: Value = serde_json::from_str(json).map_err(|err| FilterError::Json(err.to_string()))?;
    Ok(filter.apply(&value))
}

// ── Query → selection tree ────────────────────────────────────────────────

fn selections<'a>(set: SelectionSet<'a, &'a str>) -> Result<Vec<Selection>, FilterError> {
    let mut out = Vec::new();
    for item in set.items {
        // Fragment spreads and inline fragments select nothing.
        let gql::Selection::Field(field) = item else {
            continue;
        };
        let name = field.name.to_string();
        let children = selections(field.selection_set)?;

        if entries_requested(&name, &field.arguments)? {
            out.push(Selection::Entries(name, children));
        } else if children.is_empty() {
            out.push(Selection::Field(name));
        } else {
            out.push(Selection::Object(name, children));
        }
    }
    Ok(out)
}

/// `entries` is the only argument understood, and it must be a boolean.
fn entries_requested<'a>(
    field: &str,
    arguments: &[(&'a str, gql::Value<'a, &'a str>)],
) -> Result<bool, FilterError> {
    let mut entries = false;
    for (name, value) in arguments {
        match (*name, value) {
            ("entries", gql::Value::Boolean(flag)) => entries |= *flag,
            _ => {
                return Err(FilterError::Argument {
                    field: field.to_string(),
                    argument: format!("{name}: {value:?}"),
                });
            }
        }
    }
    Ok(entries)
}

// ── Apply ─────────────────────────────────────────────────────────────────

fn apply(selection: &[Selection], value: &Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(apply_object(selection, object)),
        Value::Array(items) => Value::Array(items.iter().map(|v| apply(selection, v)).collect()),
        _ => value.clone(),
    }
}

fn apply_object(selection: &[Selection], object: &Map<String, Value>) -> Map<String, Value> {
    let mut map = Map::new();
    for item in selection {
        match item {
            Selection::Field(name) => {
                if let Some(value) = object.get(name) {
                    map.insert(name.clone(), apply(&[], value));
                }
            }
            Selection::Object(name, children) => {
                if let Some(value) = object.get(name) {
                    map.insert(name.clone(), apply(children, value));
                }
            }
            Selection::Entries(name, children) => {
                if let Some(value) = object.get(name) {
                    let filtered = match value {
                        Value::Object(entries) => Value::Array(
                            entries
                                .iter()
                                .map(|(key, value)| apply(children, &entry(key, value)))
                                .collect(),
                        ),
                        other => apply(children, other),
                    };
                    map.insert(name.clone(), filtered);
                }
            }
        }
    }
    map
}

fn entry(key: &str, value: &Value) -> Value {
    let mut map = Map::new();
    map.insert("key".to_string(), Value::from(key));
    map.insert("value".to_string(), value.clone());
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stream_of_objects() {
        let data = r#"{
            "foo": "bar",
            "baz": "buz"
        }{"foo":"again","baz":"buz"}"#;
        let filter = Filter::parse("{ foo }").unwrap();
        let out = filter
            .apply_stream(data.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(out, vec![json!({"foo":"bar"}), json!({"foo":"again"})]);
    }

    #[test]
    fn single_value() {
        let data = json!({ "foo": "bar", "baz": "buz" });
        assert_eq!(filter_value("{ foo }", &data).unwrap().to_string(), r#"{"foo":"bar"}"#);
    }

    #[test]
    fn json_string() {
        let data = r#"{
            "foo": "bar",
            "baz": "buz"
        }"#;
        assert_eq!(filter_str("{ foo }", data).unwrap().to_string(), r#"{"foo":"bar"}"#);
    }

    #[test]
    fn nested_objects() {
        let data = json!({ "nested": { "foo": "bar", "baz": "buz" } });
        let out = filter_value("{ nested { foo } }", &data).unwrap();
        assert_eq!(out.to_string(), r#"{"nested":{"foo":"bar"}}"#);
    }

    #[test]
    fn nested_arrays() {
        let data = json!({
            "nested": [
                { "foo": "bar", "baz": "buz" },
                { "foo": "bar", "baz": "buz" }
            ]
        });
        let out = filter_value("{ nested { foo } }", &data).unwrap();
        assert_eq!(out.to_string(), r#"{"nested":[{"foo":"bar"},{"foo":"bar"}]}"#);
    }

    #[test]
    fn dictionary_entries() {
        let data = json!({
            "dict": {
                "item1": { "name": "item one" },
                "item2": { "name": "item two" },
            },
        });
        let out = filter_value("{ dict(entries: true) { value { name } } }", &data).unwrap();
        assert_eq!(
            out.to_string(),
            r#"{"dict":[{"value":{"name":"item one"}},{"value":{"name":"item two"}}]}"#
        );
    }

    #[test]
    fn entries_false_is_plain_object() {
        let data = json!({ "dict": { "a": { "name": "x", "id": 1 } } });
        let out = filter_value("{ dict(entries: false) { a { name } } }", &data).unwrap();
        assert_eq!(out, json!({ "dict": { "a": { "name": "x" } } }));
    }

    #[test]
    fn selects_from_status_payload() {
        let data = json!({
            "start": 1,
            "nested": { "thing": "something", "things": [{ "foo": "bar", "baz": "buz" }] },
            "now": 101
        });
        let out = filter_value("{ now nested { things { baz } } }", &data).unwrap();
        assert_eq!(out, json!({ "now": 101, "nested": { "things": [{ "baz": "buz" }] } }));
    }

    #[test]
    fn missing_keys_are_skipped() {
        let out = filter_value("{ foo missing }", &json!({ "foo": 1 })).unwrap();
        assert_eq!(out, json!({ "foo": 1 }));
    }

    #[test]
    fn leaf_on_object_keeps_no_keys() {
        let out = filter_value("{ nested }", &json!({ "nested": { "a": 1 } })).unwrap();
        assert_eq!(out, json!({ "nested": {} }));
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(filter_value("{ foo }", &json!(42)).unwrap(), json!(42));
    }

    #[test]
    fn named_query_is_accepted() {
        let filter = Filter::parse("query Pick { foo }").unwrap();
        assert_eq!(filter.selection(), &[Selection::Field("foo".to_string())]);
    }

    #[test]
    fn mutation_selects_nothing() {
        let filter = Filter::parse("mutation { foo }").unwrap();
        assert!(filter.selection().is_empty());
    }

    #[test]
    fn bad_query_is_an_error() {
        assert!(matches!(Filter::parse("{ foo"), Err(FilterError::Query(_))));
    }

    #[test]
    fn unknown_argument_is_an_error() {
        let err = Filter::parse("{ dict(limit: 3) { key } }").unwrap_err();
        assert!(matches!(err, FilterError::Argument { ref field, .. } if field == "dict"));
    }

    #[test]
    fn non_boolean_entries_is_an_error() {
        let err = Filter::parse(r#"{ dict(entries: "yes") }"#).unwrap_err();
        assert!(matches!(err, FilterError::Argument { .. }));
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(filter_str("{ foo }", "{"), Err(FilterError::Json(_))));
    }
}
