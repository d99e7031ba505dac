//! Native objects and their conversion to JSON documents
//!
//! [`Object`] is the in-memory value a document converts to. It keeps lists
//! and tuples apart and lets map keys be something other than strings, so a
//! value built by application code can be checked before it is serialized.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;

use crate::finding::{Findings, Step};
use crate::path::Path;
use crate::specs::{Kind, Specs};

/// Key of a native map
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    String(String),
    Integer(i64),
    Flag(bool),
}

impl Key {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::String(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::String(key) => write!(f, "{}", key),
            Key::Integer(key) => write!(f, "{}", key),
            Key::Flag(key) => write!(f, "{}", key),
        }
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Key::String(key.to_string())
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Key::String(key)
    }
}

impl From<i64> for Key {
    fn from(key: i64) -> Self {
        Key::Integer(key)
    }
}

impl From<bool> for Key {
    fn from(key: bool) -> Self {
        Key::Flag(key)
    }
}

/// A native value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Object {
    #[default]
    Null,
    Flag(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    List(Vec<Object>),
    Tuple(Vec<Object>),
    Map(IndexMap<Key, Object>),
}

impl Object {
    /// Build a tuple
    pub fn tuple<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Object>,
    {
        Object::Tuple(items.into_iter().collect())
    }

    /// Build a map from key/value pairs, keeping their order
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Object)>,
        K: Into<Key>,
    {
        Object::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Flag(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Object::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Object::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::String(value) => Some(value),
            _ => None,
        }
    }

    /// Look up a map entry by string key
    pub fn get(&self, key: &str) -> Option<&Object> {
        match self {
            Object::Map(entries) => entries.get(&Key::from(key)),
            _ => None,
        }
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Object::Flag(value)
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Object::Integer(value)
    }
}

impl From<f64> for Object {
    fn from(value: f64) -> Self {
        Object::Decimal(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Object::String(value.to_string())
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Object::String(value)
    }
}

impl From<Vec<Object>> for Object {
    fn from(items: Vec<Object>) -> Self {
        Object::List(items)
    }
}

impl<T: Into<Object>> From<Option<T>> for Object {
    fn from(value: Option<T>) -> Self {
        value.map_or(Object::Null, Into::into)
    }
}

/// Convert one native node into its JSON form
///
/// Failed nodes convert to `null`; the caller decides from the accumulated
/// errors whether the result is usable.
pub(crate) fn convert_node(object: &Object, specs: &Specs, path: &Path, findings: &mut Findings) -> Step<Value> {
    if !findings.enter(path)? {
        return Ok(Value::Null);
    }

    if object.is_null() {
        if !specs.option {
            findings.error(path, "value can't be null")?;
        }
        return Ok(Value::Null);
    }

    match &specs.kind {
        Kind::Flag => match object {
            Object::Flag(value) => Ok(Value::Bool(*value)),
            _ => expecting(path, "a boolean", findings),
        },
        Kind::Integer(bounds) => {
            let Object::Integer(value) = object else {
                return expecting(path, "an integer", findings);
            };
            let violations = bounds.check_integer(*value);
            if violations.is_empty() {
                return Ok(Value::from(*value));
            }
            for violation in violations {
                findings.error(path, violation)?;
            }
            Ok(Value::Null)
        }
        Kind::Decimal(bounds) => {
            let Object::Decimal(value) = object else {
                return expecting(path, "a float", findings);
            };
            if !value.is_finite() {
                findings.error(path, "float must be finite")?;
                return Ok(Value::Null);
            }
            let violations = bounds.check_decimal(*value);
            if violations.is_empty() {
                return Ok(Value::from(*value));
            }
            for violation in violations {
                findings.error(path, violation)?;
            }
            Ok(Value::Null)
        }
        Kind::String { length, pattern } => {
            let Object::String(value) = object else {
                return expecting(path, "a string", findings);
            };
            let mut valid = true;
            if let Some(violation) = length.and_then(|l| l.check(value.chars().count())) {
                findings.error(path, violation)?;
                valid = false;
            }
            if let Some(pattern) = pattern {
                if !pattern.matches(value) {
                    findings.error(path, "value did not match the pattern")?;
                    valid = false;
                }
            }
            Ok(if valid { Value::String(value.clone()) } else { Value::Null })
        }
        Kind::Enum { values } => {
            let Object::String(value) = object else {
                return expecting(path, "a string", findings);
            };
            if !values.contains(value) {
                findings.error(path, "enum value is invalid")?;
                return Ok(Value::Null);
            }
            Ok(Value::String(value.clone()))
        }
        Kind::List { value: item_specs, length } => {
            let Object::List(items) = object else {
                return expecting(path, "a list", findings);
            };
            if let Some(violation) = length.and_then(|l| l.check(items.len())) {
                findings.error(path, violation)?;
                return Ok(Value::Null);
            }
            let mut converted = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                converted.push(convert_node(item, item_specs, &path.index(index), findings)?);
            }
            Ok(Value::Array(converted))
        }
        Kind::Tuple { values } => {
            let Object::Tuple(items) = object else {
                return expecting(path, "a tuple", findings);
            };
            if items.len() != values.len() {
                findings.error(path, format!("length of the tuple must be {}", values.len()))?;
                return Ok(Value::Null);
            }
            let mut converted = Vec::with_capacity(items.len());
            for (index, (item, item_specs)) in items.iter().zip(values).enumerate() {
                converted.push(convert_node(item, item_specs, &path.position(index), findings)?);
            }
            Ok(Value::Array(converted))
        }
        Kind::Map { fields } => {
            let Object::Map(entries) = object else {
                return expecting(path, "a dict", findings);
            };
            if entries.keys().any(|key| key.as_str().is_none()) {
                findings.error(path, "keys of the dict must be string exclusively")?;
                return Ok(Value::Null);
            }

            for key in entries.keys().filter_map(Key::as_str) {
                if !fields.contains_key(key) {
                    findings.error(path, format!("'{}' field was unexpected", key))?;
                }
            }

            let mut converted = Map::with_capacity(fields.len());
            for (key, field_specs) in fields {
                let value = match entries.get(&Key::from(key.as_str())) {
                    Some(entry) => convert_node(entry, field_specs, &path.field(key.as_str()), findings)?,
                    None => {
                        if !field_specs.option {
                            findings.error(path, format!("'{}' field was missing", key))?;
                        }
                        Value::Null
                    }
                };
                converted.insert(key.clone(), value);
            }
            Ok(Value::Object(converted))
        }
    }
}

fn expecting(path: &Path, what: &str, findings: &mut Findings) -> Step<Value> {
    findings.error(path, format!("was expecting {}", what))?;
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(object: &Object, specs: &Specs) -> (Value, Findings) {
        let mut findings = Findings::lazy();
        let value = convert_node(object, specs, &Path::root(), &mut findings).unwrap();
        (value, findings)
    }

    fn messages(findings: &Findings) -> Vec<String> {
        findings
            .errors()
            .iter()
            .map(|f| format!("{}: {}", f.path, f.message))
            .collect()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(convert(&Object::Flag(true), &Specs::flag()).0, json!(true));
        assert_eq!(convert(&Object::Integer(7), &Specs::integer()).0, json!(7));
        assert_eq!(convert(&Object::Decimal(0.5), &Specs::decimal()).0, json!(0.5));
        assert_eq!(convert(&Object::from("hi"), &Specs::string()).0, json!("hi"));
    }

    #[test]
    fn test_flag_is_not_an_integer() {
        let (_, findings) = convert(&Object::Flag(true), &Specs::integer());
        assert_eq!(messages(&findings), vec!["$: was expecting an integer"]);

        let (_, findings) = convert(&Object::Integer(1), &Specs::decimal());
        assert_eq!(messages(&findings), vec!["$: was expecting a float"]);
    }

    #[test]
    fn test_null_handling() {
        let (value, findings) = convert(&Object::Null, &Specs::flag().optional());
        assert_eq!(value, Value::Null);
        assert!(!findings.has_errors());

        let (_, findings) = convert(&Object::Null, &Specs::flag());
        assert_eq!(messages(&findings), vec!["$: value can't be null"]);
    }

    #[test]
    fn test_non_finite_decimal() {
        let (_, findings) = convert(&Object::Decimal(f64::INFINITY), &Specs::decimal());
        assert_eq!(messages(&findings), vec!["$: float must be finite"]);
    }

    #[test]
    fn test_list_is_not_a_tuple() {
        let specs = Specs::tuple([Specs::flag()]);
        let (_, findings) = convert(&Object::List(vec![Object::Flag(true)]), &specs);
        assert_eq!(messages(&findings), vec!["$: was expecting a tuple"]);

        let (_, findings) = convert(&Object::tuple([Object::Flag(true), Object::Flag(false)]), &specs);
        assert_eq!(messages(&findings), vec!["$: length of the tuple must be 1"]);
    }

    #[test]
    fn test_map_keys_must_be_strings() {
        let specs = Specs::map([("foo", Specs::flag())]);
        let object = Object::map([(Key::from("foo"), Object::Flag(true)), (Key::from(1_i64), Object::Null)]);
        let (value, findings) = convert(&object, &specs);
        assert_eq!(value, Value::Null);
        assert_eq!(messages(&findings), vec!["$: keys of the dict must be string exclusively"]);
    }

    #[test]
    fn test_map_fields() {
        let specs = Specs::map([
            ("foo", Specs::flag()),
            ("bar", Specs::integer().optional()),
            ("baz", Specs::string()),
        ]);
        let object = Object::map([("qux", Object::Integer(1)), ("foo", Object::Integer(2))]);
        let (value, findings) = convert(&object, &specs);

        assert_eq!(
            messages(&findings),
            vec![
                "$: 'qux' field was unexpected",
                "$.{foo}: was expecting a boolean",
                "$: 'baz' field was missing",
            ]
        );
        assert_eq!(value, json!({"foo": null, "bar": null, "baz": null}));
    }

    #[test]
    fn test_output_follows_declaration_order() {
        let specs = Specs::map([("b", Specs::integer()), ("a", Specs::integer())]);
        let object = Object::map([("a", Object::Integer(1)), ("b", Object::Integer(2))]);
        let (value, _) = convert(&object, &specs);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"b":2,"a":1}"#);
    }

    #[test]
    fn test_object_helpers() {
        let object = Object::map([("foo", Object::from(Some(3_i64)))]);
        assert_eq!(object.get("foo").and_then(Object::as_i64), Some(3));
        assert_eq!(Object::from(None::<bool>), Object::Null);
        assert_eq!(Key::Flag(true).to_string(), "true");
    }
}
