//! Conversion of parsed JSON documents into native objects

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::finding::{Findings, Step};
use crate::object::{Key, Object};
use crate::path::Path;
use crate::specs::{Kind, Specs};

/// Convert one JSON node into its native form
///
/// Failed nodes convert to [`Object::Null`].
pub(crate) fn convert_node(node: &Value, specs: &Specs, path: &Path, findings: &mut Findings) -> Step<Object> {
    if !findings.enter(path)? {
        return Ok(Object::Null);
    }

    if node.is_null() {
        if !specs.option {
            findings.error(path, "value can't be null")?;
        }
        return Ok(Object::Null);
    }

    match &specs.kind {
        Kind::Flag => match node {
            Value::Bool(value) => Ok(Object::Flag(*value)),
            _ => expecting(path, "boolean", findings),
        },
        Kind::Integer(bounds) => {
            let Value::Number(number) = node else {
                return expecting(path, "number", findings);
            };
            let Some(value) = read_integer(number, path, findings)? else {
                return Ok(Object::Null);
            };
            let violations = bounds.check_integer(value);
            if violations.is_empty() {
                return Ok(Object::Integer(value));
            }
            for violation in violations {
                findings.error(path, violation)?;
            }
            Ok(Object::Null)
        }
        Kind::Decimal(bounds) => {
            let Some(value) = node.as_f64() else {
                return expecting(path, "number", findings);
            };
            let violations = bounds.check_decimal(value);
            if violations.is_empty() {
                return Ok(Object::Decimal(value));
            }
            for violation in violations {
                findings.error(path, violation)?;
            }
            Ok(Object::Null)
        }
        Kind::String { length, pattern } => {
            let Value::String(value) = node else {
                return expecting(path, "string", findings);
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
            Ok(if valid { Object::String(value.clone()) } else { Object::Null })
        }
        Kind::Enum { values } => {
            let Value::String(value) = node else {
                return expecting(path, "string", findings);
            };
            if !values.contains(value) {
                findings.error(path, "enum value is invalid")?;
                return Ok(Object::Null);
            }
            Ok(Object::String(value.clone()))
        }
        Kind::List { value: item_specs, length } => {
            let Value::Array(items) = node else {
                return expecting(path, "array", findings);
            };
            // element indices are meaningless once the length is wrong
            if let Some(violation) = length.and_then(|l| l.check(items.len())) {
                findings.error(path, violation)?;
                return Ok(Object::Null);
            }
            let mut converted = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                converted.push(convert_node(item, item_specs, &path.index(index), findings)?);
            }
            Ok(Object::List(converted))
        }
        Kind::Tuple { values } => {
            let Value::Array(items) = node else {
                return expecting(path, "array", findings);
            };
            if items.len() != values.len() {
                findings.error(path, format!("length of the array must be {}", values.len()))?;
                return Ok(Object::Null);
            }
            let mut converted = Vec::with_capacity(items.len());
            for (index, (item, item_specs)) in items.iter().zip(values).enumerate() {
                converted.push(convert_node(item, item_specs, &path.position(index), findings)?);
            }
            Ok(Object::Tuple(converted))
        }
        Kind::Map { fields } => {
            let Value::Object(entries) = node else {
                return expecting(path, "object", findings);
            };

            for key in entries.keys() {
                if !fields.contains_key(key) {
                    findings.error(path, format!("'{}' field was unexpected", key))?;
                }
            }

            let mut converted = IndexMap::with_capacity(fields.len());
            for (key, field_specs) in fields {
                let value = match entries.get(key) {
                    Some(entry) => convert_node(entry, field_specs, &path.field(key.as_str()), findings)?,
                    None => {
                        if !field_specs.option {
                            findings.error(path, format!("'{}' field was missing", key))?;
                        }
                        Object::Null
                    }
                };
                converted.insert(Key::String(key.clone()), value);
            }
            Ok(Object::Map(converted))
        }
    }
}

/// Read a JSON number as a 64-bit integer, truncating fractional values
fn read_integer(number: &Number, path: &Path, findings: &mut Findings) -> Step<Option<i64>> {
    if let Some(value) = number.as_i64() {
        return Ok(Some(value));
    }
    if number.is_u64() {
        findings.error(path, "integer is out of range")?;
        return Ok(None);
    }

    let value = number.as_f64().unwrap_or(f64::NAN);
    if value.fract() != 0.0 {
        findings.warning(path, "value may lose precision");
    }

    let truncated = value.trunc();
    // i64::MAX is not representable as f64; 2^63 is the first value out of range
    if !(truncated >= i64::MIN as f64 && truncated < i64::MAX as f64) {
        findings.error(path, "integer is out of range")?;
        return Ok(None);
    }
    Ok(Some(truncated as i64))
}

fn expecting(path: &Path, json_type: &str, findings: &mut Findings) -> Step<Object> {
    findings.error(path, format!("was expecting a JSON {}", json_type))?;
    Ok(Object::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(node: Value, specs: &Specs) -> (Object, Findings) {
        let mut findings = Findings::lazy();
        let object = convert_node(&node, specs, &Path::root(), &mut findings).unwrap();
        (object, findings)
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
        assert_eq!(convert(json!(false), &Specs::flag()).0, Object::Flag(false));
        assert_eq!(convert(json!(-3), &Specs::integer()).0, Object::Integer(-3));
        assert_eq!(convert(json!(2), &Specs::decimal()).0, Object::Decimal(2.0));
        assert_eq!(convert(json!("x"), &Specs::string()).0, Object::from("x"));
        assert_eq!(
            convert(json!("b"), &Specs::enumeration(["a", "b"])).0,
            Object::from("b")
        );
    }

    #[test]
    fn test_type_mismatches() {
        let cases = [
            (json!(1), Specs::flag(), "was expecting a JSON boolean"),
            (json!("1"), Specs::integer(), "was expecting a JSON number"),
            (json!(true), Specs::decimal(), "was expecting a JSON number"),
            (json!(1), Specs::string(), "was expecting a JSON string"),
            (json!(1), Specs::enumeration(["a"]), "was expecting a JSON string"),
            (json!({}), Specs::list(Specs::flag()), "was expecting a JSON array"),
            (json!([]), Specs::map([("a", Specs::flag())]), "was expecting a JSON object"),
        ];
        for (node, specs, message) in cases {
            let (object, findings) = convert(node, &specs);
            assert_eq!(object, Object::Null);
            assert_eq!(findings.errors()[0].message, message);
        }
    }

    #[test]
    fn test_integer_precision() {
        let (object, findings) = convert(json!(4.75), &Specs::integer());
        assert_eq!(object, Object::Integer(4));
        assert!(!findings.has_errors());
        assert_eq!(findings.warnings()[0].message, "value may lose precision");

        let (object, findings) = convert(json!(4.0), &Specs::integer());
        assert_eq!(object, Object::Integer(4));
        assert!(!findings.has_warnings());
    }

    #[test]
    fn test_integer_out_of_range() {
        let (_, findings) = convert(json!(u64::MAX), &Specs::integer());
        assert_eq!(messages(&findings), vec!["$: integer is out of range"]);

        let (_, findings) = convert(json!(1e300), &Specs::integer());
        assert_eq!(messages(&findings), vec!["$: integer is out of range"]);
    }

    #[test]
    fn test_string_checks_are_independent() {
        let specs = Specs::string()
            .length(3)
            .pattern(crate::specs::Pattern::new("[0-9]").unwrap());
        let (object, findings) = convert(json!("abcd"), &specs);
        assert_eq!(object, Object::Null);
        assert_eq!(
            messages(&findings),
            vec!["$: length must be equal to 3", "$: value did not match the pattern"]
        );

        // multi-byte characters count once
        let (object, _) = convert(json!("été"), &Specs::string().length(3));
        assert_eq!(object, Object::from("été"));
    }

    #[test]
    fn test_enum_membership() {
        let (_, findings) = convert(json!("c"), &Specs::enumeration(["a", "b"]));
        assert_eq!(messages(&findings), vec!["$: enum value is invalid"]);
    }

    #[test]
    fn test_list_length_stops_descent() {
        let specs = Specs::list(Specs::integer()).length_range(Some(4), None);
        let (_, findings) = convert(json!([true, "x"]), &specs);
        assert_eq!(messages(&findings), vec!["$: length must be equal or greater than 4"]);
    }

    #[test]
    fn test_list_keeps_partial_elements() {
        let (object, findings) = convert(json!([1, "x", 3]), &Specs::list(Specs::integer()));
        assert_eq!(
            object,
            Object::List(vec![Object::Integer(1), Object::Null, Object::Integer(3)])
        );
        assert_eq!(messages(&findings), vec!["$.[1]: was expecting a JSON number"]);
    }

    #[test]
    fn test_tuple_positions() {
        let specs = Specs::tuple([Specs::flag(), Specs::integer()]);
        let (object, _) = convert(json!([true, 1]), &specs);
        assert_eq!(object, Object::tuple([Object::Flag(true), Object::Integer(1)]));

        let (_, findings) = convert(json!([1, true]), &specs);
        assert_eq!(
            messages(&findings),
            vec![
                "$.<0>: was expecting a JSON boolean",
                "$.<1>: was expecting a JSON number",
            ]
        );
    }

    #[test]
    fn test_map_unexpected_then_declared_fields() {
        let specs = Specs::map([("foo", Specs::flag()), ("bar", Specs::integer())]);
        let (object, findings) = convert(json!({"qux": 1, "foo": 2}), &specs);
        assert_eq!(
            messages(&findings),
            vec![
                "$: 'qux' field was unexpected",
                "$.{foo}: was expecting a JSON boolean",
                "$: 'bar' field was missing",
            ]
        );
        assert_eq!(object, Object::map([("foo", Object::Null), ("bar", Object::Null)]));
    }
}
