//! Structural validation of raw specs descriptions
//!
//! The walk both checks the raw value and builds the [`Specs`] tree, so a
//! node is returned only when neither it nor any of its children produced an
//! error.

use std::collections::HashSet;

use serde_json::{Map, Number, Value};

use super::{is_valid_name, Kind, Pattern, Specs};
use crate::bounds::{Bound, Length, NumericBounds};
use crate::finding::{Findings, Step};
use crate::path::Path;

/// Properties accepted on every node
const COMMON_PROPERTIES: [&str; 4] = ["type", "option", "name", "description"];

fn kind_properties(kind: &str) -> &'static [&'static str] {
    match kind {
        "integer" | "decimal" => &["minimum", "maximum"],
        "string" => &["length", "pattern"],
        "enum" => &["values"],
        "list" => &["value", "length"],
        "tuple" => &["values", "items"],
        "map" => &["fields"],
        _ => &[],
    }
}

/// Report every key of `object` outside `allowed`, in sorted order
fn check_unexpected(
    object: &Map<String, Value>,
    allowed: &[&str],
    path: &Path,
    findings: &mut Findings,
) -> Step<()> {
    let mut unexpected: Vec<&String> = object
        .keys()
        .filter(|key| !allowed.contains(&key.as_str()))
        .collect();
    unexpected.sort();

    for key in unexpected {
        findings.error(path, format!("'{}' property is unexpected", key))?;
    }
    Ok(())
}

fn is_integral(number: &Number) -> bool {
    number.is_i64() || number.is_u64()
}

pub(crate) fn validate_node(raw: &Value, path: &Path, findings: &mut Findings) -> Step<Option<Specs>> {
    if !findings.enter(path)? {
        return Ok(None);
    }

    let Some(node) = raw.as_object() else {
        findings.error(path, "value must be a dict")?;
        return Ok(None);
    };

    let kind_name = match node.get("type") {
        None => {
            findings.error(path, "'type' property is missing")?;
            return Ok(None);
        }
        Some(Value::String(name)) if Kind::NAMES.contains(&name.as_str()) => name.as_str(),
        Some(_) => {
            findings.error(path, "value of 'type' is incorrect")?;
            return Ok(None);
        }
    };

    let errors_before = findings.errors().len();

    let allowed: Vec<&str> = COMMON_PROPERTIES
        .iter()
        .chain(kind_properties(kind_name))
        .copied()
        .collect();
    check_unexpected(node, &allowed, path, findings)?;

    let kind = match kind_name {
        "flag" => Some(Kind::Flag),
        "integer" => Some(Kind::Integer(validate_bounds(node, path, true, findings)?)),
        "decimal" => Some(Kind::Decimal(validate_bounds(node, path, false, findings)?)),
        "string" => {
            let length = validate_length(node, path, findings)?;
            let pattern = validate_pattern(node, path, findings)?;
            Some(Kind::String { length, pattern })
        }
        "enum" => validate_enum(node, path, findings)?,
        "list" => validate_list(node, path, findings)?,
        "tuple" => validate_tuple(node, path, findings)?,
        "map" => validate_map(node, path, findings)?,
        _ => None,
    };

    let name = validate_text(node, "name", path, findings)?;
    let description = validate_text(node, "description", path, findings)?;

    let option = match node.get("option") {
        None => false,
        Some(Value::Bool(option)) => *option,
        Some(_) => {
            findings.error(&path.property("option"), "value must be a bool")?;
            false
        }
    };

    match kind {
        Some(kind) if findings.errors().len() == errors_before => Ok(Some(Specs {
            kind,
            option,
            name,
            description,
        })),
        _ => Ok(None),
    }
}

fn validate_text(
    node: &Map<String, Value>,
    key: &str,
    path: &Path,
    findings: &mut Findings,
) -> Step<Option<String>> {
    match node.get(key) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => {
            findings.error(&path.property(key), "value must be a string")?;
            Ok(None)
        }
    }
}

fn validate_bounds(
    node: &Map<String, Value>,
    path: &Path,
    integral: bool,
    findings: &mut Findings,
) -> Step<NumericBounds> {
    let minimum = validate_bound(node, "minimum", path, integral, findings)?;
    let maximum = validate_bound(node, "maximum", path, integral, findings)?;

    if let (Some(minimum), Some(maximum)) = (minimum, maximum) {
        if maximum.value < minimum.value {
            findings.error(path, "minimum must be lower than maximum")?;
        }
    }

    Ok(NumericBounds { minimum, maximum })
}

fn validate_bound(
    node: &Map<String, Value>,
    key: &str,
    path: &Path,
    integral: bool,
    findings: &mut Findings,
) -> Step<Option<Bound>> {
    let Some(raw) = node.get(key) else {
        return Ok(None);
    };
    let bound_path = path.property(key);

    let read_number = |number: &Number, findings: &mut Findings| {
        if integral && !is_integral(number) {
            findings.warning(&bound_path, "should be an integer (got float)");
        }
        number.as_f64()
    };

    match raw {
        Value::Number(number) => Ok(read_number(number, findings).map(Bound::inclusive)),
        Value::Object(bound) => {
            check_unexpected(bound, &["exclusive", "value"], &bound_path, findings)?;

            let exclusive = match bound.get("exclusive") {
                None => false,
                Some(Value::Bool(exclusive)) => *exclusive,
                Some(_) => {
                    findings.error(&bound_path.property("exclusive"), "value must be a bool")?;
                    false
                }
            };

            let value = match bound.get("value") {
                None => {
                    findings.error(&bound_path, "'value' property is missing")?;
                    None
                }
                Some(Value::Number(number)) => read_number(number, findings),
                Some(_) => {
                    findings.error(&bound_path.property("value"), "value must be a number")?;
                    None
                }
            };

            Ok(value.map(|value| Bound { exclusive, value }))
        }
        _ => {
            findings.error(&bound_path, "value must be either a number or a dict")?;
            Ok(None)
        }
    }
}

fn validate_length(node: &Map<String, Value>, path: &Path, findings: &mut Findings) -> Step<Option<Length>> {
    let Some(raw) = node.get("length") else {
        return Ok(None);
    };
    let length_path = path.property("length");

    match raw {
        Value::Number(number) => {
            let length = read_count(number, &length_path, &length_path, findings)?;
            Ok(length.map(Length::Exact))
        }
        Value::Object(range) => {
            check_unexpected(range, &["minimum", "maximum"], &length_path, findings)?;

            let read_side = |key: &str, findings: &mut Findings| -> Step<Option<usize>> {
                let side_path = length_path.property(key);
                match range.get(key) {
                    None => Ok(None),
                    Some(Value::Number(number)) => read_count(number, &side_path, &length_path, findings),
                    Some(_) => {
                        findings.error(&side_path, "value must be a number")?;
                        Ok(None)
                    }
                }
            };
            let minimum = read_side("minimum", findings)?;
            let maximum = read_side("maximum", findings)?;

            if let (Some(minimum), Some(maximum)) = (minimum, maximum) {
                if minimum > maximum {
                    findings.error(&length_path, "minimum must be lower than maximum")?;
                }
            }

            Ok(Some(Length::Range { minimum, maximum }))
        }
        _ => {
            findings.error(&length_path, "value must be either a number or a dict")?;
            Ok(None)
        }
    }
}

/// Read a non-negative count; fractional counts are truncated with a warning
/// reported at `warning_path`.
fn read_count(
    number: &Number,
    path: &Path,
    warning_path: &Path,
    findings: &mut Findings,
) -> Step<Option<usize>> {
    if let Some(count) = number.as_u64() {
        return Ok(Some(count as usize));
    }

    let value = number.as_f64().unwrap_or(-1.0);
    if value < 0.0 {
        findings.error(path, "must be greater or equal to zero")?;
        return Ok(None);
    }

    findings.warning(warning_path, "should be an integer (got float)");
    Ok(Some(value.trunc() as usize))
}

fn validate_pattern(node: &Map<String, Value>, path: &Path, findings: &mut Findings) -> Step<Option<Pattern>> {
    let pattern_path = path.property("pattern");
    match node.get("pattern") {
        None => Ok(None),
        Some(Value::String(source)) => match Pattern::new(source) {
            Ok(pattern) => Ok(Some(pattern)),
            Err(_) => {
                findings.error(&pattern_path, "value must be a valid regular expression")?;
                Ok(None)
            }
        },
        Some(_) => {
            findings.error(&pattern_path, "value must be a string")?;
            Ok(None)
        }
    }
}

fn validate_enum(node: &Map<String, Value>, path: &Path, findings: &mut Findings) -> Step<Option<Kind>> {
    let values_path = path.property("values");

    let raw_values = match node.get("values") {
        None => {
            findings.error(path, "'values' property is missing")?;
            return Ok(None);
        }
        Some(Value::Array(values)) => values,
        Some(_) => {
            findings.error(&values_path, "value must be a list")?;
            return Ok(None);
        }
    };

    if raw_values.is_empty() {
        findings.error(&values_path, "must contain at least one value")?;
        return Ok(None);
    }

    let mut values: Vec<String> = Vec::with_capacity(raw_values.len());
    let mut seen = HashSet::new();
    let mut duplicated = HashSet::new();

    for raw in raw_values {
        let Some(value) = raw.as_str() else {
            findings.error(&values_path, "value must be a list of strings")?;
            continue;
        };

        if !is_valid_name(value) {
            findings.error(&values_path, format!("'{}' is an incorrect value", value))?;
        }
        if !seen.insert(value) {
            if duplicated.insert(value) {
                findings.error(&values_path, format!("'{}' value is duplicated", value))?;
            }
            continue;
        }
        values.push(value.to_string());
    }

    Ok(Some(Kind::Enum { values }))
}

fn validate_list(node: &Map<String, Value>, path: &Path, findings: &mut Findings) -> Step<Option<Kind>> {
    let value = match node.get("value") {
        None => {
            findings.error(path, "'value' property is missing")?;
            None
        }
        Some(raw) => validate_node(raw, &path.element(), findings)?,
    };

    let length = validate_length(node, path, findings)?;

    Ok(value.map(|value| Kind::List {
        value: Box::new(value),
        length,
    }))
}

fn validate_tuple(node: &Map<String, Value>, path: &Path, findings: &mut Findings) -> Step<Option<Kind>> {
    // 'items' is accepted as an alias of 'values'
    let (key, raw_values) = match (node.get("values"), node.get("items")) {
        (Some(_), Some(_)) => {
            findings.error(path, "'items' and 'values' are mutually exclusive")?;
            return Ok(None);
        }
        (Some(values), None) => ("values", values),
        (None, Some(items)) => ("items", items),
        (None, None) => {
            findings.error(path, "'values' property is missing")?;
            return Ok(None);
        }
    };
    let values_path = path.property(key);

    let Some(raw_values) = raw_values.as_array() else {
        findings.error(&values_path, "value must be a list")?;
        return Ok(None);
    };

    if raw_values.is_empty() {
        findings.error(&values_path, "must contain at least one value")?;
        return Ok(None);
    }

    let mut values = Vec::with_capacity(raw_values.len());
    for (index, raw) in raw_values.iter().enumerate() {
        if let Some(value) = validate_node(raw, &path.position(index), findings)? {
            values.push(value);
        }
    }

    if values.len() != raw_values.len() {
        return Ok(None);
    }
    Ok(Some(Kind::Tuple { values }))
}

fn validate_map(node: &Map<String, Value>, path: &Path, findings: &mut Findings) -> Step<Option<Kind>> {
    let fields_path = path.property("fields");

    let raw_fields = match node.get("fields") {
        None => {
            findings.error(path, "'fields' property is missing")?;
            return Ok(None);
        }
        Some(Value::Object(fields)) => fields,
        Some(_) => {
            findings.error(&fields_path, "value must be a dict")?;
            return Ok(None);
        }
    };

    if raw_fields.is_empty() {
        findings.error(&fields_path, "must contain at least one field")?;
        return Ok(None);
    }

    for key in raw_fields.keys().filter(|key| !is_valid_name(key)) {
        findings.error(&fields_path, format!("'{}' is an incorrect key name", key))?;
    }

    let mut fields = indexmap::IndexMap::with_capacity(raw_fields.len());
    for (key, raw) in raw_fields {
        if let Some(field) = validate_node(raw, &path.field(key.as_str()), findings)? {
            fields.insert(key.clone(), field);
        }
    }

    if fields.len() != raw_fields.len() {
        return Ok(None);
    }
    Ok(Some(Kind::Map { fields }))
}
