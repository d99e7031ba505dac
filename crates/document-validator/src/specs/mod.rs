//! Specs: the validated, in-memory description of a document type
//!
//! A [`Specs`] node is produced either by [`validate_specs`](crate::validate_specs)
//! from a raw JSON/YAML-shaped description, or programmatically with the
//! constructors below. Once built it is immutable and can be shared across
//! any number of conversions.
//!
//! ```
//! use document_validator::Specs;
//!
//! let specs = Specs::map([
//!     ("name", Specs::string().length_range(Some(1), Some(64))),
//!     ("age", Specs::integer().minimum(0.0).optional()),
//! ]);
//! assert_eq!(specs.kind.name(), "map");
//! ```

mod validate;

pub(crate) use validate::validate_node;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::bounds::{Bound, Length, NumericBounds};

/// Allowed shape of map field names and enum values
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]+(-[a-z]+)*$").expect("name pattern is a valid regex"));

/// Check a map field name or an enum value
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// A compiled string pattern
///
/// Matching is anchored at the start of the value but does not need to
/// consume all of it.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as written in the specs
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Kind-specific part of a specs node
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Flag,
    Integer(NumericBounds),
    Decimal(NumericBounds),
    String {
        length: Option<Length>,
        pattern: Option<Pattern>,
    },
    Enum {
        values: Vec<String>,
    },
    List {
        value: Box<Specs>,
        length: Option<Length>,
    },
    Tuple {
        values: Vec<Specs>,
    },
    Map {
        fields: IndexMap<String, Specs>,
    },
}

impl Kind {
    /// Every value accepted by the `type` property
    pub const NAMES: [&'static str; 8] = [
        "flag", "integer", "decimal", "string", "enum", "list", "tuple", "map",
    ];

    /// The `type` property naming this kind
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Flag => "flag",
            Kind::Integer(_) => "integer",
            Kind::Decimal(_) => "decimal",
            Kind::String { .. } => "string",
            Kind::Enum { .. } => "enum",
            Kind::List { .. } => "list",
            Kind::Tuple { .. } => "tuple",
            Kind::Map { .. } => "map",
        }
    }
}

/// A node of the specs tree
#[derive(Debug, Clone, PartialEq)]
pub struct Specs {
    pub kind: Kind,
    /// Whether `null` is an accepted value
    pub option: bool,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<Kind> for Specs {
    fn from(kind: Kind) -> Self {
        Self {
            kind,
            option: false,
            name: None,
            description: None,
        }
    }
}

impl Specs {
    pub fn flag() -> Self {
        Kind::Flag.into()
    }

    pub fn integer() -> Self {
        Kind::Integer(NumericBounds::unbounded()).into()
    }

    pub fn decimal() -> Self {
        Kind::Decimal(NumericBounds::unbounded()).into()
    }

    pub fn string() -> Self {
        Kind::String {
            length: None,
            pattern: None,
        }
        .into()
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Kind::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
        .into()
    }

    pub fn list(value: Specs) -> Self {
        Kind::List {
            value: Box::new(value),
            length: None,
        }
        .into()
    }

    pub fn tuple<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Specs>,
    {
        Kind::Tuple {
            values: values.into_iter().collect(),
        }
        .into()
    }

    pub fn map<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Specs)>,
        K: Into<String>,
    {
        Kind::Map {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
        .into()
    }

    /// Accept `null`
    pub fn optional(mut self) -> Self {
        self.option = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // Bound, length and pattern modifiers only affect the kinds carrying
    // that constraint; on any other kind they leave the node unchanged.

    pub fn minimum(self, value: f64) -> Self {
        self.with_bounds(|b| b.minimum = Some(Bound::inclusive(value)))
    }

    pub fn exclusive_minimum(self, value: f64) -> Self {
        self.with_bounds(|b| b.minimum = Some(Bound::exclusive(value)))
    }

    pub fn maximum(self, value: f64) -> Self {
        self.with_bounds(|b| b.maximum = Some(Bound::inclusive(value)))
    }

    pub fn exclusive_maximum(self, value: f64) -> Self {
        self.with_bounds(|b| b.maximum = Some(Bound::exclusive(value)))
    }

    /// Require an exact length (strings and lists)
    pub fn length(self, length: usize) -> Self {
        self.with_length(Length::Exact(length))
    }

    /// Require a length range (strings and lists)
    pub fn length_range(self, minimum: Option<usize>, maximum: Option<usize>) -> Self {
        self.with_length(Length::Range { minimum, maximum })
    }

    /// Require string values to match `pattern`
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        if let Kind::String { pattern: slot, .. } = &mut self.kind {
            *slot = Some(pattern);
        }
        self
    }

    fn with_bounds(mut self, update: impl FnOnce(&mut NumericBounds)) -> Self {
        if let Kind::Integer(bounds) | Kind::Decimal(bounds) = &mut self.kind {
            update(bounds);
        }
        self
    }

    fn with_length(mut self, new: Length) -> Self {
        match &mut self.kind {
            Kind::String { length, .. } | Kind::List { length, .. } => *length = Some(new),
            _ => {}
        }
        self
    }

    /// Render the raw description this node was (or could have been) built from
    ///
    /// Inclusive bounds render as bare numbers, exclusive ones as
    /// `{"exclusive": true, "value": ..}`. Integer bounds render as integers.
    pub fn to_value(&self) -> Value {
        let mut raw = Map::new();
        raw.insert("type".to_string(), json!(self.kind.name()));

        match &self.kind {
            Kind::Flag => {}
            Kind::Integer(bounds) | Kind::Decimal(bounds) => {
                let integral = matches!(self.kind, Kind::Integer(_));
                if let Some(minimum) = bounds.minimum {
                    raw.insert("minimum".to_string(), bound_to_value(minimum, integral));
                }
                if let Some(maximum) = bounds.maximum {
                    raw.insert("maximum".to_string(), bound_to_value(maximum, integral));
                }
            }
            Kind::String { length, pattern } => {
                if let Some(length) = length {
                    raw.insert("length".to_string(), length_to_value(length));
                }
                if let Some(pattern) = pattern {
                    raw.insert("pattern".to_string(), json!(pattern.as_str()));
                }
            }
            Kind::Enum { values } => {
                raw.insert("values".to_string(), json!(values));
            }
            Kind::List { value, length } => {
                raw.insert("value".to_string(), value.to_value());
                if let Some(length) = length {
                    raw.insert("length".to_string(), length_to_value(length));
                }
            }
            Kind::Tuple { values } => {
                let values: Vec<Value> = values.iter().map(Specs::to_value).collect();
                raw.insert("values".to_string(), Value::Array(values));
            }
            Kind::Map { fields } => {
                let fields: Map<String, Value> = fields
                    .iter()
                    .map(|(key, specs)| (key.clone(), specs.to_value()))
                    .collect();
                raw.insert("fields".to_string(), Value::Object(fields));
            }
        }

        if let Some(name) = &self.name {
            raw.insert("name".to_string(), json!(name));
        }
        if let Some(description) = &self.description {
            raw.insert("description".to_string(), json!(description));
        }
        if self.option {
            raw.insert("option".to_string(), json!(true));
        }

        Value::Object(raw)
    }
}

fn number_to_value(value: f64, integral: bool) -> Value {
    if integral {
        json!(value.trunc() as i64)
    } else {
        json!(value)
    }
}

fn bound_to_value(bound: Bound, integral: bool) -> Value {
    let value = number_to_value(bound.value, integral);
    if bound.exclusive {
        json!({ "exclusive": true, "value": value })
    } else {
        value
    }
}

fn length_to_value(length: &Length) -> Value {
    match *length {
        Length::Exact(length) => json!(length),
        Length::Range { minimum, maximum } => {
            let mut raw = Map::new();
            if let Some(minimum) = minimum {
                raw.insert("minimum".to_string(), json!(minimum));
            }
            if let Some(maximum) = maximum {
                raw.insert("maximum".to_string(), json!(maximum));
            }
            Value::Object(raw)
        }
    }
}
