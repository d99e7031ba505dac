//! Document Validator
//!
//! Schema-driven validation and conversion between JSON documents and native
//! objects.
//!
//! ## Features
//!
//! - **Specs validation**: Check a raw JSON/YAML-shaped type description and
//!   build an immutable [`Specs`] tree from it
//! - **Document conversion**: Convert JSON text into an [`Object`], enforcing
//!   types, bounds, lengths, patterns and map fields
//! - **Object conversion**: Check a native [`Object`] and serialize it to JSON
//! - **Lazy validation**: Collect every error and warning instead of stopping
//!   at the first one
//!
//! ## Architecture
//!
//! All three walks share one recursive shape over the specs tree. Each
//! recursive call receives an immutable [`Path`] locating the node and the
//! [`Findings`] accumulator it reports into. In fail-fast mode the first
//! error unwinds the whole walk; in lazy mode the walk runs to completion and
//! failed nodes convert to null.
//!
//! Paths render as `$` for the root followed by one `.`-separated segment
//! per step: `minimum` for a specs property, `{name}` for a map field, `[3]`
//! for a list element, `[]` for the element specs of a list and `<1>` for a
//! tuple position.
//!
//! ## Example
//!
//! ```rust
//! use document_validator::{document_to_object, validate_specs, Object};
//! use serde_json::json;
//!
//! let specs = validate_specs(&json!({
//!     "type": "map",
//!     "fields": {
//!         "foo": {"type": "flag"},
//!         "bar": {"type": "integer", "option": true}
//!     }
//! }))
//! .unwrap();
//!
//! let object = document_to_object(r#"{"foo": true}"#, &specs).unwrap();
//! assert_eq!(object.get("foo"), Some(&Object::Flag(true)));
//! assert_eq!(object.get("bar"), Some(&Object::Null));
//! ```
//!
//! Lazy validation reports every problem:
//!
//! ```rust
//! use document_validator::{document_to_object_with, Findings, Specs};
//!
//! let specs = Specs::list(Specs::integer());
//! let mut findings = Findings::lazy();
//! document_to_object_with(r#"[true, 42, "x"]"#, &specs, &mut findings).unwrap();
//!
//! let paths: Vec<String> = findings.errors().iter().map(|f| f.path.to_string()).collect();
//! assert_eq!(paths, vec!["$.[0]", "$.[2]"]);
//! ```

pub mod bounds;
pub mod config;
pub mod error;
pub mod finding;
pub mod object;
pub mod path;
pub mod specs;

mod document;

pub use bounds::{Bound, Length, NumericBounds};
pub use config::{ValidatorConfig, DEFAULT_MAX_DEPTH};
pub use error::{Error, Result};
pub use finding::{Finding, Findings, Mode, Severity};
pub use object::{Key, Object};
pub use path::{Path, Segment};
pub use specs::{is_valid_name, Kind, Pattern, Specs};

use serde_json::Value;

/// Validate a raw specs description, stopping at the first error
pub fn validate_specs(raw: &Value) -> Result<Specs> {
    let mut findings = Findings::fail_fast();
    match validate_specs_with(raw, &mut findings) {
        Some(specs) => Ok(specs),
        None => Err(findings.into_error(Error::Specs)),
    }
}

/// Validate a raw specs description, reporting into `findings`
///
/// Returns the specs tree only if no error was found.
pub fn validate_specs_with(raw: &Value, findings: &mut Findings) -> Option<Specs> {
    let specs = specs::validate_node(raw, &Path::root(), findings)
        .ok()
        .flatten();

    tracing::debug!(
        mode = %findings.mode(),
        errors = findings.errors().len(),
        warnings = findings.warnings().len(),
        "specs validated"
    );

    specs
}

/// Convert a JSON document into a native object, stopping at the first error
pub fn document_to_object(document: &str, specs: &Specs) -> Result<Object> {
    document_to_object_with(document, specs, &mut Findings::fail_fast())
}

/// Convert a JSON document into a native object, reporting into `findings`
///
/// With lazy findings this fails only if the text is not JSON: conformance
/// problems go to `findings` and the returned object is a best-effort
/// partial value. With fail-fast findings the first error is returned.
pub fn document_to_object_with(document: &str, specs: &Specs, findings: &mut Findings) -> Result<Object> {
    let value: Value = serde_json::from_str(document)?;
    let object = value_to_object_with(&value, specs, findings);
    fail_fast_error(findings, Error::Document)?;
    Ok(object)
}

/// Convert an already parsed JSON value into a native object
pub fn value_to_object_with(value: &Value, specs: &Specs, findings: &mut Findings) -> Object {
    let object = document::convert_node(value, specs, &Path::root(), findings).unwrap_or_default();

    tracing::debug!(
        mode = %findings.mode(),
        errors = findings.errors().len(),
        warnings = findings.warnings().len(),
        "document converted"
    );

    object
}

/// Convert a native object into a JSON document, stopping at the first error
pub fn object_to_document(object: &Object, specs: &Specs) -> Result<String> {
    object_to_document_with(object, specs, &mut Findings::fail_fast())
}

/// Convert a native object into a JSON document, reporting into `findings`
///
/// With fail-fast findings the first error is returned instead of a document.
pub fn object_to_document_with(object: &Object, specs: &Specs, findings: &mut Findings) -> Result<String> {
    let value = object_to_value_with(object, specs, findings);
    fail_fast_error(findings, Error::Object)?;
    Ok(serde_json::to_string(&value)?)
}

/// Convert a native object into a JSON value
pub fn object_to_value_with(object: &Object, specs: &Specs, findings: &mut Findings) -> Value {
    let value = object::convert_node(object, specs, &Path::root(), findings).unwrap_or(Value::Null);

    tracing::debug!(
        mode = %findings.mode(),
        errors = findings.errors().len(),
        warnings = findings.warnings().len(),
        "object converted"
    );

    value
}

/// Fail-fast findings turn their first error into the call's result
fn fail_fast_error(findings: &Findings, wrap: fn(Finding) -> Error) -> Result<()> {
    match findings.first_error() {
        Some(first) if findings.mode() == Mode::FailFast => Err(wrap(first.clone())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_specs_fail_fast() {
        let err = validate_specs(&json!({"type": "enum", "values": ["a", "a"]})).unwrap_err();
        let finding = err.finding().unwrap();
        assert_eq!(finding.message, "'a' value is duplicated");
        assert_eq!(finding.path.to_string(), "$.values");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_document_errors_are_client_errors() {
        let specs = validate_specs(&json!({"type": "integer", "minimum": 42})).unwrap();
        let err = document_to_object("41", &specs).unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "invalid document: value must be equal or greater than 42 at '$'");

        let err = document_to_object("{", &specs).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_object_errors_are_server_errors() {
        let err = object_to_document(&Object::from("x"), &Specs::flag()).unwrap_err();
        assert!(matches!(err, Error::Object(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_round_trip() {
        let specs = Specs::map([
            ("id", Specs::integer()),
            ("tags", Specs::list(Specs::string())),
            ("point", Specs::tuple([Specs::decimal(), Specs::decimal()])),
        ]);
        let object = Object::map([
            ("id", Object::Integer(1)),
            ("tags", Object::List(vec![Object::from("a")])),
            ("point", Object::tuple([Object::Decimal(0.5), Object::Decimal(-2.0)])),
        ]);

        let document = object_to_document(&object, &specs).unwrap();
        assert_eq!(document, r#"{"id":1,"tags":["a"],"point":[0.5,-2.0]}"#);
        assert_eq!(document_to_object(&document, &specs).unwrap(), object);
    }
}
