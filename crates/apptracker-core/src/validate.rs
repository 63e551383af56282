// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Checks untrusted JSON values against the static schema tables.
//!
//! Validation stops at the first violation, in field-table order. The reason
//! string names the offending path (`items[0].quantity`) so callers can
//! surface it unchanged. Event payloads are checked against their required
//! fields only; configuration objects are checked field by field.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::schema::{Field, FieldKind, SchemaKind, Shape, UnknownKeys};

/// Validates `value` against the schema for `kind`.
///
/// # Errors
/// Returns a [`ValidationError`] describing the first violation found.
pub fn validate(kind: SchemaKind, value: &Value) -> Result<(), ValidationError> {
	check_schema(kind, value, "").map_err(|reason| ValidationError::new(kind, reason))
}

/// Returns true when `value` is acceptable for a single field of `kind`.
pub fn conforms(kind: FieldKind, value: &Value) -> bool {
	check_value(kind, value, "").is_ok()
}

/// Names the JSON type of a value, for error messages.
pub fn describe(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

fn check_schema(kind: SchemaKind, value: &Value, path: &str) -> Result<(), String> {
	match kind.shape() {
		Shape::Object {
			fields,
			unknown_keys,
		} => {
			let Value::Object(map) = value else {
				return Err(mismatch(path, "an object", value));
			};
			if *unknown_keys == UnknownKeys::Reject {
				check_unknown_keys(fields, map, path)?;
			}
			check_fields(fields, *unknown_keys, map, path)
		}
		Shape::List(element) => check_list(*element, value, path),
	}
}

fn check_unknown_keys(fields: &[Field], map: &Map<String, Value>, path: &str) -> Result<(), String> {
	match map
		.keys()
		.find(|key| !fields.iter().any(|f| f.name == key.as_str()))
	{
		Some(key) => Err(format!("unknown key `{}`", field_path(path, key))),
		None => Ok(()),
	}
}

/// Optional fields of open (event) schemas are listed for reference only and
/// are not checked; closed (configuration) schemas check every field present.
fn check_fields(
	fields: &[Field],
	unknown_keys: UnknownKeys,
	map: &Map<String, Value>,
	path: &str,
) -> Result<(), String> {
	for field in fields {
		let at = field_path(path, field.name);
		match map.get(field.name) {
			None if field.required => return Err(format!("missing required field `{at}`")),
			None => {}
			Some(_) if !field.required && unknown_keys == UnknownKeys::Allow => {}
			Some(Value::Null) if !field.required => {}
			Some(value) => check_value(field.kind, value, &at)?,
		}
	}
	Ok(())
}

fn check_list(element: FieldKind, value: &Value, path: &str) -> Result<(), String> {
	let Value::Array(items) = value else {
		return Err(mismatch(path, "an array", value));
	};
	for (i, item) in items.iter().enumerate() {
		check_value(element, item, &format!("{path}[{i}]"))?;
	}
	Ok(())
}

fn check_value(kind: FieldKind, value: &Value, path: &str) -> Result<(), String> {
	let ok = match (kind, value) {
		(FieldKind::String, Value::String(_)) => true,
		(FieldKind::NonEmptyString, Value::String(s)) => !s.is_empty(),
		(FieldKind::Number, Value::Number(n)) => is_finite(n),
		(FieldKind::Boolean, Value::Bool(_)) => true,
		(FieldKind::Object, Value::Object(_)) => true,
		(FieldKind::OneOf(allowed), Value::String(s)) => allowed.contains(&s.as_str()),
		(FieldKind::ScreenSize, Value::Null) => true,
		(FieldKind::ScreenSize, Value::Array(pair)) => {
			pair.len() == 2
				&& pair
					.iter()
					.all(|v| matches!(v, Value::Number(n) if is_finite(n)))
		}
		(FieldKind::Nullable(_), Value::Null) => true,
		(FieldKind::Nullable(inner), _) => return check_value(*inner, value, path),
		(FieldKind::ListOf(inner), _) => return check_list(*inner, value, path),
		(FieldKind::Schema(schema), _) => return check_schema(schema, value, path),
		_ => false,
	};
	if ok {
		Ok(())
	} else {
		Err(mismatch(path, &expectation(kind), value))
	}
}

fn is_finite(n: &serde_json::Number) -> bool {
	n.as_f64().is_some_and(f64::is_finite)
}

fn expectation(kind: FieldKind) -> String {
	match kind {
		FieldKind::String => "a string".to_string(),
		FieldKind::NonEmptyString => "a non-empty string".to_string(),
		FieldKind::Number => "a number".to_string(),
		FieldKind::Boolean => "a boolean".to_string(),
		FieldKind::Object => "an object".to_string(),
		FieldKind::OneOf(allowed) => format!("one of {}", allowed.join(", ")),
		FieldKind::ScreenSize => "a [width, height] pair or null".to_string(),
		FieldKind::Nullable(inner) => format!("{} or null", expectation(*inner)),
		FieldKind::ListOf(_) => "an array".to_string(),
		FieldKind::Schema(schema) => match schema.shape() {
			Shape::Object { .. } => "an object".to_string(),
			Shape::List(_) => "an array".to_string(),
		},
	}
}

fn mismatch(path: &str, expected: &str, value: &Value) -> String {
	let found = match value {
		Value::String(s) if s.is_empty() => "an empty string".to_string(),
		Value::String(s) => format!("string {s:?}"),
		other => describe(other).to_string(),
	};
	if path.is_empty() {
		format!("expected {expected}, found {found}")
	} else {
		format!("`{path}` must be {expected}, found {found}")
	}
}

fn field_path(parent: &str, name: &str) -> String {
	if parent.is_empty() {
		name.to_string()
	} else {
		format!("{parent}.{name}")
	}
}
