//! Coercion of loosely typed wire values into declared scalar kinds.
//!
//! Numbers truncate towards zero when an integer is expected and widen when a
//! floating point value is expected. Strings are parsed strictly, except for
//! booleans: any string other than a case-insensitive `"true"` reads as
//! `false`.
//!
//! # Examples
//!
//! ```
//! use battery_core::coercion::{WireValue, to_boolean, to_integer};
//!
//! assert_eq!(to_integer("n", &WireValue::String("42")).unwrap(), 42);
//! assert_eq!(to_integer("n", &WireValue::Float(3.9)).unwrap(), 3);
//! assert!(!to_boolean("flag", &WireValue::String("yes")).unwrap());
//! ```

use std::fmt;

use crate::exception::{Error, Result};
use crate::types::{EnumType, MemberType, ScalarKind, Value};

/// A value as reported by a codec, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue<'a> {
	Null,
	Boolean(bool),
	Integer(i64),
	Float(f64),
	String(&'a str),
	/// An object or array node, carried as its textual rendering.
	Composite(String),
}

impl WireValue<'_> {
	/// Non-null scalars are built-in; type adapters may intercept them.
	pub fn is_built_in(&self) -> bool {
		matches!(
			self,
			Self::Boolean(_) | Self::Integer(_) | Self::Float(_) | Self::String(_)
		)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}
}

impl fmt::Display for WireValue<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("null"),
			Self::Boolean(v) => write!(f, "{v}"),
			Self::Integer(v) => write!(f, "{v}"),
			Self::Float(v) => write!(f, "{v}"),
			Self::String(v) => f.write_str(v),
			Self::Composite(v) => f.write_str(v),
		}
	}
}

fn incompatible(field: &str, expected: ScalarKind, value: &WireValue<'_>) -> Error {
	Error::incompatible(field, expected.name(), value.to_string())
}

fn truncate(value: f64, min: f64, max_exclusive: f64) -> Option<f64> {
	let truncated = value.trunc();
	(value.is_finite() && truncated >= min && truncated < max_exclusive).then_some(truncated)
}

/// Coerces into a 32-bit integer.
///
/// # Errors
///
/// Returns [`Error::IncompatibleType`] for booleans, composites, unparsable
/// strings and values outside the `i32` range.
pub fn to_integer(field: &str, value: &WireValue<'_>) -> Result<i32> {
	let fail = || incompatible(field, ScalarKind::Integer, value);
	match value {
		WireValue::Integer(v) => i32::try_from(*v).map_err(|_| fail()),
		WireValue::Float(v) => truncate(*v, i32::MIN as f64, i32::MAX as f64 + 1.0)
			.map(|t| t as i32)
			.ok_or_else(fail),
		WireValue::String(s) => s.parse::<i32>().map_err(|_| fail()),
		_ => Err(fail()),
	}
}

/// Coerces into a 64-bit integer.
pub fn to_long(field: &str, value: &WireValue<'_>) -> Result<i64> {
	let fail = || incompatible(field, ScalarKind::Long, value);
	match value {
		WireValue::Integer(v) => Ok(*v),
		// i64::MAX is not representable; 2^63 is the exclusive bound
		WireValue::Float(v) => truncate(*v, i64::MIN as f64, 9_223_372_036_854_775_808.0)
			.map(|t| t as i64)
			.ok_or_else(fail),
		WireValue::String(s) => s.parse::<i64>().map_err(|_| fail()),
		_ => Err(fail()),
	}
}

/// Coerces into a 32-bit float.
pub fn to_float(field: &str, value: &WireValue<'_>) -> Result<f32> {
	match value {
		WireValue::Integer(v) => Ok(*v as f32),
		WireValue::Float(v) => Ok(*v as f32),
		WireValue::String(s) => s
			.parse::<f32>()
			.map_err(|_| incompatible(field, ScalarKind::Float, value)),
		_ => Err(incompatible(field, ScalarKind::Float, value)),
	}
}

/// Coerces into a 64-bit float.
pub fn to_double(field: &str, value: &WireValue<'_>) -> Result<f64> {
	match value {
		WireValue::Integer(v) => Ok(*v as f64),
		WireValue::Float(v) => Ok(*v),
		WireValue::String(s) => s
			.parse::<f64>()
			.map_err(|_| incompatible(field, ScalarKind::Double, value)),
		_ => Err(incompatible(field, ScalarKind::Double, value)),
	}
}

/// Coerces into a boolean.
///
/// Strings never fail: only a case-insensitive `"true"` yields `true`.
pub fn to_boolean(field: &str, value: &WireValue<'_>) -> Result<bool> {
	match value {
		WireValue::Boolean(v) => Ok(*v),
		WireValue::String(s) => Ok(s.eq_ignore_ascii_case("true")),
		_ => Err(incompatible(field, ScalarKind::Boolean, value)),
	}
}

/// Renders any wire value as text. Never fails.
pub fn to_string(value: &WireValue<'_>) -> String {
	value.to_string()
}

/// Matches the wire value against the enum's constant names, ignoring case.
///
/// Returns `None` and logs a warning when nothing matches.
pub fn to_enum(field: &str, value: &WireValue<'_>, info: &EnumType) -> Option<&'static str> {
	let text = to_string(value);
	let found = info.find(&text);
	if found.is_none() {
		tracing::warn!(
			field,
			value = %text,
			enum_type = info.key().short_name(),
			"no enum constant matches wire value"
		);
	}
	found
}

/// Coerces into the owned [`Value`] of a scalar kind.
pub fn coerce(field: &str, value: &WireValue<'_>, kind: ScalarKind) -> Result<Value> {
	Ok(match kind {
		ScalarKind::String => Value::String(to_string(value)),
		ScalarKind::Integer => Value::Integer(to_integer(field, value)?),
		ScalarKind::Long => Value::Long(to_long(field, value)?),
		ScalarKind::Float => Value::Float(to_float(field, value)?),
		ScalarKind::Double => Value::Double(to_double(field, value)?),
		ScalarKind::Boolean => Value::Boolean(to_boolean(field, value)?),
	})
}

/// String or numeric/boolean primitive.
pub fn is_built_in(member_type: &MemberType) -> bool {
	member_type.is_built_in()
}
