//! `application/x-www-form-urlencoded` request bodies.
//!
//! Forms are flat: top-level scalars become one pair each and lists of
//! scalars repeat their key. Nulls are left out. Nested objects have no form
//! representation and are skipped with a warning.

use battery_core::codec::{DocumentEncoder, SerializedBody};
use battery_core::exception::{Error, Result};
use bytes::Bytes;

/// Content type produced by [`UrlEncodedFormEncoder`], without parameters.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Fragment of a form under construction.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
	Null,
	Scalar(String),
	List(Vec<FormValue>),
	Object(Vec<(String, FormValue)>),
}

/// Encoder for URL-encoded form bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlEncodedFormEncoder;

impl UrlEncodedFormEncoder {
	pub fn new() -> Self {
		Self
	}

	fn flatten(key: &str, value: FormValue, pairs: &mut Vec<(String, String)>) {
		match value {
			FormValue::Null => {}
			FormValue::Scalar(text) => pairs.push((key.to_string(), text)),
			FormValue::List(items) => {
				for item in items {
					match item {
						FormValue::Scalar(text) => pairs.push((key.to_string(), text)),
						FormValue::Null => {}
						_ => tracing::warn!(key, "nested list element cannot be form-encoded"),
					}
				}
			}
			FormValue::Object(_) => tracing::warn!(key, "nested object cannot be form-encoded"),
		}
	}
}

impl DocumentEncoder for UrlEncodedFormEncoder {
	type Fragment = FormValue;

	fn content_type(&self) -> &str {
		FORM_CONTENT_TYPE
	}

	fn null(&self) -> FormValue {
		FormValue::Null
	}

	fn string(&self, value: &str) -> FormValue {
		FormValue::Scalar(value.to_string())
	}

	fn integer(&self, value: i64) -> FormValue {
		FormValue::Scalar(value.to_string())
	}

	fn float(&self, value: f64) -> FormValue {
		FormValue::Scalar(value.to_string())
	}

	fn boolean(&self, value: bool) -> FormValue {
		FormValue::Scalar(value.to_string())
	}

	fn array(&self, items: Vec<FormValue>) -> FormValue {
		FormValue::List(items)
	}

	fn object(&self, entries: Vec<(String, FormValue)>) -> FormValue {
		FormValue::Object(entries)
	}

	fn render(&self, document: FormValue) -> Result<SerializedBody> {
		let FormValue::Object(entries) = document else {
			return Err(Error::MalformedDocument(
				"form body must be a set of named fields".to_string(),
			));
		};

		let mut pairs = Vec::with_capacity(entries.len());
		for (key, value) in entries {
			Self::flatten(&key, value, &mut pairs);
		}

		let encoded = serde_urlencoded::to_string(&pairs)
			.map_err(|e| Error::MalformedDocument(format!("Cannot encode form: {}", e)))?;
		Ok(SerializedBody {
			bytes: Bytes::from(encoded),
			content_type: format!("{FORM_CONTENT_TYPE}; charset=utf-8"),
		})
	}
}
