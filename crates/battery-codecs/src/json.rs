//! JSON document codec backed by `serde_json::Value`.

use battery_core::codec::{DocumentCodec, DocumentEncoder, SerializedBody};
use battery_core::coercion::WireValue;
use battery_core::exception::{Error, Result};
use bytes::Bytes;
use serde_json::{Map, Number, Value};

/// Content type handled by [`JsonCodec`].
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// JSON codec for `application/json` responses and request bodies.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
	allow_empty: bool,
}

impl JsonCodec {
	/// Creates a codec that rejects empty input.
	///
	/// # Examples
	///
	/// ```
	/// use battery_codecs::json::JsonCodec;
	/// use battery_core::codec::DocumentCodec;
	///
	/// let codec = JsonCodec::new();
	/// assert!(codec.parse(b"").is_err());
	/// assert!(codec.parse(br#"{"a":1}"#).is_ok());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Reads an empty (or whitespace-only) body as a `null` document.
	///
	/// # Examples
	///
	/// ```
	/// use battery_codecs::json::JsonCodec;
	/// use battery_core::codec::DocumentCodec;
	///
	/// let codec = JsonCodec::new().allow_empty(true);
	/// assert!(codec.parse(b"  ").unwrap().is_null());
	/// ```
	pub fn allow_empty(mut self, allow: bool) -> Self {
		self.allow_empty = allow;
		self
	}
}

impl DocumentCodec for JsonCodec {
	type Node = Value;

	fn content_type(&self) -> &str {
		JSON_CONTENT_TYPE
	}

	fn parse(&self, input: &[u8]) -> Result<Value> {
		if input.iter().all(u8::is_ascii_whitespace) {
			return if self.allow_empty {
				Ok(Value::Null)
			} else {
				Err(Error::MalformedDocument("Empty JSON document".to_string()))
			};
		}
		serde_json::from_slice(input)
			.map_err(|e| Error::MalformedDocument(format!("Invalid JSON: {}", e)))
	}

	fn is_child_present(&self, node: &Value, key: &str) -> bool {
		node.as_object().is_some_and(|object| object.contains_key(key))
	}

	fn child<'a>(&self, node: &'a Value, key: &str) -> Option<&'a Value> {
		node.as_object().and_then(|object| object.get(key))
	}

	fn array_children<'a>(&self, node: &'a Value) -> Box<dyn Iterator<Item = &'a Value> + 'a> {
		match node.as_array() {
			Some(items) => Box::new(items.iter()),
			None => Box::new(std::iter::empty()),
		}
	}

	fn is_object(&self, node: &Value) -> bool {
		node.is_object()
	}

	fn is_array(&self, node: &Value) -> bool {
		node.is_array()
	}

	fn is_null(&self, node: &Value) -> bool {
		node.is_null()
	}

	fn wire_value<'a>(&self, node: &'a Value) -> WireValue<'a> {
		match node {
			Value::Null => WireValue::Null,
			Value::Bool(v) => WireValue::Boolean(*v),
			Value::Number(n) => match n.as_i64() {
				Some(v) => WireValue::Integer(v),
				None => WireValue::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			Value::String(s) => WireValue::String(s),
			composite => WireValue::Composite(composite.to_string()),
		}
	}
}

impl DocumentEncoder for JsonCodec {
	type Fragment = Value;

	fn content_type(&self) -> &str {
		JSON_CONTENT_TYPE
	}

	fn null(&self) -> Value {
		Value::Null
	}

	fn string(&self, value: &str) -> Value {
		Value::String(value.to_string())
	}

	fn integer(&self, value: i64) -> Value {
		Value::from(value)
	}

	// Non-finite numbers have no JSON form.
	fn float(&self, value: f64) -> Value {
		Number::from_f64(value).map_or(Value::Null, Value::Number)
	}

	fn boolean(&self, value: bool) -> Value {
		Value::Bool(value)
	}

	fn array(&self, items: Vec<Value>) -> Value {
		Value::Array(items)
	}

	// Keys keep member order.
	fn object(&self, entries: Vec<(String, Value)>) -> Value {
		Value::Object(entries.into_iter().collect::<Map<String, Value>>())
	}

	fn render(&self, document: Value) -> Result<SerializedBody> {
		let bytes = serde_json::to_vec(&document)
			.map_err(|e| Error::MalformedDocument(format!("Cannot render JSON: {}", e)))?;
		Ok(SerializedBody {
			bytes: Bytes::from(bytes),
			content_type: JSON_CONTENT_TYPE.to_string(),
		})
	}
}
