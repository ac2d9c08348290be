//! Wire codec plugin contract.
//!
//! A [`DocumentCodec`] parses raw input into a codec-defined document and
//! answers the child lookup and iteration questions the marshaller asks while
//! deserializing. A [`DocumentEncoder`] builds a document bottom-up while the
//! marshaller serializes and renders it to bytes.
//!
//! The object-safe seams [`ResponseDecoder`] and [`RequestSerializer`] are
//! implemented for every codec and encoder, so they can be stored in
//! registries keyed by content type.

use std::any::Any;

use bytes::Bytes;

use crate::coercion::WireValue;
use crate::exception::Result;
use crate::marshaller::{MarshalContext, Marshaller};
use crate::metadata::MetadataKind;
use crate::types::MappedObject;

/// Strips parameters after `;` and surrounding whitespace from a content
/// type, lower-casing the result.
///
/// # Examples
///
/// ```
/// use battery_core::codec::normalize_content_type;
///
/// assert_eq!(normalize_content_type("Application/JSON; charset=utf-8"), "application/json");
/// ```
pub fn normalize_content_type(content_type: &str) -> String {
	content_type
		.split(';')
		.next()
		.unwrap_or_default()
		.trim()
		.to_ascii_lowercase()
}

/// Parse side of a structured wire format.
pub trait DocumentCodec: Send + Sync {
	/// Node type of the parsed document.
	type Node;

	/// Content type this codec handles, without parameters.
	fn content_type(&self) -> &str;

	/// Parses raw input.
	///
	/// # Errors
	///
	/// Returns [`crate::exception::Error::MalformedDocument`] on malformed
	/// input.
	fn parse(&self, input: &[u8]) -> Result<Self::Node>;

	/// Returns true if `node` is an object with a child under `key`, even if
	/// that child is null.
	fn is_child_present(&self, node: &Self::Node, key: &str) -> bool;

	/// Returns the child of an object node, including explicit null children.
	fn child<'a>(&self, node: &'a Self::Node, key: &str) -> Option<&'a Self::Node>;

	/// Iterates the elements of an array node; non-arrays yield nothing.
	fn array_children<'a>(
		&self,
		node: &'a Self::Node,
	) -> Box<dyn Iterator<Item = &'a Self::Node> + 'a>;

	fn is_object(&self, node: &Self::Node) -> bool;

	fn is_array(&self, node: &Self::Node) -> bool;

	fn is_null(&self, node: &Self::Node) -> bool;

	/// Scalar view of a node; objects and arrays are composites.
	fn wire_value<'a>(&self, node: &'a Self::Node) -> WireValue<'a>;
}

/// A serialized request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedBody {
	pub bytes: Bytes,
	/// Full content type, including parameters such as a multipart boundary.
	pub content_type: String,
}

/// Build side of a wire format.
pub trait DocumentEncoder: Send + Sync {
	/// Node type of the document under construction.
	type Fragment;

	/// Content type this encoder produces, without parameters.
	fn content_type(&self) -> &str;

	fn null(&self) -> Self::Fragment;

	fn string(&self, value: &str) -> Self::Fragment;

	fn integer(&self, value: i64) -> Self::Fragment;

	fn float(&self, value: f64) -> Self::Fragment;

	fn boolean(&self, value: bool) -> Self::Fragment;

	fn array(&self, items: Vec<Self::Fragment>) -> Self::Fragment;

	fn object(&self, entries: Vec<(String, Self::Fragment)>) -> Self::Fragment;

	/// Encodes a value of an opaque type no type adapter handles.
	///
	/// Returns `None` (the default) to have the member skipped.
	fn opaque(&self, _value: &(dyn Any + Send + Sync)) -> Option<Self::Fragment> {
		None
	}

	/// Renders a finished document.
	fn render(&self, document: Self::Fragment) -> Result<SerializedBody>;
}

/// Object-safe decoding seam: parse and deserialize into a target object.
pub trait ResponseDecoder: Send + Sync {
	fn content_type(&self) -> &str;

	/// Parses `input` and deserializes it into `target`.
	///
	/// # Errors
	///
	/// Parse failures surface as `MalformedDocument`; traversal failures as
	/// `Deserialization`.
	fn decode_into(
		&self,
		input: &[u8],
		target: &mut dyn MappedObject,
		context: &MarshalContext<'_>,
	) -> Result<()>;
}

impl<C: DocumentCodec> ResponseDecoder for C {
	fn content_type(&self) -> &str {
		DocumentCodec::content_type(self)
	}

	fn decode_into(
		&self,
		input: &[u8],
		target: &mut dyn MappedObject,
		context: &MarshalContext<'_>,
	) -> Result<()> {
		let document = self.parse(input)?;
		Marshaller::new(self, context).build_response(&document, target)
	}
}

/// Object-safe serialization seam.
pub trait RequestSerializer: Send + Sync {
	fn content_type(&self) -> &str;

	/// Serializes the request-body members of `object`.
	///
	/// Returns `None` when no member produced output, which callers must treat
	/// as "no body" rather than an empty one.
	fn serialize(
		&self,
		object: &dyn MappedObject,
		context: &MarshalContext<'_>,
	) -> Result<Option<SerializedBody>>;
}

impl<E: DocumentEncoder> RequestSerializer for E {
	fn content_type(&self) -> &str {
		DocumentEncoder::content_type(self)
	}

	fn serialize(
		&self,
		object: &dyn MappedObject,
		context: &MarshalContext<'_>,
	) -> Result<Option<SerializedBody>> {
		match Marshaller::new(self, context).dump(object, MetadataKind::RequestBody)? {
			Some(document) => self
				.render(document)
				.map(Some)
				.map_err(|error| error.into_serialization()),
			None => Ok(None),
		}
	}
}
