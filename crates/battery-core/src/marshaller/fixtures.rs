//! In-memory tree format used by the marshaller tests.

use std::any::Any;

use bytes::Bytes;

use crate::codec::{DocumentCodec, DocumentEncoder, SerializedBody};
use crate::coercion::WireValue;
use crate::exception::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(String),
	Array(Vec<Node>),
	Object(Vec<(String, Node)>),
}

impl Node {
	pub(crate) fn get(&self, key: &str) -> Option<&Node> {
		match self {
			Node::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
			_ => None,
		}
	}

	fn render(&self) -> String {
		match self {
			Node::Null => "null".to_string(),
			Node::Bool(v) => v.to_string(),
			Node::Int(v) => v.to_string(),
			Node::Float(v) => v.to_string(),
			Node::Str(v) => format!("{v:?}"),
			Node::Array(items) => {
				let parts: Vec<String> = items.iter().map(Node::render).collect();
				format!("[{}]", parts.join(","))
			}
			Node::Object(entries) => {
				let parts: Vec<String> = entries
					.iter()
					.map(|(k, v)| format!("{k:?}:{}", v.render()))
					.collect();
				format!("{{{}}}", parts.join(","))
			}
		}
	}
}

pub(crate) fn obj(entries: Vec<(&str, Node)>) -> Node {
	Node::Object(
		entries
			.into_iter()
			.map(|(k, v)| (k.to_string(), v))
			.collect(),
	)
}

/// Codec over [`Node`] trees.
///
/// `parse` only understands the literal `{}`; tests build documents directly.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TreeCodec;

/// Marker opaque type the tree encoder knows how to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Token(pub String);

crate::opaque_member!(Token);

impl DocumentCodec for TreeCodec {
	type Node = Node;

	fn content_type(&self) -> &str {
		"application/x-tree"
	}

	fn parse(&self, input: &[u8]) -> Result<Node> {
		match input {
			b"{}" => Ok(Node::Object(Vec::new())),
			_ => Err(Error::MalformedDocument("unsupported tree literal".to_string())),
		}
	}

	fn is_child_present(&self, node: &Node, key: &str) -> bool {
		node.get(key).is_some()
	}

	fn child<'a>(&self, node: &'a Node, key: &str) -> Option<&'a Node> {
		node.get(key)
	}

	fn array_children<'a>(&self, node: &'a Node) -> Box<dyn Iterator<Item = &'a Node> + 'a> {
		match node {
			Node::Array(items) => Box::new(items.iter()),
			_ => Box::new(std::iter::empty()),
		}
	}

	fn is_object(&self, node: &Node) -> bool {
		matches!(node, Node::Object(_))
	}

	fn is_array(&self, node: &Node) -> bool {
		matches!(node, Node::Array(_))
	}

	fn is_null(&self, node: &Node) -> bool {
		matches!(node, Node::Null)
	}

	fn wire_value<'a>(&self, node: &'a Node) -> WireValue<'a> {
		match node {
			Node::Null => WireValue::Null,
			Node::Bool(v) => WireValue::Boolean(*v),
			Node::Int(v) => WireValue::Integer(*v),
			Node::Float(v) => WireValue::Float(*v),
			Node::Str(v) => WireValue::String(v),
			composite => WireValue::Composite(composite.render()),
		}
	}
}

impl DocumentEncoder for TreeCodec {
	type Fragment = Node;

	fn content_type(&self) -> &str {
		"application/x-tree"
	}

	fn null(&self) -> Node {
		Node::Null
	}

	fn string(&self, value: &str) -> Node {
		Node::Str(value.to_string())
	}

	fn integer(&self, value: i64) -> Node {
		Node::Int(value)
	}

	fn float(&self, value: f64) -> Node {
		Node::Float(value)
	}

	fn boolean(&self, value: bool) -> Node {
		Node::Bool(value)
	}

	fn array(&self, items: Vec<Node>) -> Node {
		Node::Array(items)
	}

	fn object(&self, entries: Vec<(String, Node)>) -> Node {
		Node::Object(entries)
	}

	fn opaque(&self, value: &(dyn Any + Send + Sync)) -> Option<Node> {
		value
			.downcast_ref::<Token>()
			.map(|token| Node::Str(format!("token:{}", token.0)))
	}

	fn render(&self, document: Node) -> Result<SerializedBody> {
		Ok(SerializedBody {
			bytes: Bytes::from(document.render()),
			content_type: "application/x-tree".to_string(),
		})
	}
}
