//! `multipart/form-data` request bodies.
//!
//! Scalars become text parts and [`Attachment`] members become file parts whose
//! content is read from disk when the body is rendered. Like forms, multipart
//! bodies are flat: lists repeat the part name and nested objects are skipped.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use battery_core::codec::{DocumentEncoder, SerializedBody};
use battery_core::exception::{Error, Result};
use bytes::Bytes;
use uuid::Uuid;

use crate::mime::{GuessMimeTypeResolver, MimeTypeResolver, OCTET_STREAM};

/// Content type produced by [`MultipartFormDataEncoder`], without the boundary.
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// A file sent as a multipart part.
///
/// # Examples
///
/// ```
/// use battery_codecs::multipart::Attachment;
///
/// let attachment = Attachment::new("/tmp/avatar.png").with_file_name("me.png");
/// assert_eq!(attachment.file_name(), Some("me.png"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
	path: PathBuf,
	file_name: Option<String>,
	content_type: Option<String>,
}

battery_core::opaque_member!(Attachment);

impl Attachment {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			file_name: None,
			content_type: None,
		}
	}

	/// Overrides the file name sent in the part header.
	pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
		self.file_name = Some(file_name.into());
		self
	}

	/// Overrides the MIME type lookup.
	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Explicit file name, if one was set.
	pub fn file_name(&self) -> Option<&str> {
		self.file_name.as_deref()
	}

	pub fn content_type(&self) -> Option<&str> {
		self.content_type.as_deref()
	}

	fn effective_file_name(&self) -> String {
		self.file_name.clone().unwrap_or_else(|| {
			self.path
				.file_name()
				.map(|name| name.to_string_lossy().into_owned())
				.unwrap_or_default()
		})
	}
}

/// Fragment of a multipart body under construction.
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartValue {
	Null,
	Text(String),
	File(Attachment),
	List(Vec<MultipartValue>),
	Object(Vec<(String, MultipartValue)>),
}

/// Encoder for multipart form-data bodies.
#[derive(Clone)]
pub struct MultipartFormDataEncoder {
	resolver: Arc<dyn MimeTypeResolver>,
}

impl Default for MultipartFormDataEncoder {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for MultipartFormDataEncoder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MultipartFormDataEncoder").finish_non_exhaustive()
	}
}

impl MultipartFormDataEncoder {
	/// Creates an encoder guessing file types from their extension.
	pub fn new() -> Self {
		Self::with_resolver(Arc::new(GuessMimeTypeResolver))
	}

	pub fn with_resolver(resolver: Arc<dyn MimeTypeResolver>) -> Self {
		Self { resolver }
	}

	fn file_content_type(&self, attachment: &Attachment) -> String {
		attachment
			.content_type()
			.map(str::to_string)
			.or_else(|| self.resolver.mime_type(attachment.path()))
			.unwrap_or_else(|| OCTET_STREAM.to_string())
	}

	fn write_part(&self, body: &mut Vec<u8>, boundary: &str, name: &str, value: MultipartValue) -> Result<()> {
		match value {
			MultipartValue::Null => {}
			MultipartValue::Text(text) => {
				body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
				body.extend_from_slice(
					format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", escape(name)).as_bytes(),
				);
				body.extend_from_slice(text.as_bytes());
				body.extend_from_slice(b"\r\n");
			}
			MultipartValue::File(attachment) => {
				let content = std::fs::read(attachment.path()).map_err(|e| {
					Error::MalformedDocument(format!(
						"Cannot read attachment {}: {}",
						attachment.path().display(),
						e
					))
				})?;
				body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
				body.extend_from_slice(
					format!(
						"Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
						escape(name),
						escape(&attachment.effective_file_name())
					)
					.as_bytes(),
				);
				body.extend_from_slice(
					format!("Content-Type: {}\r\n\r\n", self.file_content_type(&attachment)).as_bytes(),
				);
				body.extend_from_slice(&content);
				body.extend_from_slice(b"\r\n");
			}
			MultipartValue::List(items) => {
				for item in items {
					if matches!(item, MultipartValue::List(_) | MultipartValue::Object(_)) {
						tracing::warn!(name, "nested element cannot be sent as a multipart part");
						continue;
					}
					self.write_part(body, boundary, name, item)?;
				}
			}
			MultipartValue::Object(_) => {
				tracing::warn!(name, "nested object cannot be sent as a multipart part");
			}
		}
		Ok(())
	}
}

fn escape(value: &str) -> String {
	value.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}

impl DocumentEncoder for MultipartFormDataEncoder {
	type Fragment = MultipartValue;

	fn content_type(&self) -> &str {
		MULTIPART_CONTENT_TYPE
	}

	fn null(&self) -> MultipartValue {
		MultipartValue::Null
	}

	fn string(&self, value: &str) -> MultipartValue {
		MultipartValue::Text(value.to_string())
	}

	fn integer(&self, value: i64) -> MultipartValue {
		MultipartValue::Text(value.to_string())
	}

	fn float(&self, value: f64) -> MultipartValue {
		MultipartValue::Text(value.to_string())
	}

	fn boolean(&self, value: bool) -> MultipartValue {
		MultipartValue::Text(value.to_string())
	}

	fn array(&self, items: Vec<MultipartValue>) -> MultipartValue {
		MultipartValue::List(items)
	}

	fn object(&self, entries: Vec<(String, MultipartValue)>) -> MultipartValue {
		MultipartValue::Object(entries)
	}

	fn opaque(&self, value: &(dyn Any + Send + Sync)) -> Option<MultipartValue> {
		value
			.downcast_ref::<Attachment>()
			.map(|attachment| MultipartValue::File(attachment.clone()))
	}

	fn render(&self, document: MultipartValue) -> Result<SerializedBody> {
		let MultipartValue::Object(entries) = document else {
			return Err(Error::MalformedDocument(
				"multipart body must be a set of named parts".to_string(),
			));
		};

		let boundary = format!("battery-{}", Uuid::new_v4().simple());
		let mut body = Vec::new();
		for (name, value) in entries {
			self.write_part(&mut body, &boundary, &name, value)?;
		}
		body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

		Ok(SerializedBody {
			bytes: Bytes::from(body),
			content_type: format!("{MULTIPART_CONTENT_TYPE}; boundary={boundary}"),
		})
	}
}
