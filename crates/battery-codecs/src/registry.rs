//! Content-type keyed registry of response decoders and request serializers.
//!
//! Keys are normalized with [`normalize_content_type`], so
//! `"application/json; charset=utf-8"` finds the decoder registered for
//! `"application/json"`.

use std::collections::HashMap;
use std::sync::Arc;

use battery_core::codec::{RequestSerializer, ResponseDecoder, normalize_content_type};
use battery_core::exception::{Error, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::form::UrlEncodedFormEncoder;
use crate::json::JsonCodec;
use crate::multipart::MultipartFormDataEncoder;

/// Global codec registry, pre-populated with the built-in codecs.
static GLOBAL_CODECS: Lazy<Arc<CodecRegistry>> =
	Lazy::new(|| Arc::new(CodecRegistry::with_defaults()));

/// Registry of decoders and serializers keyed by content type.
#[derive(Default)]
pub struct CodecRegistry {
	decoders: RwLock<HashMap<String, Arc<dyn ResponseDecoder>>>,
	serializers: RwLock<HashMap<String, Arc<dyn RequestSerializer>>>,
}

impl CodecRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry with the JSON decoder and the JSON, form and
	/// multipart serializers.
	///
	/// # Examples
	///
	/// ```
	/// use battery_codecs::registry::CodecRegistry;
	///
	/// let registry = CodecRegistry::with_defaults();
	/// assert!(registry.decoder("application/json; charset=utf-8").is_ok());
	/// assert!(registry.serializer("multipart/form-data").is_ok());
	/// assert!(registry.decoder("text/html").is_err());
	/// ```
	pub fn with_defaults() -> Self {
		let registry = Self::new();
		registry.register_decoder(JsonCodec::new());
		registry.register_serializer(JsonCodec::new());
		registry.register_serializer(UrlEncodedFormEncoder::new());
		registry.register_serializer(MultipartFormDataEncoder::new());
		registry
	}

	/// Returns the process-wide registry.
	pub fn global() -> Arc<CodecRegistry> {
		Arc::clone(&GLOBAL_CODECS)
	}

	/// Registers `decoder` under its own content type.
	pub fn register_decoder<D: ResponseDecoder + 'static>(&self, decoder: D) {
		let content_type = ResponseDecoder::content_type(&decoder).to_string();
		self.register_decoder_as(&content_type, Arc::new(decoder));
	}

	/// Registers `decoder` under `content_type`, replacing any previous one.
	pub fn register_decoder_as(&self, content_type: &str, decoder: Arc<dyn ResponseDecoder>) {
		let key = normalize_content_type(content_type);
		tracing::debug!(content_type = %key, "registering response decoder");
		self.decoders.write().insert(key, decoder);
	}

	/// Registers `serializer` under its own content type.
	pub fn register_serializer<S: RequestSerializer + 'static>(&self, serializer: S) {
		let content_type = RequestSerializer::content_type(&serializer).to_string();
		self.register_serializer_as(&content_type, Arc::new(serializer));
	}

	/// Registers `serializer` under `content_type`, replacing any previous one.
	pub fn register_serializer_as(&self, content_type: &str, serializer: Arc<dyn RequestSerializer>) {
		let key = normalize_content_type(content_type);
		tracing::debug!(content_type = %key, "registering request serializer");
		self.serializers.write().insert(key, serializer);
	}

	/// Returns the decoder for `content_type`.
	///
	/// # Errors
	///
	/// Returns [`Error::UnsupportedContentType`] if none is registered.
	pub fn decoder(&self, content_type: &str) -> Result<Arc<dyn ResponseDecoder>> {
		let key = normalize_content_type(content_type);
		self.decoders
			.read()
			.get(&key)
			.cloned()
			.ok_or(Error::UnsupportedContentType(key))
	}

	/// Returns the serializer for `content_type`.
	///
	/// # Errors
	///
	/// Returns [`Error::UnsupportedContentType`] if none is registered.
	pub fn serializer(&self, content_type: &str) -> Result<Arc<dyn RequestSerializer>> {
		let key = normalize_content_type(content_type);
		self.serializers
			.read()
			.get(&key)
			.cloned()
			.ok_or(Error::UnsupportedContentType(key))
	}

	/// Content types with a registered decoder, sorted.
	pub fn decoder_content_types(&self) -> Vec<String> {
		let mut types: Vec<String> = self.decoders.read().keys().cloned().collect();
		types.sort();
		types
	}

	/// Content types with a registered serializer, sorted.
	pub fn serializer_content_types(&self) -> Vec<String> {
		let mut types: Vec<String> = self.serializers.read().keys().cloned().collect();
		types.sort();
		types
	}
}
