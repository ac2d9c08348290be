//! Per-client execution context.

use std::sync::Arc;

use battery_codecs::registry::CodecRegistry;
use battery_core::adapters::{TypeAdapter, TypeAdapterRegistry};
use battery_core::exception::{Error, ErrorKind};
use battery_core::marshaller::{MarshalContext, UnsupportedPolicy};
use battery_core::metadata::{MetadataCache, RpcDeclaration, TypeDescriptor, describe};
use battery_core::naming::{NameTranslator, NamingConvention};
use battery_core::types::MappedObject;

use crate::handlers::{ErrorHandler, ErrorHandlers};
use crate::preprocess::RequestPreprocessor;
use crate::response::ResponseValidator;
use crate::settings::{RpcSettings, has_http_scheme};

/// Everything a request build or response decode needs besides the object:
/// base URI, default serializer, naming conventions, type adapters, codecs and
/// the optional preprocessing and validation hooks.
///
/// Adapters and codecs default to the process-wide registries.
///
/// # Examples
///
/// ```
/// use battery_core::naming::NamingConvention;
/// use battery_rpc::context::RpcContext;
///
/// let context = RpcContext::new()
///     .with_base_uri("https://api.example.com")
///     .with_default_serializer("application/json")
///     .with_local_naming(NamingConvention::SnakeCase)
///     .with_remote_naming(NamingConvention::CamelCase);
/// assert_eq!(context.base_uri(), Some("https://api.example.com"));
/// ```
#[derive(Clone)]
pub struct RpcContext {
	base_uri: Option<String>,
	default_serializer: Option<String>,
	local_naming: Option<NamingConvention>,
	remote_naming: Option<NamingConvention>,
	policy: UnsupportedPolicy,
	adapters: Arc<TypeAdapterRegistry>,
	codecs: Arc<CodecRegistry>,
	cache: Option<Arc<MetadataCache>>,
	preprocessor: Option<Arc<dyn RequestPreprocessor>>,
	validator: Option<Arc<dyn ResponseValidator>>,
	error_handlers: ErrorHandlers,
}

impl Default for RpcContext {
	fn default() -> Self {
		Self::new()
	}
}

impl RpcContext {
	pub fn new() -> Self {
		Self {
			base_uri: None,
			default_serializer: None,
			local_naming: None,
			remote_naming: None,
			policy: UnsupportedPolicy::Skip,
			adapters: TypeAdapterRegistry::global(),
			codecs: CodecRegistry::global(),
			cache: None,
			preprocessor: None,
			validator: None,
			error_handlers: ErrorHandlers::new(),
		}
	}

	/// Builds a context from loaded settings.
	///
	/// A configured date format is registered into a private adapter registry
	/// so the process-wide one is left untouched.
	pub fn from_settings(settings: &RpcSettings) -> Self {
		let mut context = Self::new().with_policy(settings.unsupported_policy);
		if let Some(base_uri) = &settings.base_uri {
			context = context.with_base_uri(base_uri.clone());
		}
		context.default_serializer = settings.default_serializer.clone();
		context.local_naming = settings.local_naming;
		context.remote_naming = settings.remote_naming;
		if let Some(format) = settings.date_format {
			let adapters = TypeAdapterRegistry::new();
			format.register(&adapters);
			context.adapters = Arc::new(adapters);
		}
		context
	}

	/// Sets the prefix of relative URI templates; one trailing `/` is dropped.
	///
	/// Only `http://` and `https://` prefixes are accepted. Anything else is
	/// logged and the previous prefix is kept.
	pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
		let base_uri = base_uri.into();
		if !has_http_scheme(&base_uri) {
			tracing::warn!(base_uri = %base_uri, "ignoring base URI without an http or https scheme");
			return self;
		}
		let trimmed = base_uri.strip_suffix('/').unwrap_or(&base_uri).to_string();
		self.base_uri = Some(trimmed);
		self
	}

	pub fn with_default_serializer(mut self, content_type: impl Into<String>) -> Self {
		self.default_serializer = Some(content_type.into());
		self
	}

	pub fn with_local_naming(mut self, convention: NamingConvention) -> Self {
		self.local_naming = Some(convention);
		self
	}

	pub fn with_remote_naming(mut self, convention: NamingConvention) -> Self {
		self.remote_naming = Some(convention);
		self
	}

	pub fn with_policy(mut self, policy: UnsupportedPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn with_adapters(mut self, adapters: Arc<TypeAdapterRegistry>) -> Self {
		self.adapters = adapters;
		self
	}

	pub fn with_codecs(mut self, codecs: Arc<CodecRegistry>) -> Self {
		self.codecs = codecs;
		self
	}

	/// Uses a private metadata cache instead of the process-wide one.
	pub fn with_cache(mut self, cache: Arc<MetadataCache>) -> Self {
		self.cache = Some(cache);
		self
	}

	pub fn with_preprocessor(mut self, preprocessor: Arc<dyn RequestPreprocessor>) -> Self {
		self.preprocessor = Some(preprocessor);
		self
	}

	pub fn with_validator(mut self, validator: Arc<dyn ResponseValidator>) -> Self {
		self.validator = Some(validator);
		self
	}

	/// Notifies `handler` of failures of the given kind, or of failures
	/// wrapping one.
	pub fn with_error_handler(mut self, kind: ErrorKind, handler: Arc<dyn ErrorHandler>) -> Self {
		self.error_handlers.register(kind, handler);
		self
	}

	/// Notifies `handler` of failures no kind-specific handler takes.
	pub fn with_fallback_error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
		self.error_handlers.set_fallback(handler);
		self
	}

	pub fn error_handlers(&self) -> &ErrorHandlers {
		&self.error_handlers
	}

	/// Passes `error` to the registered handlers and hands it back.
	pub fn dispatch_error(&self, error: Error) -> Error {
		self.error_handlers.dispatch(&error);
		error
	}

	/// Registers a type adapter in this context's registry.
	///
	/// Note that the default registry is the process-wide one.
	pub fn register_type_adapter<A: TypeAdapter>(&self, adapter: A) {
		self.adapters.register(adapter);
	}

	pub fn base_uri(&self) -> Option<&str> {
		self.base_uri.as_deref()
	}

	pub fn default_serializer(&self) -> Option<&str> {
		self.default_serializer.as_deref()
	}

	pub fn policy(&self) -> UnsupportedPolicy {
		self.policy
	}

	pub fn adapters(&self) -> &TypeAdapterRegistry {
		&self.adapters
	}

	pub fn codecs(&self) -> &CodecRegistry {
		&self.codecs
	}

	pub fn cache(&self) -> &MetadataCache {
		self.cache.as_deref().unwrap_or_else(|| MetadataCache::global())
	}

	pub fn preprocessor(&self) -> Option<&dyn RequestPreprocessor> {
		self.preprocessor.as_deref()
	}

	pub fn validator(&self) -> Option<&dyn ResponseValidator> {
		self.validator.as_deref()
	}

	/// Descriptor of `object`'s type.
	pub fn describe(&self, object: &dyn MappedObject) -> Arc<TypeDescriptor> {
		describe(&object.object_type(), Some(self.cache()))
	}

	/// Translator for a type: its own naming declarations win over the
	/// context's.
	pub fn translator_for(&self, declaration: Option<&RpcDeclaration>) -> NameTranslator {
		let local = declaration
			.and_then(RpcDeclaration::local_naming)
			.or(self.local_naming);
		let remote = declaration
			.and_then(RpcDeclaration::remote_naming)
			.or(self.remote_naming);
		NameTranslator::identity().with_local(local).with_remote(remote)
	}

	/// Marshalling context over this context's collaborators.
	pub fn marshal_context<'a>(&'a self, translator: &'a NameTranslator) -> MarshalContext<'a> {
		MarshalContext::new(translator, &self.adapters)
			.with_cache(Some(self.cache()))
			.with_policy(self.policy)
	}
}

impl std::fmt::Debug for RpcContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RpcContext")
			.field("base_uri", &self.base_uri)
			.field("default_serializer", &self.default_serializer)
			.field("local_naming", &self.local_naming)
			.field("remote_naming", &self.remote_naming)
			.field("policy", &self.policy)
			.field("preprocessor", &self.preprocessor.is_some())
			.field("validator", &self.validator.is_some())
			.field("error_handlers", &self.error_handlers)
			.finish_non_exhaustive()
	}
}
