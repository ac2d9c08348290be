//! Error types for marshalling and request building.
//!
//! Every failure the engine can report is a variant of [`Error`]. Failures
//! raised while walking an object graph are wrapped once at the top level in
//! [`Error::Serialization`] or [`Error::Deserialization`]; use
//! [`Error::root_cause`] to reach the member-level cause.

use thiserror::Error;

/// Boxed error used for causes supplied by collaborators (preprocessors,
/// validators, transports).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while marshalling objects or building requests.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
	/// A wire value could not be coerced into the member's declared kind.
	#[error("field {field}: {expected} expected, value is {actual}.")]
	IncompatibleType {
		/// Member name, or the positional index for list elements.
		field: String,
		/// Expected kind, e.g. `integer`.
		expected: String,
		/// Textual form of the offending wire value.
		actual: String,
	},

	/// A required member had no matching key in the document.
	#[error("Field {0}: missing")]
	MissingField(String),

	/// No codec or serializer is registered for the content type.
	#[error("Unsupported content type: {0}")]
	UnsupportedContentType(String),

	/// The codec could not parse the raw input.
	#[error("Malformed document: {0}")]
	MalformedDocument(String),

	/// The request preprocessor rejected the object before the build.
	#[error("Context validation failed: {0}")]
	ContextValidation(#[source] BoxError),

	/// A failure raised while serializing an object graph.
	#[error("Error while serializing: {0}")]
	Serialization(#[source] Box<Error>),

	/// A failure raised while deserializing a document into an object graph.
	#[error("Error while deserializing: {0}")]
	Deserialization(#[source] Box<Error>),

	/// A type adapter failed to encode or decode a value.
	#[error("Type adapter for {type_name} failed: {message}")]
	Adapter {
		/// Target type of the adapter.
		type_name: String,
		/// Adapter-specific failure description.
		message: String,
	},

	/// A member type the marshaller cannot handle (raised only when the
	/// unsupported-member policy is `Fail`).
	#[error("Unsupported member {member}: {reason}")]
	UnsupportedMember {
		/// Member name or element index.
		member: String,
		/// What is unsupported about it.
		reason: String,
	},

	/// The type descriptor's declarations contradict each other.
	#[error("Invalid declaration on {type_name}: {reason}")]
	InvalidDeclaration {
		/// Type carrying the declaration.
		type_name: String,
		/// Description of the conflict.
		reason: String,
	},

	/// The request descriptor could not be built (URI template, path members).
	#[error("Request build failed: {0}")]
	Build(String),

	/// The response validator rejected a decoded object.
	#[error("Response validation failed: {0}")]
	ResponseValidation(#[source] BoxError),

	/// The transport collaborator reported an error.
	#[error("Transport error: {0}")]
	Transport(#[source] BoxError),
}

/// Discriminant of an [`Error`], used to key per-kind error handlers.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	IncompatibleType,
	MissingField,
	UnsupportedContentType,
	MalformedDocument,
	ContextValidation,
	Serialization,
	Deserialization,
	Adapter,
	UnsupportedMember,
	InvalidDeclaration,
	Build,
	ResponseValidation,
	Transport,
}

impl Error {
	/// Kind of this error, without looking through wrappers.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::IncompatibleType { .. } => ErrorKind::IncompatibleType,
			Self::MissingField(_) => ErrorKind::MissingField,
			Self::UnsupportedContentType(_) => ErrorKind::UnsupportedContentType,
			Self::MalformedDocument(_) => ErrorKind::MalformedDocument,
			Self::ContextValidation(_) => ErrorKind::ContextValidation,
			Self::Serialization(_) => ErrorKind::Serialization,
			Self::Deserialization(_) => ErrorKind::Deserialization,
			Self::Adapter { .. } => ErrorKind::Adapter,
			Self::UnsupportedMember { .. } => ErrorKind::UnsupportedMember,
			Self::InvalidDeclaration { .. } => ErrorKind::InvalidDeclaration,
			Self::Build(_) => ErrorKind::Build,
			Self::ResponseValidation(_) => ErrorKind::ResponseValidation,
			Self::Transport(_) => ErrorKind::Transport,
		}
	}

	/// The error wrapped by a serialization or deserialization failure.
	pub fn wrapped(&self) -> Option<&Error> {
		match self {
			Self::Serialization(inner) | Self::Deserialization(inner) => Some(inner.as_ref()),
			_ => None,
		}
	}

	/// Creates an [`Error::IncompatibleType`].
	pub fn incompatible(
		field: impl Into<String>,
		expected: impl Into<String>,
		actual: impl Into<String>,
	) -> Self {
		Self::IncompatibleType {
			field: field.into(),
			expected: expected.into(),
			actual: actual.into(),
		}
	}

	/// Creates an [`Error::Adapter`] for the given target type.
	pub fn adapter(type_name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Adapter {
			type_name: type_name.into(),
			message: message.into(),
		}
	}

	/// Wraps `self` as a deserialization failure unless it already is one.
	pub fn into_deserialization(self) -> Self {
		match self {
			Self::Deserialization(_) => self,
			other => Self::Deserialization(Box::new(other)),
		}
	}

	/// Wraps `self` as a serialization failure unless it already is one.
	pub fn into_serialization(self) -> Self {
		match self {
			Self::Serialization(_) => self,
			other => Self::Serialization(Box::new(other)),
		}
	}

	/// Returns the innermost error below any serialization or deserialization
	/// wrappers.
	///
	/// # Examples
	///
	/// ```
	/// use battery_core::exception::Error;
	///
	/// let err = Error::MissingField("id".to_string()).into_deserialization();
	/// assert!(matches!(err.root_cause(), Error::MissingField(name) if name == "id"));
	/// ```
	pub fn root_cause(&self) -> &Error {
		match self.wrapped() {
			Some(inner) => inner.root_cause(),
			None => self,
		}
	}

	/// Returns true if the root cause is a missing required field.
	pub fn is_missing_field(&self) -> bool {
		matches!(self.root_cause(), Self::MissingField(_))
	}

	/// Returns true if the root cause is a coercion failure.
	pub fn is_incompatible_type(&self) -> bool {
		matches!(self.root_cause(), Self::IncompatibleType { .. })
	}
}

/// Result type alias for marshalling operations.
pub type Result<T> = std::result::Result<T, Error>;
