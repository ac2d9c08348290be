//! Error callbacks keyed by error kind.
//!
//! Handlers are looked up for the reported error first, then for each error it
//! wraps, and finally the fallback handler is used.

use std::collections::HashMap;
use std::sync::Arc;

use battery_core::exception::{Error, ErrorKind};

/// Callback notified of a failed build, send or decode.
pub trait ErrorHandler: Send + Sync {
	fn handle(&self, error: &Error);
}

impl<F> ErrorHandler for F
where
	F: Fn(&Error) + Send + Sync,
{
	fn handle(&self, error: &Error) {
		self(error)
	}
}

/// Per-kind error handlers with an optional catch-all.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use battery_core::exception::{Error, ErrorKind};
/// use battery_rpc::handlers::ErrorHandlers;
///
/// let mut handlers = ErrorHandlers::new();
/// handlers.register(ErrorKind::MissingField, Arc::new(|_: &Error| {}));
///
/// let wrapped = Error::MissingField("id".to_string()).into_deserialization();
/// assert!(handlers.dispatch(&wrapped));
/// assert!(!handlers.dispatch(&Error::Build("no URI".to_string())));
/// ```
#[derive(Clone, Default)]
pub struct ErrorHandlers {
	handlers: HashMap<ErrorKind, Arc<dyn ErrorHandler>>,
	fallback: Option<Arc<dyn ErrorHandler>>,
}

impl ErrorHandlers {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `handler` for `kind`, replacing any previous one.
	pub fn register(&mut self, kind: ErrorKind, handler: Arc<dyn ErrorHandler>) {
		self.handlers.insert(kind, handler);
	}

	/// Handler used when no kind-specific handler matches.
	pub fn set_fallback(&mut self, handler: Arc<dyn ErrorHandler>) {
		self.fallback = Some(handler);
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty() && self.fallback.is_none()
	}

	/// Finds the handler for `error`.
	pub fn find(&self, error: &Error) -> Option<&dyn ErrorHandler> {
		let mut current = Some(error);
		while let Some(error) = current {
			if let Some(handler) = self.handlers.get(&error.kind()) {
				return Some(handler.as_ref());
			}
			current = error.wrapped();
		}
		self.fallback.as_deref()
	}

	/// Notifies the matching handler. Returns whether one was found.
	pub fn dispatch(&self, error: &Error) -> bool {
		match self.find(error) {
			Some(handler) => {
				tracing::debug!(kind = ?error.kind(), "dispatching error to handler");
				handler.handle(error);
				true
			}
			None => false,
		}
	}
}

impl std::fmt::Debug for ErrorHandlers {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ErrorHandlers")
			.field("kinds", &self.handlers.keys().collect::<Vec<_>>())
			.field("fallback", &self.fallback.is_some())
			.finish()
	}
}
