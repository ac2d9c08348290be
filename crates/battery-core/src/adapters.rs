//! Type adapters: per-type encode/decode pairs that bypass generic coercion.
//!
//! An adapter translates between a wire string and values of one target type
//! (typically an opaque type such as a date). Adapters are looked up by the
//! member's declared type in a [`TypeAdapterRegistry`]; the registry keeps at
//! most one adapter per type and the last registration wins.
//!
//! # Examples
//!
//! ```
//! use battery_core::adapters::{Iso8601DateAdapter, TypeAdapterRegistry};
//! use battery_core::types::TypeKey;
//! use chrono::{DateTime, Utc};
//!
//! let registry = TypeAdapterRegistry::new();
//! registry.register(Iso8601DateAdapter);
//! assert!(registry.contains(TypeKey::of::<DateTime<Utc>>()));
//! ```

mod dates;

pub use dates::{Iso8601DateAdapter, Rfc1123DateAdapter, TimestampDateAdapter};

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::exception::{Error, Result};
use crate::types::{MemberValue, TypeKey, Value, ValueRef};

/// Encode/decode pair for one target type.
pub trait TypeAdapter: Send + Sync + 'static {
	type Target: MemberValue;

	/// Parses a wire string.
	///
	/// # Errors
	///
	/// Returns [`Error::Adapter`] if the string is not a valid representation.
	fn decode(&self, wire: &str) -> Result<Self::Target>;

	/// Renders a value as a wire string.
	fn encode(&self, value: &Self::Target) -> Result<String>;
}

/// Object-safe form of [`TypeAdapter`] stored in the registry.
pub trait ErasedTypeAdapter: Send + Sync {
	fn target(&self) -> TypeKey;
	fn decode(&self, wire: &str) -> Result<Value>;
	fn encode(&self, value: &ValueRef<'_>) -> Result<String>;
}

struct Erased<A>(A);

impl<A: TypeAdapter> ErasedTypeAdapter for Erased<A> {
	fn target(&self) -> TypeKey {
		TypeKey::of::<A::Target>()
	}

	fn decode(&self, wire: &str) -> Result<Value> {
		self.0.decode(wire).map(MemberValue::into_value)
	}

	fn encode(&self, value: &ValueRef<'_>) -> Result<String> {
		let mismatch = || {
			Error::adapter(
				self.target().short_name(),
				format!("cannot encode value {value:?}"),
			)
		};
		match value {
			ValueRef::Opaque(any) => any
				.downcast_ref::<A::Target>()
				.ok_or_else(mismatch)
				.and_then(|target| self.0.encode(target)),
			ValueRef::Object(object) => object
				.as_any()
				.downcast_ref::<A::Target>()
				.ok_or_else(mismatch)
				.and_then(|target| self.0.encode(target)),
			other => {
				let owned = other
					.to_scalar_value()
					.and_then(A::Target::from_value)
					.ok_or_else(mismatch)?;
				self.0.encode(&owned)
			}
		}
	}
}

/// Global adapter registry.
static GLOBAL_ADAPTERS: Lazy<Arc<TypeAdapterRegistry>> =
	Lazy::new(|| Arc::new(TypeAdapterRegistry::new()));

/// Registry of type adapters keyed by target type.
#[derive(Default)]
pub struct TypeAdapterRegistry {
	adapters: RwLock<HashMap<TypeKey, Arc<dyn ErasedTypeAdapter>>>,
}

impl TypeAdapterRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the process-wide registry.
	pub fn global() -> Arc<TypeAdapterRegistry> {
		Arc::clone(&GLOBAL_ADAPTERS)
	}

	/// Registers `adapter` for its target type, replacing any previous one.
	pub fn register<A: TypeAdapter>(&self, adapter: A) {
		let erased: Arc<dyn ErasedTypeAdapter> = Arc::new(Erased(adapter));
		let key = erased.target();
		if self.adapters.write().insert(key, erased).is_some() {
			tracing::debug!(type_name = key.name(), "replaced type adapter");
		}
	}

	/// Returns the adapter registered for `key`.
	pub fn get(&self, key: TypeKey) -> Option<Arc<dyn ErasedTypeAdapter>> {
		self.adapters.read().get(&key).cloned()
	}

	/// Returns the adapter for `key`, if any.
	pub fn find(&self, key: Option<TypeKey>) -> Option<Arc<dyn ErasedTypeAdapter>> {
		key.and_then(|key| self.get(key))
	}

	pub fn contains(&self, key: TypeKey) -> bool {
		self.adapters.read().contains_key(&key)
	}

	/// Removes the adapter for `key`.
	pub fn unregister(&self, key: TypeKey) -> bool {
		self.adapters.write().remove(&key).is_some()
	}

	pub fn len(&self) -> usize {
		self.adapters.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.read().is_empty()
	}

	/// Removes every adapter.
	///
	/// This is primarily useful for testing.
	pub fn clear(&self) {
		self.adapters.write().clear();
	}
}
