//! Object graph marshaller.
//!
//! Deserialization walks a parsed document with a [`DocumentCodec`] and writes
//! into a target object; serialization reads an object and builds a document
//! with a [`DocumentEncoder`]. Both directions enumerate members through the
//! metadata cache, translate keys with the context's [`NameTranslator`] and
//! consult its [`TypeAdapterRegistry`] before generic coercion.
//!
//! A traversal holds no state beyond the call: the same [`MarshalContext`]
//! can drive any number of concurrent calls.
//!
//! Failures abort the whole top-level call and are wrapped once in
//! [`Error::Deserialization`] or [`Error::Serialization`]. Members written
//! before the failure keep their new values.
//!
//! # Examples
//!
//! ```
//! use battery_core::member;
//! use battery_core::adapters::TypeAdapterRegistry;
//! use battery_core::marshaller::MarshalContext;
//! use battery_core::metadata::TypeDescriptor;
//! use battery_core::naming::NameTranslator;
//! use battery_core::types::Mapped;
//!
//! #[derive(Debug, Default)]
//! struct Ping {
//!     sequence: i32,
//! }
//!
//! impl Mapped for Ping {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>()
//!             .member(member!(Ping, sequence).response().request_body())
//!             .build()
//!     }
//! }
//!
//! let translator = NameTranslator::identity();
//! let adapters = TypeAdapterRegistry::new();
//! let context = MarshalContext::new(&translator, &adapters);
//! assert!(context.cache().is_some());
//! ```

mod build;
mod dump;
#[cfg(test)]
mod fixtures;

use serde::{Deserialize, Serialize};

use crate::adapters::TypeAdapterRegistry;
use crate::codec::{DocumentCodec, DocumentEncoder};
use crate::exception::{Error, Result};
use crate::metadata::{
	Member, MetadataCache, MetadataKind, declares_members, get_mapped_members,
};
use crate::naming::NameTranslator;
use crate::types::{MappedObject, ObjectType};

/// How members are enumerated for one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
	/// Only members annotated for the traversal's metadata kind, falling back
	/// to all members when the type declares none.
	Declared,
	/// Every registered member.
	All,
}

/// What to do with members the marshaller cannot translate (maps, nested
/// collections, opaque types without an adapter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedPolicy {
	/// Log a warning and leave the member untouched.
	#[default]
	Skip,
	/// Abort the traversal with [`Error::UnsupportedMember`].
	Fail,
}

/// Shared collaborators of a traversal.
#[derive(Clone, Copy)]
pub struct MarshalContext<'a> {
	translator: &'a NameTranslator,
	adapters: &'a TypeAdapterRegistry,
	cache: Option<&'a MetadataCache>,
	policy: UnsupportedPolicy,
}

impl<'a> MarshalContext<'a> {
	/// Creates a context using the global metadata cache and the `Skip`
	/// policy.
	pub fn new(translator: &'a NameTranslator, adapters: &'a TypeAdapterRegistry) -> Self {
		Self {
			translator,
			adapters,
			cache: Some(MetadataCache::global()),
			policy: UnsupportedPolicy::Skip,
		}
	}

	/// Uses `cache`, or recomputes metadata on every access when `None`.
	pub fn with_cache(mut self, cache: Option<&'a MetadataCache>) -> Self {
		self.cache = cache;
		self
	}

	pub fn with_policy(mut self, policy: UnsupportedPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn translator(&self) -> &'a NameTranslator {
		self.translator
	}

	pub fn adapters(&self) -> &'a TypeAdapterRegistry {
		self.adapters
	}

	pub fn cache(&self) -> Option<&'a MetadataCache> {
		self.cache
	}

	pub fn policy(&self) -> UnsupportedPolicy {
		self.policy
	}

	/// Members of `object_type` to visit for `kind` under `filter`.
	pub(crate) fn members(
		&self,
		object_type: &ObjectType,
		kind: MetadataKind,
		filter: FilterMode,
	) -> std::sync::Arc<[Member]> {
		let effective = match filter {
			FilterMode::Declared if declares_members(object_type, kind, self.cache) => kind,
			_ => MetadataKind::All,
		};
		get_mapped_members(object_type, effective, self.cache)
	}

	/// Applies the unsupported-member policy.
	pub(crate) fn unsupported(&self, member: &str, reason: &str) -> Result<()> {
		match self.policy {
			UnsupportedPolicy::Skip => {
				tracing::warn!(member, reason, "skipping unsupported member");
				Ok(())
			}
			UnsupportedPolicy::Fail => Err(Error::UnsupportedMember {
				member: member.to_string(),
				reason: reason.to_string(),
			}),
		}
	}
}

impl std::fmt::Debug for MarshalContext<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MarshalContext")
			.field("translator", self.translator)
			.field("adapters", &self.adapters.len())
			.field("cached", &self.cache.is_some())
			.field("policy", &self.policy)
			.finish()
	}
}

/// Drives one traversal with a codec (deserialization) or an encoder
/// (serialization).
pub struct Marshaller<'a, F: ?Sized> {
	format: &'a F,
	context: &'a MarshalContext<'a>,
}

impl<'a, F: ?Sized> Marshaller<'a, F> {
	pub fn new(format: &'a F, context: &'a MarshalContext<'a>) -> Self {
		Self { format, context }
	}
}

/// Deserializes `document` into `target` using its response-mapped members.
///
/// # Errors
///
/// Returns [`Error::Deserialization`] wrapping the first member failure.
pub fn build<C: DocumentCodec>(
	codec: &C,
	document: &C::Node,
	target: &mut dyn MappedObject,
	context: &MarshalContext<'_>,
) -> Result<()> {
	Marshaller::new(codec, context).build(document, target, MetadataKind::Response)
}

/// Serializes the request-body members of `source`.
///
/// Returns `None` when nothing was emitted.
///
/// # Errors
///
/// Returns [`Error::Serialization`] wrapping the first member failure.
pub fn dump<E: DocumentEncoder>(
	encoder: &E,
	source: &dyn MappedObject,
	context: &MarshalContext<'_>,
) -> Result<Option<E::Fragment>> {
	Marshaller::new(encoder, context).dump(source, MetadataKind::RequestBody)
}
