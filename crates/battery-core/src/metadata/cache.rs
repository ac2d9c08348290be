//! Process-wide cache of type descriptors, member lists and member metadata.
//!
//! Entries are computed on first access and never evicted. Two threads missing
//! the same entry may both compute it; the computation is pure, so whichever
//! insert lands last is equivalent to the other.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::{Member, MemberMetadata, MetadataKind, TypeDescriptor};
use crate::types::{ObjectType, TypeKey};

/// Global cache shared by every marshalling call that does not bring its own.
static GLOBAL_CACHE: Lazy<MetadataCache> = Lazy::new(MetadataCache::new);

type MemberKey = (TypeKey, &'static str, MetadataKind);

/// Memoized type registrations.
#[derive(Default)]
pub struct MetadataCache {
	descriptors: RwLock<HashMap<TypeKey, Arc<TypeDescriptor>>>,
	members: RwLock<HashMap<(TypeKey, MetadataKind), Arc<[Member]>>>,
	metadata: RwLock<HashMap<MemberKey, Option<MemberMetadata>>>,
}

impl MetadataCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the process-wide cache.
	pub fn global() -> &'static MetadataCache {
		&GLOBAL_CACHE
	}

	/// Returns the descriptor of `object_type`, running its registration
	/// function on a miss.
	pub fn descriptor(&self, object_type: &ObjectType) -> Arc<TypeDescriptor> {
		let key = object_type.key();
		if let Some(descriptor) = self.descriptors.read().get(&key) {
			return Arc::clone(descriptor);
		}

		let descriptor = Arc::new(object_type.describe());
		tracing::debug!(type_name = key.name(), "caching type descriptor");
		self.descriptors.write().insert(key, Arc::clone(&descriptor));
		descriptor
	}

	/// Returns the members of `object_type` mapped as `kind`.
	pub fn members(&self, object_type: &ObjectType, kind: MetadataKind) -> Arc<[Member]> {
		let key = (object_type.key(), kind);
		if let Some(members) = self.members.read().get(&key) {
			return Arc::clone(members);
		}

		let members = collect_members(&self.descriptor(object_type), kind);
		self.members.write().insert(key, Arc::clone(&members));
		members
	}

	/// Returns the parsed metadata of `member` for `kind`, if the member is
	/// annotated for it.
	pub fn member_metadata(&self, member: &Member, kind: MetadataKind) -> Option<MemberMetadata> {
		let key = (member.owner(), member.name(), kind);
		if let Some(metadata) = self.metadata.read().get(&key) {
			return metadata.clone();
		}

		let metadata = parse_metadata(member, kind);
		self.metadata.write().insert(key, metadata.clone());
		metadata
	}

	/// Number of cached descriptors.
	pub fn len(&self) -> usize {
		self.descriptors.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.descriptors.read().is_empty()
	}

	/// Drops every entry.
	///
	/// This is primarily useful for testing.
	pub fn clear(&self) {
		self.descriptors.write().clear();
		self.members.write().clear();
		self.metadata.write().clear();
	}
}

fn collect_members(descriptor: &TypeDescriptor, kind: MetadataKind) -> Arc<[Member]> {
	descriptor.members_of(kind).cloned().collect()
}

fn parse_metadata(member: &Member, kind: MetadataKind) -> Option<MemberMetadata> {
	member
		.annotation(kind)
		.map(MemberMetadata::from_annotation)
}

/// Returns the descriptor of `object_type`, through `cache` when given.
pub fn describe(object_type: &ObjectType, cache: Option<&MetadataCache>) -> Arc<TypeDescriptor> {
	match cache {
		Some(cache) => cache.descriptor(object_type),
		None => Arc::new(object_type.describe()),
	}
}

/// Returns the ordered members of `object_type` mapped as `kind`.
///
/// [`MetadataKind::All`] enumerates every registered member. Without a cache
/// the list is recomputed on every call.
///
/// # Examples
///
/// ```
/// use battery_core::member;
/// use battery_core::metadata::{MetadataCache, MetadataKind, TypeDescriptor, get_mapped_members};
/// use battery_core::types::{Mapped, ObjectType};
///
/// #[derive(Default)]
/// struct Search {
///     q: String,
///     page: i32,
/// }
///
/// impl Mapped for Search {
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>()
///             .member(member!(Search, q).query())
///             .member(member!(Search, page))
///             .build()
///     }
/// }
///
/// let cache = MetadataCache::new();
/// let ty = ObjectType::of::<Search>();
/// assert_eq!(get_mapped_members(&ty, MetadataKind::QueryString, Some(&cache)).len(), 1);
/// assert_eq!(get_mapped_members(&ty, MetadataKind::All, None).len(), 2);
/// ```
pub fn get_mapped_members(
	object_type: &ObjectType,
	kind: MetadataKind,
	cache: Option<&MetadataCache>,
) -> Arc<[Member]> {
	match cache {
		Some(cache) => cache.members(object_type, kind),
		None => collect_members(&object_type.describe(), kind),
	}
}

/// Returns the parsed metadata of `member` for `kind`.
pub fn get_member_metadata(
	member: &Member,
	kind: MetadataKind,
	cache: Option<&MetadataCache>,
) -> Option<MemberMetadata> {
	match cache {
		Some(cache) => cache.member_metadata(member, kind),
		None => parse_metadata(member, kind),
	}
}

/// Returns true if `object_type` explicitly maps at least one member as
/// `kind`.
pub fn declares_members(
	object_type: &ObjectType,
	kind: MetadataKind,
	cache: Option<&MetadataCache>,
) -> bool {
	kind != MetadataKind::All && !get_mapped_members(object_type, kind, cache).is_empty()
}
