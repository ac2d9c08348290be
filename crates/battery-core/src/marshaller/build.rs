//! Deserialization: document → object graph.

use super::{FilterMode, Marshaller};
use crate::codec::DocumentCodec;
use crate::coercion::{self, WireValue};
use crate::exception::{Error, Result};
use crate::metadata::{
	Member, MemberMetadata, MetadataKind, declares_members, get_mapped_members,
	get_member_metadata,
};
use crate::types::{MappedObject, MemberType, Value};

impl<C: DocumentCodec> Marshaller<'_, C> {
	/// Deserializes `document` into `target`.
	///
	/// Members are enumerated for `kind` when the type declares any, and all
	/// members otherwise; nested objects always use all members.
	///
	/// # Errors
	///
	/// Returns [`Error::Deserialization`] wrapping the first failure.
	pub fn build(
		&self,
		document: &C::Node,
		target: &mut dyn MappedObject,
		kind: MetadataKind,
	) -> Result<()> {
		self.visit_object(document, target, kind, FilterMode::Declared)
			.map_err(Error::into_deserialization)
	}

	/// Deserializes a response document into `target`.
	///
	/// If the type marks exactly one member as response object, the whole
	/// document is decoded into a fresh instance of that member's type and
	/// assigned to it.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidDeclaration`] if several members are marked as
	/// response object, or if response-object and response members are mixed.
	pub fn build_response(&self, document: &C::Node, target: &mut dyn MappedObject) -> Result<()> {
		let object_type = target.object_type();
		let cache = self.context.cache();
		let indirect = get_mapped_members(&object_type, MetadataKind::ResponseObject, cache);

		let member = match &*indirect {
			[] => return self.build(document, target, MetadataKind::Response),
			[member] => member,
			_ => {
				return Err(Error::InvalidDeclaration {
					type_name: object_type.key().name().to_string(),
					reason: "more than one response object member".to_string(),
				});
			}
		};

		if declares_members(&object_type, MetadataKind::Response, cache) {
			return Err(Error::InvalidDeclaration {
				type_name: object_type.key().name().to_string(),
				reason: "response object cannot be combined with response members".to_string(),
			});
		}
		let MemberType::Object(nested) = member.member_type() else {
			return Err(Error::InvalidDeclaration {
				type_name: object_type.key().name().to_string(),
				reason: format!("response object member {} is not a mapped type", member.name()),
			});
		};

		let mut instance = nested.instantiate();
		self.visit_object(document, instance.as_mut(), MetadataKind::Response, FilterMode::All)
			.and_then(|()| member.write(target, Value::Object(instance)))
			.map_err(Error::into_deserialization)
	}

	fn visit_object(
		&self,
		node: &C::Node,
		target: &mut dyn MappedObject,
		kind: MetadataKind,
		filter: FilterMode,
	) -> Result<()> {
		let members = self.context.members(&target.object_type(), kind, filter);
		for member in members.iter() {
			self.visit_member(node, target, member, kind)?;
		}
		Ok(())
	}

	fn visit_member(
		&self,
		node: &C::Node,
		target: &mut dyn MappedObject,
		member: &Member,
		kind: MetadataKind,
	) -> Result<()> {
		let metadata = get_member_metadata(member, kind, self.context.cache()).unwrap_or_default();

		let Some(child) = self.resolve(node, member, &metadata) else {
			if metadata.required {
				return Err(Error::MissingField(member.name().to_string()));
			}
			return self.clear_absent(target, member);
		};

		if self.format.is_null(child) {
			return self.assign_null(target, member);
		}

		let decoded = self.decode_value(
			child,
			member.member_type(),
			member.name(),
			member.nullable(),
			kind,
		)?;
		match decoded {
			Some(value) => member.write(target, value),
			None => Ok(()),
		}
	}

	/// Finds the document node for `member`.
	///
	/// An explicit key wins and is never retried; a translated key falls back
	/// to the literal member name.
	fn resolve<'n>(
		&self,
		node: &'n C::Node,
		member: &Member,
		metadata: &MemberMetadata,
	) -> Option<&'n C::Node> {
		match metadata.remote_name {
			Some(path) if path.contains('.') => self.find_child(node, path),
			Some(key) => self.lookup(node, key),
			None => {
				let translated = self.context.translator().local_to_remote(member.name());
				self.lookup(node, &translated).or_else(|| {
					(translated != member.name())
						.then(|| self.lookup(node, member.name()))
						.flatten()
				})
			}
		}
	}

	fn lookup<'n>(&self, node: &'n C::Node, key: &str) -> Option<&'n C::Node> {
		if self.format.is_child_present(node, key) {
			self.format.child(node, key)
		} else {
			None
		}
	}

	/// Resolves a dotted path.
	///
	/// A key equal to the whole path is tried first. A missing fragment at any
	/// depth yields `None`.
	pub(crate) fn find_child<'n>(&self, node: &'n C::Node, path: &str) -> Option<&'n C::Node> {
		if let Some(child) = self.lookup(node, path) {
			return Some(child);
		}
		path.split('.')
			.try_fold(node, |current, fragment| self.lookup(current, fragment))
	}

	fn assign_null(&self, target: &mut dyn MappedObject, member: &Member) -> Result<()> {
		if member.nullable() {
			member.write(target, Value::Null)
		} else {
			member.reset(target)
		}
	}

	/// Absent optional members become null; primitives keep their value and
	/// other non-nullable members are reset to their default.
	fn clear_absent(&self, target: &mut dyn MappedObject, member: &Member) -> Result<()> {
		if member.nullable() {
			member.write(target, Value::Null)
		} else if member.member_type().is_primitive() {
			Ok(())
		} else {
			member.reset(target)
		}
	}

	/// Decodes a non-null node into a value of `ty`.
	///
	/// `None` means the member is skipped.
	fn decode_value(
		&self,
		node: &C::Node,
		ty: &MemberType,
		field: &str,
		nullable: bool,
		kind: MetadataKind,
	) -> Result<Option<Value>> {
		let wire = self.format.wire_value(node);
		if wire.is_built_in() {
			if let Some(adapter) = self.context.adapters().find(ty.adapter_key()) {
				return adapter.decode(&coercion::to_string(&wire)).map(Some);
			}
		}

		match ty {
			MemberType::Scalar(scalar) => coercion::coerce(field, &wire, *scalar).map(Some),
			MemberType::Enum(info) => Ok(match coercion::to_enum(field, &wire, info) {
				Some(name) => Some(Value::Enum(name)),
				None if nullable => Some(Value::Null),
				None => None,
			}),
			MemberType::List(element) => {
				if !self.format.is_array(node) {
					tracing::warn!(field, value = %wire, "expected an array");
				}
				self.visit_array(node, element, kind)
					.map(|items| Some(Value::List(items)))
			}
			MemberType::Map(_) => self
				.context
				.unsupported(field, "map deserialization is not implemented")
				.map(|()| None),
			MemberType::Object(object_type) => {
				if object_type.key().is_platform_type() {
					tracing::debug!(field, type_name = object_type.key().name(), "skipping platform type");
					return Ok(None);
				}
				if !self.format.is_object(node) {
					return Err(Error::incompatible(field, ty.describe(), wire.to_string()));
				}
				let mut instance = object_type.instantiate();
				self.visit_object(node, instance.as_mut(), kind, FilterMode::All)?;
				Ok(Some(Value::Object(instance)))
			}
			MemberType::Opaque(key) => self
				.context
				.unsupported(field, &format!("no type adapter registered for {}", key.name()))
				.map(|()| None),
		}
	}

	/// Decodes array elements; the element index names the field in errors.
	fn visit_array(
		&self,
		node: &C::Node,
		element: &MemberType,
		kind: MetadataKind,
	) -> Result<Vec<Value>> {
		let mut items = Vec::new();
		for (index, child) in self.format.array_children(node).enumerate() {
			let label = index.to_string();
			if self.format.is_null(child) {
				items.push(Value::Null);
				continue;
			}
			if element.is_list() || element.is_map() {
				self.context
					.unsupported(&label, "nested collection elements are not supported")?;
				continue;
			}
			if let Some(value) = self.decode_value(child, element, &label, false, kind)? {
				items.push(value);
			}
		}
		Ok(items)
	}
}

impl<C: DocumentCodec> Marshaller<'_, C> {
	/// Scalar view of the node at `path`, for diagnostics and tests.
	pub fn wire_value_at<'n>(&self, document: &'n C::Node, path: &str) -> Option<WireValue<'n>> {
		self.find_child(document, path)
			.map(|node| self.format.wire_value(node))
	}
}
