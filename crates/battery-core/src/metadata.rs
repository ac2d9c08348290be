//! Declarative mapping metadata.
//!
//! A [`TypeDescriptor`] is the explicit registration of a mapped type: its
//! members (with accessors and annotations) and an optional type-level
//! [`RpcDeclaration`]. Descriptors and the member lists derived from them are
//! memoized by the [`MetadataCache`].
//!
//! # Examples
//!
//! ```
//! use battery_core::member;
//! use battery_core::metadata::{MetadataKind, RpcDeclaration, TypeDescriptor};
//! use battery_core::types::Mapped;
//!
//! #[derive(Debug, Default)]
//! struct GetUser {
//!     id: i64,
//!     name: Option<String>,
//! }
//!
//! impl Mapped for GetUser {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>()
//!             .rpc(RpcDeclaration::get("/users/{1}"))
//!             .member(member!(GetUser, id).uri_path(1).response().required())
//!             .member(member!(GetUser, name).response_as("display_name"))
//!             .build()
//!     }
//! }
//!
//! let descriptor = GetUser::describe();
//! assert_eq!(descriptor.members_of(MetadataKind::Response).count(), 2);
//! ```

mod cache;

pub use cache::{
	MetadataCache, declares_members, describe, get_mapped_members, get_member_metadata,
};

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use http::Method;

use crate::exception::{Error, Result};
use crate::naming::NamingConvention;
use crate::types::{Mapped, MappedObject, MemberType, MemberValue, TypeKey, Value, ValueRef};

/// Kinds of declarative metadata a member can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
	/// Deserialized from the response document.
	Response,
	/// Serialized into the request body.
	RequestBody,
	/// Appended to the query string.
	QueryString,
	/// Substituted into the URI template at an ordinal position.
	UriPath,
	/// Holds the complete request URI.
	Uri,
	/// Receives the whole response document as a nested object.
	ResponseObject,
	/// Every member, annotated or not.
	All,
}

/// A declarative marker attached to a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
	Response {
		name: Option<&'static str>,
		required: bool,
	},
	RequestBody {
		name: Option<&'static str>,
	},
	QueryString {
		name: Option<&'static str>,
	},
	UriPath {
		ordinal: usize,
	},
	Uri,
	ResponseObject,
}

impl Annotation {
	pub fn kind(&self) -> MetadataKind {
		match self {
			Self::Response { .. } => MetadataKind::Response,
			Self::RequestBody { .. } => MetadataKind::RequestBody,
			Self::QueryString { .. } => MetadataKind::QueryString,
			Self::UriPath { .. } => MetadataKind::UriPath,
			Self::Uri => MetadataKind::Uri,
			Self::ResponseObject => MetadataKind::ResponseObject,
		}
	}
}

/// Parsed metadata of one member under one metadata kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberMetadata {
	/// Explicit remote key, overriding name translation.
	pub remote_name: Option<&'static str>,
	/// Whether deserialization fails when the key is absent.
	pub required: bool,
	/// 1-based URI path position.
	pub ordinal: Option<usize>,
}

impl MemberMetadata {
	pub(crate) fn from_annotation(annotation: &Annotation) -> Self {
		match annotation {
			Annotation::Response { name, required } => Self {
				remote_name: *name,
				required: *required,
				ordinal: None,
			},
			Annotation::RequestBody { name } | Annotation::QueryString { name } => Self {
				remote_name: *name,
				..Self::default()
			},
			Annotation::UriPath { ordinal } => Self {
				ordinal: Some(*ordinal),
				..Self::default()
			},
			Annotation::Uri | Annotation::ResponseObject => Self::default(),
		}
	}
}

enum WriteFailure {
	Owner,
	Value(&'static str),
}

trait Accessor: Send + Sync {
	fn read<'a>(&self, object: &'a dyn Any) -> Option<ValueRef<'a>>;
	fn write(&self, object: &mut dyn Any, value: Value) -> std::result::Result<(), WriteFailure>;
	fn reset(&self, object: &mut dyn Any) -> bool;
	fn readable(&self) -> bool;
}

struct FieldAccessor<T, V, G, M> {
	get: G,
	get_mut: M,
	_marker: PhantomData<fn(&T) -> &V>,
}

impl<T, V, G, M> Accessor for FieldAccessor<T, V, G, M>
where
	T: 'static,
	V: MemberValue,
	G: Fn(&T) -> &V + Send + Sync,
	M: Fn(&mut T) -> &mut V + Send + Sync,
{
	fn read<'a>(&self, object: &'a dyn Any) -> Option<ValueRef<'a>> {
		object.downcast_ref::<T>().map(|target| (self.get)(target).view())
	}

	fn write(&self, object: &mut dyn Any, value: Value) -> std::result::Result<(), WriteFailure> {
		let target = object.downcast_mut::<T>().ok_or(WriteFailure::Owner)?;
		let kind = value.kind_name();
		let converted = V::from_value(value).ok_or(WriteFailure::Value(kind))?;
		*(self.get_mut)(target) = converted;
		Ok(())
	}

	fn reset(&self, object: &mut dyn Any) -> bool {
		match object.downcast_mut::<T>() {
			Some(target) => {
				*(self.get_mut)(target) = V::default();
				true
			}
			None => false,
		}
	}

	fn readable(&self) -> bool {
		true
	}
}

struct SetterAccessor<T, V, S> {
	set: S,
	_marker: PhantomData<fn(&mut T, V)>,
}

impl<T, V, S> Accessor for SetterAccessor<T, V, S>
where
	T: 'static,
	V: MemberValue,
	S: Fn(&mut T, V) + Send + Sync,
{
	fn read<'a>(&self, _object: &'a dyn Any) -> Option<ValueRef<'a>> {
		None
	}

	fn write(&self, object: &mut dyn Any, value: Value) -> std::result::Result<(), WriteFailure> {
		let target = object.downcast_mut::<T>().ok_or(WriteFailure::Owner)?;
		let kind = value.kind_name();
		let converted = V::from_value(value).ok_or(WriteFailure::Value(kind))?;
		(self.set)(target, converted);
		Ok(())
	}

	fn reset(&self, object: &mut dyn Any) -> bool {
		match object.downcast_mut::<T>() {
			Some(target) => {
				(self.set)(target, V::default());
				true
			}
			None => false,
		}
	}

	fn readable(&self) -> bool {
		false
	}
}

/// A mapping-eligible slot of a registered type.
#[derive(Clone)]
pub struct Member {
	name: &'static str,
	owner: TypeKey,
	member_type: MemberType,
	nullable: bool,
	annotations: Vec<Annotation>,
	accessor: Arc<dyn Accessor>,
}

impl Member {
	/// Creates a readable and writable member backed by a struct field.
	///
	/// See also the [`member!`](crate::member) shorthand.
	pub fn field<T, V, G, M>(name: &'static str, get: G, get_mut: M) -> Self
	where
		T: 'static,
		V: MemberValue,
		G: Fn(&T) -> &V + Send + Sync + 'static,
		M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
	{
		Self {
			name,
			owner: TypeKey::of::<T>(),
			member_type: V::member_type(),
			nullable: V::nullable(),
			annotations: Vec::new(),
			accessor: Arc::new(FieldAccessor {
				get,
				get_mut,
				_marker: PhantomData,
			}),
		}
	}

	/// Creates a write-only member backed by a setter.
	///
	/// Setter members take part in deserialization only.
	pub fn setter<T, V, S>(name: &'static str, set: S) -> Self
	where
		T: 'static,
		V: MemberValue,
		S: Fn(&mut T, V) + Send + Sync + 'static,
	{
		Self {
			name,
			owner: TypeKey::of::<T>(),
			member_type: V::member_type(),
			nullable: V::nullable(),
			annotations: Vec::new(),
			accessor: Arc::new(SetterAccessor {
				set,
				_marker: PhantomData,
			}),
		}
	}

	/// Marks the member as deserialized from the response.
	pub fn response(self) -> Self {
		self.response_with(None)
	}

	/// Marks the member as deserialized from the response under `name`.
	///
	/// A name containing `.` is resolved as a path into nested objects.
	pub fn response_as(self, name: &'static str) -> Self {
		self.response_with(Some(name))
	}

	fn response_with(mut self, name: Option<&'static str>) -> Self {
		match self.response_annotation_mut() {
			Some(Annotation::Response { name: current, .. }) => *current = name,
			_ => self.annotations.push(Annotation::Response {
				name,
				required: false,
			}),
		}
		self
	}

	/// Marks the response member as required, adding a response annotation if
	/// needed.
	pub fn required(mut self) -> Self {
		match self.response_annotation_mut() {
			Some(Annotation::Response { required, .. }) => *required = true,
			_ => self.annotations.push(Annotation::Response {
				name: None,
				required: true,
			}),
		}
		self
	}

	fn response_annotation_mut(&mut self) -> Option<&mut Annotation> {
		self.annotations
			.iter_mut()
			.find(|a| matches!(a, Annotation::Response { .. }))
	}

	pub fn request_body(self) -> Self {
		self.annotate(Annotation::RequestBody { name: None })
	}

	pub fn request_body_as(self, name: &'static str) -> Self {
		self.annotate(Annotation::RequestBody { name: Some(name) })
	}

	pub fn query(self) -> Self {
		self.annotate(Annotation::QueryString { name: None })
	}

	pub fn query_as(self, name: &'static str) -> Self {
		self.annotate(Annotation::QueryString { name: Some(name) })
	}

	/// Binds the member to the 1-based position `ordinal` of the URI template.
	pub fn uri_path(self, ordinal: usize) -> Self {
		self.annotate(Annotation::UriPath { ordinal })
	}

	/// Uses the member's value as the request URI.
	pub fn uri(self) -> Self {
		self.annotate(Annotation::Uri)
	}

	/// Decodes the whole response document into this member.
	pub fn response_object(self) -> Self {
		self.annotate(Annotation::ResponseObject)
	}

	fn annotate(mut self, annotation: Annotation) -> Self {
		let kind = annotation.kind();
		self.annotations.retain(|a| a.kind() != kind);
		self.annotations.push(annotation);
		self
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn owner(&self) -> TypeKey {
		self.owner
	}

	pub fn member_type(&self) -> &MemberType {
		&self.member_type
	}

	pub fn nullable(&self) -> bool {
		self.nullable
	}

	pub fn annotations(&self) -> &[Annotation] {
		&self.annotations
	}

	pub fn annotation(&self, kind: MetadataKind) -> Option<&Annotation> {
		self.annotations.iter().find(|a| a.kind() == kind)
	}

	/// Returns true if the member is explicitly marked for `kind`; every
	/// member matches [`MetadataKind::All`].
	pub fn is_mapped_as(&self, kind: MetadataKind) -> bool {
		kind == MetadataKind::All || self.annotation(kind).is_some()
	}

	/// Setter members cannot be read.
	pub fn is_readable(&self) -> bool {
		self.accessor.readable()
	}

	/// Borrows the member's value from `object`.
	///
	/// Returns `None` for setter members or if `object` is not the owner type.
	pub fn read<'a>(&self, object: &'a dyn MappedObject) -> Option<ValueRef<'a>> {
		self.accessor.read(object.as_any())
	}

	/// Stores `value` into the member.
	///
	/// # Errors
	///
	/// Returns [`Error::IncompatibleType`] if the value does not fit the
	/// declared type, or [`Error::InvalidDeclaration`] if `object` is not the
	/// owner type.
	pub fn write(&self, object: &mut dyn MappedObject, value: Value) -> Result<()> {
		self.accessor
			.write(object.as_any_mut(), value)
			.map_err(|failure| match failure {
				WriteFailure::Owner => self.owner_mismatch(),
				WriteFailure::Value(actual) => {
					Error::incompatible(self.name, self.member_type.describe(), actual)
				}
			})
	}

	/// Resets the member to its type's default value.
	pub fn reset(&self, object: &mut dyn MappedObject) -> Result<()> {
		if self.accessor.reset(object.as_any_mut()) {
			Ok(())
		} else {
			Err(self.owner_mismatch())
		}
	}

	fn owner_mismatch(&self) -> Error {
		Error::InvalidDeclaration {
			type_name: self.owner.name().to_string(),
			reason: format!("member {} used on a different type", self.name),
		}
	}
}

impl std::fmt::Debug for Member {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Member")
			.field("name", &self.name)
			.field("type", &self.member_type.describe())
			.field("nullable", &self.nullable)
			.field("annotations", &self.annotations)
			.finish()
	}
}

/// Builds a field [`Member`] from a type and a field name.
///
/// `member!(User, email)` expands to
/// `Member::field("email", |o: &User| &o.email, |o: &mut User| &mut o.email)`.
#[macro_export]
macro_rules! member {
	($ty:ty, $field:ident) => {
		$crate::metadata::Member::field(
			stringify!($field),
			|object: &$ty| &object.$field,
			|object: &mut $ty| &mut object.$field,
		)
	};
}

/// Type-level RPC declaration.
#[derive(Debug, Clone)]
pub struct RpcDeclaration {
	method: Method,
	uri: String,
	serializer: Option<String>,
	local_naming: Option<NamingConvention>,
	remote_naming: Option<NamingConvention>,
	expected_content_type: Option<String>,
}

impl RpcDeclaration {
	/// Creates a declaration for `method` with a URI template.
	///
	/// The template may be absolute (`http://`, `https://`) or relative to the
	/// context's base URI, and may contain `{N}` or `{}` placeholders for URI
	/// path members.
	pub fn new(method: Method, uri: impl Into<String>) -> Self {
		Self {
			method,
			uri: uri.into(),
			serializer: None,
			local_naming: None,
			remote_naming: None,
			expected_content_type: None,
		}
	}

	pub fn get(uri: impl Into<String>) -> Self {
		Self::new(Method::GET, uri)
	}

	pub fn post(uri: impl Into<String>) -> Self {
		Self::new(Method::POST, uri)
	}

	pub fn put(uri: impl Into<String>) -> Self {
		Self::new(Method::PUT, uri)
	}

	pub fn patch(uri: impl Into<String>) -> Self {
		Self::new(Method::PATCH, uri)
	}

	pub fn delete(uri: impl Into<String>) -> Self {
		Self::new(Method::DELETE, uri)
	}

	/// Overrides the context's request serializer by content type.
	pub fn with_serializer(mut self, content_type: impl Into<String>) -> Self {
		self.serializer = Some(content_type.into());
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

	/// Declares the response content type, sent as `Accept`.
	pub fn with_expected_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.expected_content_type = Some(content_type.into());
		self
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	pub fn uri(&self) -> &str {
		&self.uri
	}

	pub fn serializer(&self) -> Option<&str> {
		self.serializer.as_deref()
	}

	pub fn local_naming(&self) -> Option<NamingConvention> {
		self.local_naming
	}

	pub fn remote_naming(&self) -> Option<NamingConvention> {
		self.remote_naming
	}

	pub fn expected_content_type(&self) -> Option<&str> {
		self.expected_content_type.as_deref()
	}

	/// POST, PUT and PATCH requests carry a body.
	pub fn has_body(&self) -> bool {
		matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
	}
}

/// Explicit registration of a mapped type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
	key: TypeKey,
	rpc: Option<RpcDeclaration>,
	members: Vec<Member>,
}

impl TypeDescriptor {
	pub fn builder<T: Mapped>() -> TypeDescriptorBuilder {
		TypeDescriptorBuilder {
			key: TypeKey::of::<T>(),
			rpc: None,
			members: Vec::new(),
		}
	}

	pub fn key(&self) -> TypeKey {
		self.key
	}

	pub fn rpc(&self) -> Option<&RpcDeclaration> {
		self.rpc.as_ref()
	}

	/// Members in declaration order.
	pub fn members(&self) -> &[Member] {
		&self.members
	}

	/// Members mapped as `kind`, in declaration order.
	pub fn members_of(&self, kind: MetadataKind) -> impl Iterator<Item = &Member> {
		self.members.iter().filter(move |m| m.is_mapped_as(kind))
	}

	pub fn member(&self, name: &str) -> Option<&Member> {
		self.members.iter().find(|m| m.name == name)
	}
}

/// Builder for [`TypeDescriptor`].
pub struct TypeDescriptorBuilder {
	key: TypeKey,
	rpc: Option<RpcDeclaration>,
	members: Vec<Member>,
}

impl TypeDescriptorBuilder {
	pub fn rpc(mut self, declaration: RpcDeclaration) -> Self {
		self.rpc = Some(declaration);
		self
	}

	/// Adds a member. Members of another type are ignored with a warning.
	pub fn member(mut self, member: Member) -> Self {
		if member.owner != self.key {
			tracing::warn!(
				member = member.name,
				owner = member.owner.name(),
				target = self.key.name(),
				"ignoring member registered on a different type"
			);
			return self;
		}
		self.members.push(member);
		self
	}

	pub fn build(self) -> TypeDescriptor {
		TypeDescriptor {
			key: self.key,
			rpc: self.rpc,
			members: self.members,
		}
	}
}
