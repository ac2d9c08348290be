//! Runtime type model for mapped objects.
//!
//! Mapped types register themselves explicitly instead of being discovered
//! through reflection. Every member slot has a [`MemberType`] the marshaller
//! dispatches on, and values cross the type-erased boundary as either an owned
//! [`Value`] (deserialization) or a borrowed [`ValueRef`] (serialization).
//!
//! # Examples
//!
//! ```
//! use battery_core::types::{MemberType, MemberValue, ScalarKind};
//!
//! assert!(matches!(<i64 as MemberValue>::member_type(), MemberType::Scalar(ScalarKind::Long)));
//! assert!(<Option<String> as MemberValue>::nullable());
//! ```

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::metadata::TypeDescriptor;

/// Namespaces whose types are never instantiated as nested objects.
const EXCLUDED_NAMESPACES: &[&str] = &["std::", "core::", "alloc::"];

/// Identity of a Rust type, usable as a map key.
#[derive(Clone, Copy)]
pub struct TypeKey {
	id: TypeId,
	name: &'static str,
}

impl TypeKey {
	/// Returns the key of `T`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	/// Returns the underlying [`TypeId`].
	pub fn id(&self) -> TypeId {
		self.id
	}

	/// Returns the fully qualified type name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Returns the type name without its module path or generic arguments.
	pub fn short_name(&self) -> &'static str {
		let base = self.name.split('<').next().unwrap_or(self.name);
		base.rsplit("::").next().unwrap_or(base)
	}

	/// Returns true if the type belongs to a built-in platform namespace.
	pub fn is_platform_type(&self) -> bool {
		EXCLUDED_NAMESPACES
			.iter()
			.any(|namespace| self.name.starts_with(namespace))
	}
}

impl PartialEq for TypeKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeKey({})", self.name)
	}
}

/// Built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
	String,
	Integer,
	Long,
	Float,
	Double,
	Boolean,
}

impl ScalarKind {
	/// Returns the lowercase kind name used in error messages.
	pub fn name(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Integer => "integer",
			Self::Long => "long",
			Self::Float => "float",
			Self::Double => "double",
			Self::Boolean => "boolean",
		}
	}

	/// Numeric and boolean kinds are primitives; strings are not.
	pub fn is_primitive(self) -> bool {
		!matches!(self, Self::String)
	}

	/// Returns the key of the Rust type backing this kind.
	pub fn type_key(self) -> TypeKey {
		match self {
			Self::String => TypeKey::of::<String>(),
			Self::Integer => TypeKey::of::<i32>(),
			Self::Long => TypeKey::of::<i64>(),
			Self::Float => TypeKey::of::<f32>(),
			Self::Double => TypeKey::of::<f64>(),
			Self::Boolean => TypeKey::of::<bool>(),
		}
	}
}

impl fmt::Display for ScalarKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// An enum type and its declared constant names.
#[derive(Debug, Clone, Copy)]
pub struct EnumType {
	key: TypeKey,
	variants: &'static [&'static str],
}

impl EnumType {
	pub fn new(key: TypeKey, variants: &'static [&'static str]) -> Self {
		Self { key, variants }
	}

	pub fn key(&self) -> TypeKey {
		self.key
	}

	pub fn variants(&self) -> &'static [&'static str] {
		self.variants
	}

	/// Finds the declared constant matching `name`, ignoring ASCII case.
	pub fn find(&self, name: &str) -> Option<&'static str> {
		self.variants
			.iter()
			.copied()
			.find(|variant| variant.eq_ignore_ascii_case(name))
	}
}

/// A mapped composite type: how to create an instance and how to describe it.
#[derive(Clone, Copy)]
pub struct ObjectType {
	key: TypeKey,
	instantiate: fn() -> Box<dyn MappedObject>,
	describe: fn() -> TypeDescriptor,
}

fn instantiate<T: Mapped>() -> Box<dyn MappedObject> {
	Box::new(T::default())
}

impl ObjectType {
	/// Returns the object type of `T`.
	pub fn of<T: Mapped>() -> Self {
		Self {
			key: TypeKey::of::<T>(),
			instantiate: instantiate::<T>,
			describe: T::describe,
		}
	}

	pub fn key(&self) -> TypeKey {
		self.key
	}

	/// Creates a default instance of the type.
	pub fn instantiate(&self) -> Box<dyn MappedObject> {
		(self.instantiate)()
	}

	/// Runs the type's registration function.
	///
	/// Prefer [`crate::metadata::MetadataCache::descriptor`], which memoizes
	/// the result.
	pub fn describe(&self) -> TypeDescriptor {
		(self.describe)()
	}
}

impl fmt::Debug for ObjectType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ObjectType").field(&self.key.name).finish()
	}
}

/// Declared type of a member slot.
#[derive(Debug, Clone)]
pub enum MemberType {
	/// A built-in scalar.
	Scalar(ScalarKind),
	/// A list with the given element type.
	List(Box<MemberType>),
	/// A string-keyed map with the given value type.
	Map(Box<MemberType>),
	/// An enum matched by constant name.
	Enum(EnumType),
	/// A nested mapped object.
	Object(ObjectType),
	/// A type only a registered type adapter (or encoder hook) understands.
	Opaque(TypeKey),
}

impl MemberType {
	/// Key under which a type adapter for this type is registered.
	///
	/// Containers have no adapter key; their elements are looked up instead.
	pub fn adapter_key(&self) -> Option<TypeKey> {
		match self {
			Self::Scalar(kind) => Some(kind.type_key()),
			Self::Enum(info) => Some(info.key()),
			Self::Object(object) => Some(object.key()),
			Self::Opaque(key) => Some(*key),
			Self::List(_) | Self::Map(_) => None,
		}
	}

	pub fn scalar_kind(&self) -> Option<ScalarKind> {
		match self {
			Self::Scalar(kind) => Some(*kind),
			_ => None,
		}
	}

	pub fn is_string(&self) -> bool {
		matches!(self, Self::Scalar(ScalarKind::String))
	}

	pub fn is_integer(&self) -> bool {
		matches!(self, Self::Scalar(ScalarKind::Integer))
	}

	pub fn is_long(&self) -> bool {
		matches!(self, Self::Scalar(ScalarKind::Long))
	}

	pub fn is_float(&self) -> bool {
		matches!(self, Self::Scalar(ScalarKind::Float))
	}

	pub fn is_double(&self) -> bool {
		matches!(self, Self::Scalar(ScalarKind::Double))
	}

	pub fn is_boolean(&self) -> bool {
		matches!(self, Self::Scalar(ScalarKind::Boolean))
	}

	pub fn is_list(&self) -> bool {
		matches!(self, Self::List(_))
	}

	pub fn is_map(&self) -> bool {
		matches!(self, Self::Map(_))
	}

	pub fn is_enum(&self) -> bool {
		matches!(self, Self::Enum(_))
	}

	pub fn is_object(&self) -> bool {
		matches!(self, Self::Object(_))
	}

	/// String or a numeric/boolean primitive.
	pub fn is_built_in(&self) -> bool {
		matches!(self, Self::Scalar(_))
	}

	/// Numeric or boolean primitive.
	pub fn is_primitive(&self) -> bool {
		matches!(self, Self::Scalar(kind) if kind.is_primitive())
	}

	/// Element type of a list or value type of a map.
	pub fn element_type(&self) -> Option<&MemberType> {
		match self {
			Self::List(element) | Self::Map(element) => Some(element),
			_ => None,
		}
	}

	/// Human-readable type name for logs and error messages.
	pub fn describe(&self) -> String {
		match self {
			Self::Scalar(kind) => kind.name().to_string(),
			Self::List(element) => format!("list<{}>", element.describe()),
			Self::Map(element) => format!("map<{}>", element.describe()),
			Self::Enum(info) => info.key().short_name().to_string(),
			Self::Object(object) => object.key().short_name().to_string(),
			Self::Opaque(key) => key.short_name().to_string(),
		}
	}
}

/// An owned value written into a member slot.
pub enum Value {
	Null,
	String(String),
	Integer(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	Boolean(bool),
	List(Vec<Value>),
	Map(Vec<(String, Value)>),
	Enum(&'static str),
	Object(Box<dyn MappedObject>),
	Opaque(Box<dyn Any + Send + Sync>),
}

impl Value {
	/// Short name of the variant, for error messages.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::String(_) => "string",
			Self::Integer(_) => "integer",
			Self::Long(_) => "long",
			Self::Float(_) => "float",
			Self::Double(_) => "double",
			Self::Boolean(_) => "boolean",
			Self::List(_) => "list",
			Self::Map(_) => "map",
			Self::Enum(_) => "enum",
			Self::Object(_) => "object",
			Self::Opaque(_) => "opaque",
		}
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("Null"),
			Self::String(v) => f.debug_tuple("String").field(v).finish(),
			Self::Integer(v) => f.debug_tuple("Integer").field(v).finish(),
			Self::Long(v) => f.debug_tuple("Long").field(v).finish(),
			Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
			Self::Double(v) => f.debug_tuple("Double").field(v).finish(),
			Self::Boolean(v) => f.debug_tuple("Boolean").field(v).finish(),
			Self::List(v) => f.debug_tuple("List").field(v).finish(),
			Self::Map(v) => f.debug_tuple("Map").field(v).finish(),
			Self::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
			Self::Object(v) => f.debug_tuple("Object").field(v).finish(),
			Self::Opaque(_) => f.write_str("Opaque(..)"),
		}
	}
}

/// A borrowed view of a member's current value.
#[derive(Clone)]
pub enum ValueRef<'a> {
	Null,
	String(&'a str),
	Integer(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	Boolean(bool),
	List(Vec<ValueRef<'a>>),
	Map(Vec<(&'a str, ValueRef<'a>)>),
	Enum(&'static str),
	Object(&'a dyn MappedObject),
	Opaque(&'a (dyn Any + Send + Sync)),
}

impl ValueRef<'_> {
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Copies a scalar or enum view into an owned [`Value`].
	pub fn to_scalar_value(&self) -> Option<Value> {
		match self {
			Self::String(v) => Some(Value::String((*v).to_string())),
			Self::Integer(v) => Some(Value::Integer(*v)),
			Self::Long(v) => Some(Value::Long(*v)),
			Self::Float(v) => Some(Value::Float(*v)),
			Self::Double(v) => Some(Value::Double(*v)),
			Self::Boolean(v) => Some(Value::Boolean(*v)),
			Self::Enum(v) => Some(Value::Enum(v)),
			_ => None,
		}
	}

	/// Renders a scalar or enum view as text.
	pub fn to_text(&self) -> Option<String> {
		match self {
			Self::String(v) => Some((*v).to_string()),
			Self::Integer(v) => Some(v.to_string()),
			Self::Long(v) => Some(v.to_string()),
			Self::Float(v) => Some(v.to_string()),
			Self::Double(v) => Some(v.to_string()),
			Self::Boolean(v) => Some(v.to_string()),
			Self::Enum(v) => Some((*v).to_string()),
			_ => None,
		}
	}
}

impl fmt::Debug for ValueRef<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("Null"),
			Self::List(v) => f.debug_tuple("List").field(v).finish(),
			Self::Map(v) => f.debug_tuple("Map").field(v).finish(),
			Self::Object(v) => f.debug_tuple("Object").field(v).finish(),
			Self::Opaque(_) => f.write_str("Opaque(..)"),
			scalar => match scalar.to_text() {
				Some(text) => write!(f, "Scalar({text})"),
				None => f.write_str("?"),
			},
		}
	}
}

/// A Rust type that can occupy a member slot.
///
/// Implemented for the built-in scalars, `Option`, `Vec`, string-keyed maps,
/// `chrono::DateTime<Utc>` and every [`Mapped`] type. Enums use
/// [`mapped_enum!`](crate::mapped_enum) and other opaque types
/// [`opaque_member!`](crate::opaque_member).
pub trait MemberValue: Default + Send + Sync + 'static {
	/// Declared type used for dispatch.
	fn member_type() -> MemberType;

	/// Whether the slot can hold null.
	fn nullable() -> bool {
		false
	}

	/// Borrows the current value.
	fn view(&self) -> ValueRef<'_>;

	/// Converts into an owned value.
	fn into_value(self) -> Value;

	/// Converts back from an owned value; `None` if the variant does not fit.
	fn from_value(value: Value) -> Option<Self>;
}

macro_rules! scalar_member {
	($ty:ty, $kind:ident) => {
		impl MemberValue for $ty {
			fn member_type() -> MemberType {
				MemberType::Scalar(ScalarKind::$kind)
			}

			fn view(&self) -> ValueRef<'_> {
				ValueRef::$kind(*self)
			}

			fn into_value(self) -> Value {
				Value::$kind(self)
			}

			fn from_value(value: Value) -> Option<Self> {
				match value {
					Value::$kind(v) => Some(v),
					_ => None,
				}
			}
		}
	};
}

scalar_member!(i32, Integer);
scalar_member!(i64, Long);
scalar_member!(f32, Float);
scalar_member!(f64, Double);
scalar_member!(bool, Boolean);

impl MemberValue for String {
	fn member_type() -> MemberType {
		MemberType::Scalar(ScalarKind::String)
	}

	fn view(&self) -> ValueRef<'_> {
		ValueRef::String(self)
	}

	fn into_value(self) -> Value {
		Value::String(self)
	}

	fn from_value(value: Value) -> Option<Self> {
		match value {
			Value::String(v) => Some(v),
			_ => None,
		}
	}
}

impl<T: MemberValue> MemberValue for Option<T> {
	fn member_type() -> MemberType {
		T::member_type()
	}

	fn nullable() -> bool {
		true
	}

	fn view(&self) -> ValueRef<'_> {
		match self {
			Some(inner) => inner.view(),
			None => ValueRef::Null,
		}
	}

	fn into_value(self) -> Value {
		match self {
			Some(inner) => inner.into_value(),
			None => Value::Null,
		}
	}

	fn from_value(value: Value) -> Option<Self> {
		match value {
			Value::Null => Some(None),
			other => T::from_value(other).map(Some),
		}
	}
}

impl<T: MemberValue> MemberValue for Vec<T> {
	fn member_type() -> MemberType {
		MemberType::List(Box::new(T::member_type()))
	}

	fn view(&self) -> ValueRef<'_> {
		ValueRef::List(self.iter().map(MemberValue::view).collect())
	}

	fn into_value(self) -> Value {
		Value::List(self.into_iter().map(MemberValue::into_value).collect())
	}

	fn from_value(value: Value) -> Option<Self> {
		match value {
			Value::List(items) => items.into_iter().map(T::from_value).collect(),
			_ => None,
		}
	}
}

impl<T: MemberValue> MemberValue for HashMap<String, T> {
	fn member_type() -> MemberType {
		MemberType::Map(Box::new(T::member_type()))
	}

	fn view(&self) -> ValueRef<'_> {
		ValueRef::Map(self.iter().map(|(k, v)| (k.as_str(), v.view())).collect())
	}

	fn into_value(self) -> Value {
		Value::Map(self.into_iter().map(|(k, v)| (k, v.into_value())).collect())
	}

	fn from_value(value: Value) -> Option<Self> {
		match value {
			Value::Map(entries) => entries
				.into_iter()
				.map(|(k, v)| T::from_value(v).map(|v| (k, v)))
				.collect(),
			_ => None,
		}
	}
}

impl<T: MemberValue> MemberValue for BTreeMap<String, T> {
	fn member_type() -> MemberType {
		MemberType::Map(Box::new(T::member_type()))
	}

	fn view(&self) -> ValueRef<'_> {
		ValueRef::Map(self.iter().map(|(k, v)| (k.as_str(), v.view())).collect())
	}

	fn into_value(self) -> Value {
		Value::Map(self.into_iter().map(|(k, v)| (k, v.into_value())).collect())
	}

	fn from_value(value: Value) -> Option<Self> {
		match value {
			Value::Map(entries) => entries
				.into_iter()
				.map(|(k, v)| T::from_value(v).map(|v| (k, v)))
				.collect(),
			_ => None,
		}
	}
}

/// Implements [`MemberValue`] for a type that only a type adapter or an
/// encoder hook can translate.
///
/// # Examples
///
/// ```
/// use battery_core::opaque_member;
/// use battery_core::types::{MemberType, MemberValue};
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// pub struct Money(i64);
///
/// opaque_member!(Money);
///
/// assert!(matches!(Money::member_type(), MemberType::Opaque(_)));
/// ```
#[macro_export]
macro_rules! opaque_member {
	($ty:ty) => {
		impl $crate::types::MemberValue for $ty {
			fn member_type() -> $crate::types::MemberType {
				$crate::types::MemberType::Opaque($crate::types::TypeKey::of::<$ty>())
			}

			fn view(&self) -> $crate::types::ValueRef<'_> {
				$crate::types::ValueRef::Opaque(self)
			}

			fn into_value(self) -> $crate::types::Value {
				$crate::types::Value::Opaque(::std::boxed::Box::new(self))
			}

			fn from_value(value: $crate::types::Value) -> ::std::option::Option<Self> {
				match value {
					$crate::types::Value::Opaque(boxed) => boxed.downcast::<$ty>().ok().map(|v| *v),
					_ => None,
				}
			}
		}
	};
}

opaque_member!(DateTime<Utc>);

/// Implements [`MemberValue`] for a fieldless enum, matched by variant name.
///
/// # Examples
///
/// ```
/// use battery_core::mapped_enum;
/// use battery_core::types::{MemberType, MemberValue};
///
/// #[derive(Debug, Default, Clone, Copy, PartialEq)]
/// pub enum Status {
///     #[default]
///     Active,
///     Suspended,
/// }
///
/// mapped_enum!(Status { Active, Suspended });
///
/// match Status::member_type() {
///     MemberType::Enum(info) => assert_eq!(info.find("SUSPENDED"), Some("Suspended")),
///     _ => unreachable!(),
/// }
/// ```
#[macro_export]
macro_rules! mapped_enum {
	($ty:ident { $($variant:ident),+ $(,)? }) => {
		impl $crate::types::MemberValue for $ty {
			fn member_type() -> $crate::types::MemberType {
				$crate::types::MemberType::Enum($crate::types::EnumType::new(
					$crate::types::TypeKey::of::<$ty>(),
					&[$(stringify!($variant)),+],
				))
			}

			fn view(&self) -> $crate::types::ValueRef<'_> {
				$crate::types::ValueRef::Enum(match self {
					$($ty::$variant => stringify!($variant),)+
				})
			}

			fn into_value(self) -> $crate::types::Value {
				$crate::types::Value::Enum(match self {
					$($ty::$variant => stringify!($variant),)+
				})
			}

			fn from_value(value: $crate::types::Value) -> ::std::option::Option<Self> {
				match value {
					$($crate::types::Value::Enum(name) if name == stringify!($variant) => {
						Some($ty::$variant)
					})+
					_ => None,
				}
			}
		}
	};
}

/// A type registered for marshalling.
///
/// `describe` lists the mapped members and type-level declarations. It is
/// called through the metadata cache, so it normally runs once per process.
pub trait Mapped: Default + Send + Sync + 'static {
	fn describe() -> TypeDescriptor;
}

/// Object-safe view of a [`Mapped`] value.
pub trait MappedObject: Any + Send + Sync {
	fn object_type(&self) -> ObjectType;
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
	fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T: Mapped> MappedObject for T {
	fn object_type(&self) -> ObjectType {
		ObjectType::of::<T>()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
		self
	}
}

impl dyn MappedObject {
	pub fn downcast_ref<T: Mapped>(&self) -> Option<&T> {
		self.as_any().downcast_ref::<T>()
	}

	pub fn downcast_mut<T: Mapped>(&mut self) -> Option<&mut T> {
		self.as_any_mut().downcast_mut::<T>()
	}
}

impl fmt::Debug for dyn MappedObject {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.object_type().key().short_name())
	}
}

impl<T: Mapped> MemberValue for T {
	fn member_type() -> MemberType {
		MemberType::Object(ObjectType::of::<T>())
	}

	fn view(&self) -> ValueRef<'_> {
		ValueRef::Object(self)
	}

	fn into_value(self) -> Value {
		Value::Object(Box::new(self))
	}

	fn from_value(value: Value) -> Option<Self> {
		match value {
			Value::Object(boxed) => boxed.into_any().downcast::<T>().ok().map(|v| *v),
			_ => None,
		}
	}
}
