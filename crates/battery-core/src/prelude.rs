//! Convenient re-exports for declaring mapped types.
//!
//! ```
//! use battery_core::prelude::*;
//! ```

pub use crate::adapters::{
	Iso8601DateAdapter, Rfc1123DateAdapter, TimestampDateAdapter, TypeAdapter, TypeAdapterRegistry,
};
pub use crate::exception::{Error, ErrorKind, Result};
pub use crate::marshaller::{MarshalContext, UnsupportedPolicy};
pub use crate::metadata::{
	Member, MetadataCache, MetadataKind, RpcDeclaration, TypeDescriptor, get_mapped_members,
};
pub use crate::naming::{NameTranslator, NamingConvention};
pub use crate::types::{Mapped, MappedObject, MemberValue, ObjectType};
pub use crate::{mapped_enum, member, opaque_member};
