//! Bidirectional object marshalling for the Battery RPC client.
//!
//! This crate turns structured wire documents into registered Rust objects and
//! back, independently of the concrete wire format:
//!
//! - **Metadata**: types describe their mapped members once through
//!   [`Mapped::describe`]; results are memoized in a [`MetadataCache`]
//! - **Coercion**: loosely typed wire scalars are converted into the declared
//!   member kinds
//! - **Naming**: member names are translated between local and remote
//!   conventions (`snake_case`, `camelCase`, `PascalCase`)
//! - **Type adapters**: per-type encode/decode pairs registered in a
//!   [`TypeAdapterRegistry`]
//! - **Codec contract**: [`DocumentCodec`] and [`DocumentEncoder`] let any
//!   format plug into the [`Marshaller`]
//!
//! # Quick Start
//!
//! ```
//! use battery_core::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     user_id: i64,
//!     display_name: Option<String>,
//! }
//!
//! impl Mapped for User {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>()
//!             .member(member!(User, user_id).response().required())
//!             .member(member!(User, display_name).response().request_body())
//!             .build()
//!     }
//! }
//!
//! let members = get_mapped_members(&ObjectType::of::<User>(), MetadataKind::Response, None);
//! assert_eq!(members.len(), 2);
//!
//! let translator = NameTranslator::new(NamingConvention::SnakeCase, NamingConvention::CamelCase);
//! assert_eq!(translator.local_to_remote("display_name"), "displayName");
//! ```
//!
//! Concrete formats (JSON, URL-encoded forms, multipart) live in
//! `battery-codecs`; request building and response decoding in `battery-rpc`.

pub mod adapters;
pub mod codec;
pub mod coercion;
pub mod exception;
pub mod marshaller;
pub mod metadata;
pub mod naming;
pub mod prelude;
pub mod types;

// Re-export commonly used types at crate root
pub use adapters::{TypeAdapter, TypeAdapterRegistry};
pub use codec::{DocumentCodec, DocumentEncoder, RequestSerializer, ResponseDecoder, SerializedBody};
pub use exception::{BoxError, Error, ErrorKind, Result};
pub use marshaller::{MarshalContext, Marshaller, UnsupportedPolicy};
pub use metadata::{
	Member, MemberMetadata, MetadataCache, MetadataKind, RpcDeclaration, TypeDescriptor,
	get_mapped_members, get_member_metadata,
};
pub use naming::{NameTranslator, NamingConvention};
pub use types::{Mapped, MappedObject, MemberType, MemberValue, ObjectType, TypeKey, Value, ValueRef};
