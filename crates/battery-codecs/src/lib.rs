//! Wire codecs for Battery.
//!
//! - [`JsonCodec`](json::JsonCodec) - `application/json` documents, both
//!   directions
//! - [`UrlEncodedFormEncoder`](form::UrlEncodedFormEncoder) - flat
//!   `application/x-www-form-urlencoded` request bodies
//! - [`MultipartFormDataEncoder`](multipart::MultipartFormDataEncoder) -
//!   `multipart/form-data` bodies with [`Attachment`](multipart::Attachment)
//!   file parts
//! - [`CodecRegistry`](registry::CodecRegistry) - content-type keyed lookup,
//!   with a process-wide instance holding the codecs above
//!
//! # Examples
//!
//! ```
//! use battery_codecs::json::JsonCodec;
//! use battery_core::prelude::*;
//! use battery_core::codec::ResponseDecoder;
//!
//! #[derive(Debug, Default)]
//! struct Greeting {
//!     message_text: String,
//! }
//!
//! impl Mapped for Greeting {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>()
//!             .member(member!(Greeting, message_text).response())
//!             .build()
//!     }
//! }
//!
//! let translator = NameTranslator::new(NamingConvention::SnakeCase, NamingConvention::CamelCase);
//! let adapters = TypeAdapterRegistry::new();
//! let context = MarshalContext::new(&translator, &adapters);
//!
//! let mut greeting = Greeting::default();
//! JsonCodec::new()
//!     .decode_into(br#"{"messageText":"hi"}"#, &mut greeting, &context)
//!     .unwrap();
//! assert_eq!(greeting.message_text, "hi");
//! ```

pub mod form;
pub mod json;
pub mod mime;
pub mod multipart;
pub mod registry;

pub use form::UrlEncodedFormEncoder;
pub use json::JsonCodec;
pub use mime::{GuessMimeTypeResolver, MimeTypeResolver};
pub use multipart::{Attachment, MultipartFormDataEncoder};
pub use registry::CodecRegistry;
