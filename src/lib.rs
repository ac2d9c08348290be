//! # Battery
//!
//! Bidirectional object-to-wire marshalling for HTTP RPC clients.
//!
//! Battery turns annotated Rust values into HTTP requests (URI, query string,
//! body) and decodes response payloads back into them. Types describe their
//! wire mapping once, through an explicit [`Mapped`](core::types::Mapped)
//! registration, and the marshaller drives every traversal from that
//! description.
//!
//! ## Feature Flags
//!
//! All enabled by default.
//!
//! - `core` - marshalling engine: coercion, metadata cache, naming
//!   conventions, type adapters, the codec contract and the marshaller
//! - `codecs` - JSON, URL-encoded form and multipart codecs with a
//!   content-type registry
//! - `rpc` - request builder, response decoding, settings and the
//!   transport seam
//!
//! ## Quick Example
//!
//! ```
//! use battery::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct CreatePost {
//!     author_id: i64,
//!     post_title: String,
//!     draft: bool,
//! }
//!
//! impl Mapped for CreatePost {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>()
//!             .rpc(RpcDeclaration::post("/authors/{1}/posts").with_serializer("application/json"))
//!             .member(member!(CreatePost, author_id).uri_path(1))
//!             .member(member!(CreatePost, post_title).request_body())
//!             .member(member!(CreatePost, draft).query())
//!             .build()
//!     }
//! }
//!
//! let context = RpcContext::new()
//!     .with_base_uri("https://blog.example.com/api")
//!     .with_local_naming(NamingConvention::SnakeCase)
//!     .with_remote_naming(NamingConvention::CamelCase);
//!
//! let post = CreatePost { author_id: 3, post_title: "Hello".to_string(), draft: true };
//! let request = build_request(&context, &post).unwrap();
//!
//! assert_eq!(request.full_uri(), "https://blog.example.com/api/authors/3/posts?draft=true");
//! assert_eq!(request.body().unwrap().as_ref(), br#"{"postTitle":"Hello"}"#);
//! ```

#[cfg(feature = "codecs")]
pub mod codecs;
#[cfg(feature = "core")]
pub mod core;
#[cfg(feature = "rpc")]
pub mod rpc;

// Re-export the most used types at the crate root
#[cfg(feature = "core")]
pub use battery_core::{
	exception::{Error, Result},
	marshaller::{MarshalContext, UnsupportedPolicy},
	metadata::{MetadataCache, RpcDeclaration, TypeDescriptor},
	naming::{NameTranslator, NamingConvention},
	types::{Mapped, MappedObject},
};

#[cfg(feature = "codecs")]
pub use battery_codecs::{Attachment, CodecRegistry, JsonCodec};

#[cfg(feature = "rpc")]
pub use battery_rpc::{
	RawResponse, RequestDescriptor, RpcContext, RpcSettings, Transport, build_request,
	decode_response, invoke,
};

pub mod prelude {
	#[cfg(feature = "core")]
	pub use battery_core::prelude::*;

	#[cfg(feature = "codecs")]
	pub use battery_codecs::{
		Attachment, CodecRegistry, JsonCodec, MultipartFormDataEncoder, UrlEncodedFormEncoder,
	};

	#[cfg(feature = "rpc")]
	pub use battery_rpc::{
		RawResponse, RequestDescriptor, RequestPreprocessor, ResponseValidator, RpcContext,
		RpcSettings, Transport, build_request, decode_response, invoke,
	};
}
