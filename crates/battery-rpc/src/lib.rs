//! RPC layer for Battery.
//!
//! Turns annotated objects into HTTP requests and decodes responses back into
//! them:
//!
//! - [`RpcContext`](context::RpcContext) - base URI, naming conventions,
//!   adapters, codecs and hooks, optionally loaded from
//!   [`RpcSettings`](settings::RpcSettings)
//! - [`build_request`](builder::build_request) - URI templating, query
//!   strings, request bodies and headers
//! - [`decode_response`](response::decode_response) - content-type driven
//!   decoding with an optional [`ResponseValidator`](response::ResponseValidator)
//! - [`invoke`](transport::invoke) - the whole cycle over a
//!   [`Transport`](transport::Transport)
//! - [`ErrorHandlers`](handlers::ErrorHandlers) - callbacks notified of
//!   failures, keyed by [`ErrorKind`](battery_core::exception::ErrorKind)
//!
//! # Examples
//!
//! ```
//! use battery_core::prelude::*;
//! use battery_rpc::builder::build_request;
//! use battery_rpc::context::RpcContext;
//!
//! #[derive(Debug, Default)]
//! struct GetUser {
//!     user_id: i64,
//!     include_posts: bool,
//! }
//!
//! impl Mapped for GetUser {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>()
//!             .rpc(RpcDeclaration::get("/users/{1}"))
//!             .member(member!(GetUser, user_id).uri_path(1))
//!             .member(member!(GetUser, include_posts).query())
//!             .build()
//!     }
//! }
//!
//! let context = RpcContext::new()
//!     .with_base_uri("https://api.example.com")
//!     .with_local_naming(NamingConvention::SnakeCase)
//!     .with_remote_naming(NamingConvention::CamelCase);
//!
//! let request = build_request(&context, &GetUser { user_id: 7, include_posts: true }).unwrap();
//! assert_eq!(request.full_uri(), "https://api.example.com/users/7?includePosts=true");
//! ```

pub mod builder;
pub mod context;
pub mod handlers;
pub mod preprocess;
pub mod request;
pub mod response;
pub mod settings;
pub mod transport;

pub use builder::build_request;
pub use context::RpcContext;
pub use handlers::{ErrorHandler, ErrorHandlers};
pub use preprocess::RequestPreprocessor;
pub use request::RequestDescriptor;
pub use response::{ResponseValidator, decode_response};
pub use settings::{DateFormat, RpcSettings, SettingsError};
pub use transport::{RawResponse, StatusError, Transport, invoke};
