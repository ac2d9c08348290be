//! Wire codecs module.
//!
//! JSON, URL-encoded form and multipart codecs, plus the content-type keyed
//! registry the RPC layer resolves them from.
//!
//! # Examples
//!
//! ```rust
//! use battery::codecs::CodecRegistry;
//!
//! let codecs = CodecRegistry::with_defaults();
//! assert!(codecs.decoder("application/json; charset=utf-8").is_ok());
//! ```

pub use battery_codecs::*;
