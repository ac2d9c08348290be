//! Marshalling engine module.
//!
//! This module provides access to the type registration API, coercion,
//! metadata cache, naming conventions, type adapters and the marshaller.
//!
//! # Examples
//!
//! ```rust
//! use battery::core::naming::{NameTranslator, NamingConvention};
//!
//! let translator = NameTranslator::new(NamingConvention::SnakeCase, NamingConvention::PascalCase);
//! assert_eq!(translator.local_to_remote("user_id"), "UserId");
//! ```

pub use battery_core::*;
