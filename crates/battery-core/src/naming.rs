//! Naming-convention translation between local member names and remote keys.
//!
//! A [`NameTransformer`] decodes a name into word fragments and encodes
//! fragments back into a name. A [`NameTranslator`] pairs the local and the
//! remote convention: `local_to_remote` decodes with the local one and encodes
//! with the remote one.
//!
//! # Examples
//!
//! ```
//! use battery_core::naming::{NameTranslator, NamingConvention};
//!
//! let translator = NameTranslator::new(NamingConvention::SnakeCase, NamingConvention::CamelCase);
//! assert_eq!(translator.local_to_remote("created_at"), "createdAt");
//! assert_eq!(translator.remote_to_local("createdAt"), "created_at");
//! ```

mod conventions;

pub use conventions::{CamelCase, Identity, PascalCase, SnakeCase, split_by_case};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A naming convention: name ↔ ordered word fragments.
pub trait NameTransformer: Send + Sync {
	fn decode(&self, name: &str) -> Vec<String>;
	fn encode(&self, parts: &[String]) -> String;
}

/// The built-in conventions, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
	Identity,
	CamelCase,
	PascalCase,
	SnakeCase,
}

impl NamingConvention {
	/// Returns the transformer implementing this convention.
	pub fn transformer(self) -> Arc<dyn NameTransformer> {
		match self {
			Self::Identity => Arc::new(Identity),
			Self::CamelCase => Arc::new(CamelCase),
			Self::PascalCase => Arc::new(PascalCase),
			Self::SnakeCase => Arc::new(SnakeCase),
		}
	}
}

/// Composition of a local and a remote naming convention.
///
/// If either side is unset, both directions are the identity.
#[derive(Clone, Default)]
pub struct NameTranslator {
	local: Option<Arc<dyn NameTransformer>>,
	remote: Option<Arc<dyn NameTransformer>>,
}

impl NameTranslator {
	/// Creates a translator from two built-in conventions.
	pub fn new(local: NamingConvention, remote: NamingConvention) -> Self {
		Self::from_transformers(Some(local.transformer()), Some(remote.transformer()))
	}

	/// Creates a translator from arbitrary transformers.
	pub fn from_transformers(
		local: Option<Arc<dyn NameTransformer>>,
		remote: Option<Arc<dyn NameTransformer>>,
	) -> Self {
		Self { local, remote }
	}

	/// A translator that leaves every name untouched.
	pub fn identity() -> Self {
		Self::default()
	}

	/// Replaces the local side when `local` is set.
	pub fn with_local(mut self, local: Option<NamingConvention>) -> Self {
		if let Some(convention) = local {
			self.local = Some(convention.transformer());
		}
		self
	}

	/// Replaces the remote side when `remote` is set.
	pub fn with_remote(mut self, remote: Option<NamingConvention>) -> Self {
		if let Some(convention) = remote {
			self.remote = Some(convention.transformer());
		}
		self
	}

	/// Returns true if translation is the identity.
	pub fn is_identity(&self) -> bool {
		self.local.is_none() || self.remote.is_none()
	}

	/// Translates a local member name into a remote key.
	pub fn local_to_remote(&self, name: &str) -> String {
		match (&self.local, &self.remote) {
			(Some(local), Some(remote)) => remote.encode(&local.decode(name)),
			_ => name.to_string(),
		}
	}

	/// Translates a remote key into a local member name.
	pub fn remote_to_local(&self, name: &str) -> String {
		match (&self.local, &self.remote) {
			(Some(local), Some(remote)) => local.encode(&remote.decode(name)),
			_ => name.to_string(),
		}
	}
}

impl fmt::Debug for NameTranslator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NameTranslator")
			.field("local", &self.local.is_some())
			.field("remote", &self.remote.is_some())
			.finish()
	}
}
