//! File and environment based configuration of an [`RpcContext`](crate::context::RpcContext).
//!
//! Settings load from a `.toml` or `.json` file, or from `BATTERY_*`
//! environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `BATTERY_BASE_URI` | `base_uri` |
//! | `BATTERY_DEFAULT_SERIALIZER` | `default_serializer` |
//! | `BATTERY_LOCAL_NAMING` | `local_naming` (`identity`, `camel_case`, `pascal_case`, `snake_case`) |
//! | `BATTERY_REMOTE_NAMING` | `remote_naming` |
//! | `BATTERY_UNSUPPORTED_POLICY` | `unsupported_policy` (`skip`, `fail`) |
//! | `BATTERY_DATE_FORMAT` | `date_format` (`iso8601`, `rfc1123`, `timestamp`, `timestamp_millis`) |

use std::fs;
use std::path::{Path, PathBuf};

use battery_core::adapters::{
	Iso8601DateAdapter, Rfc1123DateAdapter, TimestampDateAdapter, TypeAdapterRegistry,
};
use battery_core::marshaller::UnsupportedPolicy;
use battery_core::naming::NamingConvention;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "BATTERY_";

/// Error type for settings loading.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Unsupported settings file: {}", .0.display())]
	UnsupportedFormat(PathBuf),

	#[error("Invalid value for {key}: {value}")]
	InvalidValue { key: String, value: String },

	#[error("Invalid base URI '{0}': only http and https are supported")]
	InvalidBaseUri(String),
}

/// Date representation registered as the `DateTime<Utc>` type adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
	Iso8601,
	Rfc1123,
	Timestamp,
	TimestampMillis,
}

impl DateFormat {
	/// Registers the matching date adapter.
	pub fn register(self, registry: &TypeAdapterRegistry) {
		match self {
			Self::Iso8601 => registry.register(Iso8601DateAdapter),
			Self::Rfc1123 => registry.register(Rfc1123DateAdapter),
			Self::Timestamp => registry.register(TimestampDateAdapter::seconds()),
			Self::TimestampMillis => registry.register(TimestampDateAdapter::milliseconds()),
		}
	}
}

/// Context settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcSettings {
	/// Prefix for relative URI templates.
	pub base_uri: Option<String>,
	/// Content type of the serializer used when a type declares none.
	pub default_serializer: Option<String>,
	pub local_naming: Option<NamingConvention>,
	pub remote_naming: Option<NamingConvention>,
	pub unsupported_policy: UnsupportedPolicy,
	pub date_format: Option<DateFormat>,
}

impl RpcSettings {
	/// Loads settings from a `.toml` or `.json` file.
	///
	/// # Errors
	///
	/// Fails on unreadable or malformed files, unknown extensions and invalid
	/// base URIs.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let content = fs::read_to_string(path)?;
		let settings: Self = match path.extension().and_then(|ext| ext.to_str()) {
			Some("toml") => toml::from_str(&content)?,
			Some("json") => serde_json::from_str(&content)?,
			_ => return Err(SettingsError::UnsupportedFormat(path.to_path_buf())),
		};
		tracing::debug!(path = %path.display(), "loaded rpc settings");
		settings.validated()
	}

	/// Loads settings from `BATTERY_*` environment variables.
	///
	/// Unset variables keep their defaults.
	pub fn from_env() -> Result<Self, SettingsError> {
		let settings = Self {
			base_uri: env_string("BASE_URI"),
			default_serializer: env_string("DEFAULT_SERIALIZER"),
			local_naming: env_value("LOCAL_NAMING")?,
			remote_naming: env_value("REMOTE_NAMING")?,
			unsupported_policy: env_value("UNSUPPORTED_POLICY")?.unwrap_or_default(),
			date_format: env_value("DATE_FORMAT")?,
		};
		settings.validated()
	}

	/// Checks the base URI scheme and strips one trailing `/`.
	///
	/// # Examples
	///
	/// ```
	/// use battery_rpc::settings::RpcSettings;
	///
	/// let settings = RpcSettings {
	///     base_uri: Some("https://api.example.com/v1/".to_string()),
	///     ..Default::default()
	/// };
	/// let settings = settings.validated().unwrap();
	/// assert_eq!(settings.base_uri.as_deref(), Some("https://api.example.com/v1"));
	/// ```
	pub fn validated(mut self) -> Result<Self, SettingsError> {
		if let Some(uri) = self.base_uri.take() {
			if !has_http_scheme(&uri) {
				return Err(SettingsError::InvalidBaseUri(uri));
			}
			let trimmed = uri.strip_suffix('/').unwrap_or(&uri).to_string();
			self.base_uri = Some(trimmed);
		}
		Ok(self)
	}
}

/// Returns true for `http://` and `https://` URIs.
pub(crate) fn has_http_scheme(uri: &str) -> bool {
	uri.starts_with("http://") || uri.starts_with("https://")
}

fn env_string(key: &str) -> Option<String> {
	std::env::var(format!("{ENV_PREFIX}{key}"))
		.ok()
		.filter(|value| !value.trim().is_empty())
}

fn env_value<T: DeserializeOwned>(key: &str) -> Result<Option<T>, SettingsError> {
	let Some(raw) = env_string(key) else {
		return Ok(None);
	};
	let normalized = raw.trim().to_ascii_lowercase();
	serde_json::from_value(serde_json::Value::String(normalized))
		.map(Some)
		.map_err(|_| SettingsError::InvalidValue {
			key: format!("{ENV_PREFIX}{key}"),
			value: raw,
		})
}
