//! Integration test utilities for Battery
//!
//! Shared mapped types and a recording transport used across the integration
//! tests. Every helper builds contexts over private metadata caches and
//! adapter registries so tests never observe each other's registrations.

pub mod models;
pub mod transport;

use std::sync::Arc;

use battery_core::adapters::{Iso8601DateAdapter, TypeAdapterRegistry};
use battery_core::metadata::MetadataCache;
use battery_core::naming::NamingConvention;
use battery_rpc::context::RpcContext;

/// Base URI used by [`test_context`].
pub const BASE_URI: &str = "https://api.example.com/v2";

/// Adapter registry holding the ISO-8601 date adapter.
pub fn iso_adapters() -> Arc<TypeAdapterRegistry> {
	let adapters = TypeAdapterRegistry::new();
	adapters.register(Iso8601DateAdapter);
	Arc::new(adapters)
}

/// snake_case locally, camelCase on the wire, JSON by default.
pub fn test_context() -> RpcContext {
	RpcContext::new()
		.with_base_uri(BASE_URI)
		.with_default_serializer("application/json")
		.with_local_naming(NamingConvention::SnakeCase)
		.with_remote_naming(NamingConvention::CamelCase)
		.with_adapters(iso_adapters())
		.with_cache(Arc::new(MetadataCache::new()))
}
