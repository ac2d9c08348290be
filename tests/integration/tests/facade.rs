//! The `battery` facade: prelude declarations driving a full invocation.

use std::sync::Arc;

use battery::prelude::*;
use battery_integration_tests::transport::RecordingTransport;
use bytes::Bytes;
use http::{Method, StatusCode};
use rstest::rstest;

#[derive(Debug, Default)]
struct RenameTag {
	tag_id: i64,
	tag_name: String,
	usage_count: i32,
}

impl Mapped for RenameTag {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.rpc(
				RpcDeclaration::patch("/tags/{1}")
					.with_serializer("application/json")
					.with_expected_content_type("application/json"),
			)
			.member(member!(RenameTag, tag_id).uri_path(1).response())
			.member(member!(RenameTag, tag_name).request_body().response())
			.member(member!(RenameTag, usage_count).response())
			.build()
	}
}

#[rstest]
fn test_prelude_round_trip() {
	let context = RpcContext::new()
		.with_base_uri("https://tags.example.com")
		.with_cache(Arc::new(MetadataCache::new()))
		.with_local_naming(NamingConvention::SnakeCase)
		.with_remote_naming(NamingConvention::CamelCase);
	let transport = RecordingTransport::new().respond(RawResponse::new(
		StatusCode::OK,
		Some("application/json"),
		Bytes::from_static(br#"{"tagId":5,"tagName":"rust","usageCount":"12"}"#),
	));
	let mut tag = RenameTag {
		tag_id: 5,
		tag_name: "Rust".to_string(),
		..Default::default()
	};

	invoke(&context, &transport, &mut tag).unwrap();

	let requests = transport.requests();
	assert_eq!(requests[0].method(), Method::PATCH);
	assert_eq!(requests[0].full_uri(), "https://tags.example.com/tags/5");
	assert_eq!(requests[0].body().unwrap().as_ref(), br#"{"tagName":"Rust"}"#);
	assert_eq!(tag.tag_name, "rust");
	assert_eq!(tag.usage_count, 12);
}

#[rstest]
fn test_root_error_reexport() {
	let error: battery::Error = battery::Error::MissingField("tag_id".to_string());

	assert!(error.is_missing_field());
}
