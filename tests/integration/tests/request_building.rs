//! Request building: URI templates, path ordinals, query strings and
//! content-type resolution.

use battery_codecs::registry::CodecRegistry;
use battery_core::exception::Error;
use battery_integration_tests::models::{Account, BrokenPath, CommentPath, Role, Search};
use battery_integration_tests::{BASE_URI, test_context};
use battery_rpc::builder::build_request;
use battery_rpc::context::RpcContext;
use chrono::{TimeZone, Utc};
use http::Method;
use http::header::{ACCEPT, CONTENT_TYPE};
use rstest::{fixture, rstest};

#[fixture]
fn context() -> RpcContext {
	test_context()
}

#[rstest]
#[case(Search { q: Some("a b".to_string()), ..Default::default() }, "?q=a%20b")]
#[case(Search { ids: vec![1, 2], ..Default::default() }, "?ids=1&ids=2")]
#[case(Search::default(), "")]
#[case(Search { role: Some(Role::Guest), page_size: Some(50), ..Default::default() }, "?role=Guest&per_page=50")]
#[case(
	Search { since: Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()), ..Default::default() },
	"?since=2024-01-02"
)]
#[case(
	Search { q: Some("x&y=z".to_string()), ids: vec![3], ..Default::default() },
	"?q=x%26y%3Dz&ids=3"
)]
fn test_query_string(context: RpcContext, #[case] search: Search, #[case] expected_query: &str) {
	let request = build_request(&context, &search).unwrap();

	assert_eq!(request.method(), Method::GET);
	assert_eq!(request.full_uri(), format!("{BASE_URI}/search{expected_query}"));
	assert_eq!(request.body(), None);
}

#[rstest]
fn test_path_ordinals_bind_in_order(context: RpcContext) {
	let path = CommentPath {
		comment_id: 99,
		owner: "rust lang".to_string(),
		repo: "rust".to_string(),
	};

	let request = build_request(&context, &path).unwrap();

	assert_eq!(request.method(), Method::DELETE);
	assert_eq!(request.uri(), format!("{BASE_URI}/repos/rust%20lang/rust/comments/99"));
}

#[rstest]
fn test_path_ordinal_gap_fails(context: RpcContext) {
	let error = build_request(&context, &BrokenPath::default()).unwrap_err();

	match error {
		Error::Build(message) => assert!(message.contains("ordinal")),
		other => panic!("unexpected error: {other}"),
	}
}

#[rstest]
fn test_put_with_body_and_headers(context: RpcContext) {
	let account = Account {
		account_id: 12,
		display_name: "Grace".to_string(),
		..Default::default()
	};

	let request = build_request(&context, &account).unwrap();

	assert_eq!(request.method(), Method::PUT);
	assert_eq!(request.uri(), format!("{BASE_URI}/accounts/12"));
	assert_eq!(request.headers().get(CONTENT_TYPE).unwrap(), "application/json");
	assert_eq!(request.headers().get(ACCEPT).unwrap(), "application/json");

	let body: serde_json::Value = serde_json::from_slice(request.body().unwrap()).unwrap();
	assert_eq!(body["accountId"], 12);
	assert_eq!(body["displayName"], "Grace");
}

#[rstest]
#[case("application/json; charset=utf-8")]
#[case("  Application/JSON ")]
#[case("application/json")]
fn test_content_type_parameters_resolve_to_json(#[case] content_type: &str) {
	let codecs = CodecRegistry::with_defaults();

	let decoder = codecs.decoder(content_type).unwrap();
	let serializer = codecs.serializer(content_type).unwrap();

	assert_eq!(decoder.content_type(), "application/json");
	assert_eq!(serializer.content_type(), "application/json");
}

#[rstest]
fn test_unregistered_content_type() {
	let codecs = CodecRegistry::with_defaults();

	let error = codecs.decoder("text/csv; header=present").err().unwrap();

	assert!(matches!(error, Error::UnsupportedContentType(ref ct) if ct == "text/csv"));
}
