//! Deserialization through the JSON codec: key resolution, required members
//! and scalar coercion.

use battery_codecs::json::JsonCodec;
use battery_core::codec::ResponseDecoder;
use battery_core::exception::Error;
use battery_core::marshaller::UnsupportedPolicy;
use battery_core::metadata::TypeDescriptor;
use battery_core::types::Mapped;
use battery_core::member;
use battery_integration_tests::models::{Account, AccountEnvelope, Counters, DeepValue};
use battery_integration_tests::test_context;
use battery_rpc::context::RpcContext;
use rstest::{fixture, rstest};
use std::collections::HashMap;

#[fixture]
fn context() -> RpcContext {
	test_context()
}

fn decode<T: Mapped>(context: &RpcContext, json: &str, target: &mut T) -> battery_core::Result<()> {
	let translator = context.translator_for(None);
	let marshal = context.marshal_context(&translator);
	JsonCodec::new().decode_into(json.as_bytes(), target, &marshal)
}

#[rstest]
fn test_dotted_path_descends_three_levels(context: RpcContext) {
	let mut deep = DeepValue::default();

	decode(
		&context,
		r#"{"a":{"b":{"c":"found"}},"meta":{"depth":3}}"#,
		&mut deep,
	)
	.unwrap();

	assert_eq!(deep.value, "found");
	assert_eq!(deep.depth, Some(3));
}

#[rstest]
#[case(r#"{"a":{}}"#)]
#[case(r#"{"a":{"x":{"c":"elsewhere"}}}"#)]
#[case(r#"{"a":"not an object"}"#)]
#[case(r#"{}"#)]
fn test_dotted_path_missing_intermediate(context: RpcContext, #[case] json: &str) {
	let mut deep = DeepValue {
		value: "stale".to_string(),
		depth: Some(9),
	};

	decode(&context, json, &mut deep).unwrap();

	assert_eq!(deep.value, "");
	assert_eq!(deep.depth, None);
}

#[rstest]
fn test_dotted_key_matches_literal_key_first(context: RpcContext) {
	let mut deep = DeepValue::default();

	decode(&context, r#"{"a.b.c":"flat","a":{"b":{"c":"nested"}}}"#, &mut deep).unwrap();

	assert_eq!(deep.value, "flat");
}

#[rstest]
fn test_required_member_missing(context: RpcContext) {
	let mut account = Account::default();

	let error = decode(&context, r#"{"displayName":"Ada"}"#, &mut account).unwrap_err();

	assert!(matches!(error, Error::Deserialization(_)));
	assert!(error.is_missing_field());
	assert_eq!(error.to_string(), "Error while deserializing: Field account_id: missing");
	// the traversal stops at the first member
	assert_eq!(account.display_name, "");
}

#[rstest]
fn test_required_member_missing_under_response_object(context: RpcContext) {
	let translator = context.translator_for(None);
	let marshal = context.marshal_context(&translator);
	let mut envelope = AccountEnvelope::default();

	let error = JsonCodec::new()
		.decode_into(br#"{"displayName":"Ada"}"#, &mut envelope, &marshal)
		.unwrap_err();

	assert!(error.is_missing_field());
}

#[rstest]
fn test_explicit_null_satisfies_required(context: RpcContext) {
	let mut account = Account {
		account_id: 5,
		..Default::default()
	};

	decode(&context, r#"{"accountId":null}"#, &mut account).unwrap();

	assert_eq!(account.account_id, 0);
}

#[rstest]
fn test_literal_name_fallback(context: RpcContext) {
	let mut account = Account::default();

	decode(
		&context,
		r#"{"accountId":1,"display_name":"literal","tags":["a"]}"#,
		&mut account,
	)
	.unwrap();

	assert_eq!(account.display_name, "literal");
	assert_eq!(account.tags, vec!["a".to_string()]);
}

#[rstest]
#[case(r#"{"count":"42"}"#, 42)]
#[case(r#"{"count":3.9}"#, 3)]
#[case(r#"{"count":-3.9}"#, -3)]
#[case(r#"{"count":17}"#, 17)]
fn test_integer_coercion(context: RpcContext, #[case] json: &str, #[case] expected: i32) {
	let mut counters = Counters::default();
	decode(&context, json, &mut counters).unwrap();
	assert_eq!(counters.count, expected);
}

#[rstest]
#[case(r#"{"enabled":"true"}"#, true)]
#[case(r#"{"enabled":"TRUE"}"#, true)]
#[case(r#"{"enabled":"yes"}"#, false)]
#[case(r#"{"enabled":true}"#, true)]
fn test_boolean_coercion(context: RpcContext, #[case] json: &str, #[case] expected: bool) {
	let mut counters = Counters {
		enabled: !expected,
		..Default::default()
	};
	decode(&context, json, &mut counters).unwrap();
	assert_eq!(counters.enabled, expected);
}

#[rstest]
#[case(r#"{"label":12}"#, "12")]
#[case(r#"{"label":true}"#, "true")]
#[case(r#"{"label":"text"}"#, "text")]
fn test_string_coercion(context: RpcContext, #[case] json: &str, #[case] expected: &str) {
	let mut counters = Counters::default();
	decode(&context, json, &mut counters).unwrap();
	assert_eq!(counters.label, expected);
}

#[rstest]
#[case(r#"{"count":"abc"}"#, "count")]
#[case(r#"{"count":true}"#, "count")]
#[case(r#"{"count":3000000000}"#, "count")]
#[case(r#"{"total":1e20}"#, "total")]
#[case(r#"{"ratio":"wide"}"#, "ratio")]
#[case(r#"{"enabled":1}"#, "enabled")]
fn test_incompatible_values(context: RpcContext, #[case] json: &str, #[case] field: &str) {
	let mut counters = Counters::default();

	let error = decode(&context, json, &mut counters).unwrap_err();

	assert!(error.is_incompatible_type());
	match error.root_cause() {
		Error::IncompatibleType { field: actual, .. } => assert_eq!(actual, field),
		other => panic!("unexpected error: {other}"),
	}
}

#[rstest]
fn test_absent_primitives_keep_their_value(context: RpcContext) {
	let mut counters = Counters {
		count: 4,
		total: 8,
		label: "old".to_string(),
		..Default::default()
	};

	decode(&context, "{}", &mut counters).unwrap();

	assert_eq!(counters.count, 4);
	assert_eq!(counters.total, 8);
	assert_eq!(counters.label, "");
}

#[derive(Debug, Default)]
struct WithExtras {
	name: String,
	extras: HashMap<String, String>,
}

impl Mapped for WithExtras {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.member(member!(WithExtras, name).response())
			.member(member!(WithExtras, extras).response())
			.build()
	}
}

#[rstest]
#[case(UnsupportedPolicy::Skip, true)]
#[case(UnsupportedPolicy::Fail, false)]
fn test_map_members_follow_policy(
	context: RpcContext,
	#[case] policy: UnsupportedPolicy,
	#[case] succeeds: bool,
) {
	let context = context.with_policy(policy);
	let mut target = WithExtras::default();

	let result = decode(&context, r#"{"name":"n","extras":{"k":"v"}}"#, &mut target);

	assert_eq!(result.is_ok(), succeeds);
	assert_eq!(target.name, "n");
	assert!(target.extras.is_empty());
}
