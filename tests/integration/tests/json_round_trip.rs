//! JSON serialization and deserialization of full object graphs.

use assert_json_diff::assert_json_eq;
use battery_codecs::json::JsonCodec;
use battery_core::codec::{RequestSerializer, ResponseDecoder};
use battery_core::metadata::TypeDescriptor;
use battery_core::naming::NameTranslator;
use battery_core::types::Mapped;
use battery_core::member;
use battery_integration_tests::models::{Account, AccountEnvelope, Address, Geo, Role};
use battery_integration_tests::test_context;
use battery_rpc::response::decode_response;
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn account() -> Account {
	Account {
		account_id: 7,
		display_name: "Ada".to_string(),
		score: 4.5,
		active: true,
		role: Role::Admin,
		tags: vec!["math".to_string(), "engines".to_string()],
		address: Address {
			street: "12 St James's Square".to_string(),
			city: "London".to_string(),
			geo: Some(Geo {
				lat: 51.5,
				lng: -0.12,
			}),
		},
		nickname: None,
		created_at: Utc.with_ymd_and_hms(2024, 3, 1, 3, 30, 0).unwrap(),
	}
}

fn account_json() -> Value {
	json!({
		"accountId": 7,
		"displayName": "Ada",
		"score": 4.5,
		"active": true,
		"role": "Admin",
		"tags": ["math", "engines"],
		"address": {
			"street": "12 St James's Square",
			"city": "London",
			"geo": {"lat": 51.5, "lng": -0.12}
		},
		"nickname": null,
		"createdAt": "2024-03-01T03:30:00.000000+0000"
	})
}

#[rstest]
fn test_account_serializes_to_camel_case_json(account: Account) {
	let context = test_context();
	let translator = context.translator_for(None);
	let marshal = context.marshal_context(&translator);

	let body = JsonCodec::new().serialize(&account, &marshal).unwrap().unwrap();

	assert_eq!(body.content_type, "application/json");
	let actual: Value = serde_json::from_slice(&body.bytes).unwrap();
	assert_json_eq!(actual, account_json());
}

#[rstest]
fn test_account_round_trip(account: Account) {
	let context = test_context();
	let translator = context.translator_for(None);
	let marshal = context.marshal_context(&translator);
	let codec = JsonCodec::new();

	let body = codec.serialize(&account, &marshal).unwrap().unwrap();
	let mut decoded = Account::default();
	codec.decode_into(&body.bytes, &mut decoded, &marshal).unwrap();

	assert_eq!(decoded, account);
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Scalars {
	int_value: i32,
	long_value: i64,
	float_value: f32,
	double_value: f64,
	flag: bool,
	text: String,
	numbers: Vec<i64>,
}

impl Mapped for Scalars {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.member(member!(Scalars, int_value))
			.member(member!(Scalars, long_value))
			.member(member!(Scalars, float_value))
			.member(member!(Scalars, double_value))
			.member(member!(Scalars, flag))
			.member(member!(Scalars, text))
			.member(member!(Scalars, numbers))
			.build()
	}
}

#[rstest]
#[case(Scalars::default())]
#[case(Scalars {
	int_value: i32::MIN,
	long_value: i64::MAX,
	float_value: 3.25,
	double_value: -1.0e-3,
	flag: true,
	text: "ünïcode \"quoted\"".to_string(),
	numbers: vec![1, -2, 3],
})]
#[case(Scalars {
	int_value: i32::MAX,
	long_value: i64::MIN,
	float_value: -0.5,
	double_value: 1.0e300,
	flag: false,
	text: String::new(),
	numbers: Vec::new(),
})]
fn test_scalar_round_trip(#[case] original: Scalars) {
	let context = test_context();
	let translator = NameTranslator::identity();
	let marshal = context.marshal_context(&translator);
	let codec = JsonCodec::new();

	let body = codec.serialize(&original, &marshal).unwrap().unwrap();
	let mut decoded = Scalars {
		numbers: vec![99],
		..Default::default()
	};
	codec.decode_into(&body.bytes, &mut decoded, &marshal).unwrap();

	assert_eq!(decoded, original);
}

#[rstest]
fn test_response_object_envelope(account: Account) {
	let context = test_context();
	let body = serde_json::to_vec(&account_json()).unwrap();

	let mut envelope = AccountEnvelope::default();
	decode_response(&context, None, &body, &mut envelope).unwrap();

	assert_eq!(envelope.account, account);
}
