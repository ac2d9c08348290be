//! Full request/response cycles over a recording transport.

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use battery_core::exception::{BoxError, Error};
use battery_core::types::MappedObject;
use battery_integration_tests::models::{Account, Role};
use battery_integration_tests::test_context;
use battery_integration_tests::transport::RecordingTransport;
use battery_rpc::context::RpcContext;
use battery_rpc::preprocess::RequestPreprocessor;
use battery_rpc::request::RequestDescriptor;
use battery_rpc::response::ResponseValidator;
use battery_rpc::settings::RpcSettings;
use battery_rpc::transport::{RawResponse, StatusError, invoke};
use http::header::AUTHORIZATION;
use http::{HeaderValue, Method, StatusCode};
use rstest::rstest;
use tempfile::TempDir;

const STORED_ACCOUNT: &str = r#"{
	"accountId": 21,
	"displayName": "Grace Hopper",
	"score": 9.5,
	"active": true,
	"role": "ADMIN",
	"tags": ["cobol"],
	"address": {"street": "", "city": "Arlington"},
	"createdAt": "1906-12-09"
}"#;

struct ApiKey(&'static str);

impl RequestPreprocessor for ApiKey {
	fn process_request(&self, request: &mut RequestDescriptor) {
		request.set_header(AUTHORIZATION, HeaderValue::from_static(self.0));
		request.add_query("client", "integration");
	}
}

struct RejectInactive;

impl ResponseValidator for RejectInactive {
	fn validate(&self, object: &dyn MappedObject) -> std::result::Result<(), BoxError> {
		match object.downcast_ref::<Account>() {
			Some(account) if !account.active => Err(format!("account {} is inactive", account.account_id).into()),
			_ => Ok(()),
		}
	}
}

#[rstest]
fn test_invoke_with_settings_file() -> Result<()> {
	let temp_dir = TempDir::new()?;
	let path = temp_dir.path().join("battery.toml");
	fs::write(
		&path,
		r#"
base_uri = "https://accounts.example.com/api/"
local_naming = "snake_case"
remote_naming = "camel_case"
date_format = "iso8601"
"#,
	)?;
	let context = RpcContext::from_settings(&RpcSettings::from_file(&path)?)
		.with_preprocessor(Arc::new(ApiKey("Key abc123")));
	let transport = RecordingTransport::new().respond(RawResponse::new(
		StatusCode::OK,
		Some("application/json; charset=utf-8"),
		STORED_ACCOUNT,
	));
	let mut account = Account {
		account_id: 21,
		display_name: "G. Hopper".to_string(),
		..Default::default()
	};

	invoke(&context, &transport, &mut account)?;

	let requests = transport.requests();
	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].method(), Method::PUT);
	assert_eq!(
		requests[0].full_uri(),
		"https://accounts.example.com/api/accounts/21?client=integration"
	);
	assert_eq!(requests[0].headers().get(AUTHORIZATION).unwrap(), "Key abc123");

	assert_eq!(account.display_name, "Grace Hopper");
	assert_eq!(account.role, Role::Admin);
	assert_eq!(account.tags, vec!["cobol".to_string()]);
	assert_eq!(account.address.city, "Arlington");
	assert_eq!(account.address.geo, None);
	assert_eq!(account.created_at.to_rfc3339(), "1906-12-09T00:00:00+00:00");
	Ok(())
}

#[rstest]
fn test_validator_rejects_decoded_object() {
	let context = test_context().with_validator(Arc::new(RejectInactive));
	let transport = RecordingTransport::new().respond(RawResponse::new(
		StatusCode::OK,
		Some("application/json"),
		r#"{"accountId":4,"active":false}"#,
	));
	let mut account = Account {
		account_id: 4,
		active: true,
		..Default::default()
	};

	let error = invoke(&context, &transport, &mut account).unwrap_err();

	assert!(matches!(error, Error::ResponseValidation(_)));
	assert_eq!(
		error.to_string(),
		"Response validation failed: account 4 is inactive"
	);
	assert!(!account.active);
}

#[rstest]
#[case(StatusCode::NOT_FOUND)]
#[case(StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_is_a_transport_error(#[case] status: StatusCode) {
	let context = test_context();
	let transport = RecordingTransport::new().respond(RawResponse::new(
		status,
		Some("application/json"),
		r#"{"error":"nope"}"#,
	));
	let mut account = Account::default();

	let error = invoke(&context, &transport, &mut account).unwrap_err();

	let Error::Transport(source) = error else {
		panic!("expected a transport error");
	};
	assert_eq!(source.downcast_ref::<StatusError>().unwrap().status, status);
}

#[rstest]
fn test_build_failure_never_reaches_transport() {
	let context = test_context().with_preprocessor(Arc::new(Deny));
	let transport = RecordingTransport::new();
	let mut account = Account::default();

	let error = invoke(&context, &transport, &mut account).unwrap_err();

	assert!(matches!(error, Error::ContextValidation(_)));
	assert!(transport.requests().is_empty());
}

struct Deny;

impl RequestPreprocessor for Deny {
	fn validate_context(&self, _object: &dyn MappedObject) -> std::result::Result<(), BoxError> {
		Err("offline".into())
	}
}

#[rstest]
fn test_no_content_keeps_object() {
	let context = test_context();
	let transport = RecordingTransport::new().respond(RawResponse::new(StatusCode::NO_CONTENT, None, ""));
	let mut account = Account {
		account_id: 8,
		display_name: "unchanged".to_string(),
		..Default::default()
	};

	invoke(&context, &transport, &mut account).unwrap();

	assert_eq!(account.display_name, "unchanged");
	assert_eq!(transport.requests().len(), 1);
}
