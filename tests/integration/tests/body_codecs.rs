//! Form and multipart request bodies built end to end.

use std::io::Write;

use battery_codecs::multipart::Attachment;
use battery_core::exception::Error;
use battery_integration_tests::models::{AvatarUpload, Login};
use battery_integration_tests::{BASE_URI, test_context};
use battery_rpc::builder::build_request;
use rstest::rstest;

#[rstest]
fn test_form_body() {
	let context = test_context();
	let login = Login {
		user_name: "ada".to_string(),
		password: "p@ss word".to_string(),
		remember_me: true,
		scopes: vec!["read".to_string(), "write".to_string()],
	};

	let request = build_request(&context, &login).unwrap();

	assert_eq!(request.uri(), format!("{BASE_URI}/session"));
	assert_eq!(
		request.content_type(),
		Some("application/x-www-form-urlencoded; charset=utf-8")
	);
	assert_eq!(
		request.body().map(|body| body.as_ref()),
		Some(b"userName=ada&password=p%40ss+word&rememberMe=true&scope=read&scope=write".as_slice())
	);
}

#[rstest]
fn test_multipart_body_with_file_part() {
	let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
	file.write_all(b"\x89PNG-bytes").unwrap();

	let context = test_context();
	let upload = AvatarUpload {
		account_id: 3,
		caption: "me".to_string(),
		image: Some(Attachment::new(file.path()).with_file_name("avatar.png")),
	};

	let request = build_request(&context, &upload).unwrap();

	assert_eq!(request.uri(), format!("{BASE_URI}/accounts/3/avatar"));
	let content_type = request.content_type().unwrap();
	let boundary = content_type
		.strip_prefix("multipart/form-data; boundary=")
		.unwrap();

	let mut expected = Vec::new();
	expected.extend_from_slice(
		format!("--{boundary}\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\nme\r\n").as_bytes(),
	);
	expected.extend_from_slice(
		format!(
			"--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"avatar.png\"\r\nContent-Type: image/png\r\n\r\n"
		)
		.as_bytes(),
	);
	expected.extend_from_slice(b"\x89PNG-bytes\r\n");
	expected.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

	assert_eq!(request.body().unwrap().as_ref(), expected.as_slice());
}

#[rstest]
fn test_multipart_without_file_skips_null_part() {
	let context = test_context();
	let upload = AvatarUpload {
		account_id: 3,
		caption: "no image".to_string(),
		image: None,
	};

	let request = build_request(&context, &upload).unwrap();
	let body = String::from_utf8(request.body().unwrap().to_vec()).unwrap();

	assert!(body.contains("name=\"caption\""));
	assert!(!body.contains("name=\"image\""));
}

#[rstest]
fn test_missing_attachment_file() {
	let temp_dir = tempfile::TempDir::new().unwrap();
	let context = test_context();
	let upload = AvatarUpload {
		account_id: 3,
		caption: "gone".to_string(),
		image: Some(Attachment::new(temp_dir.path().join("missing.png"))),
	};

	let error = build_request(&context, &upload).unwrap_err();

	assert!(matches!(error, Error::Serialization(_)));
	assert!(matches!(error.root_cause(), Error::MalformedDocument(_)));
}
