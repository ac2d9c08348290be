//! Transport seam and the full request/response cycle.

use bytes::Bytes;
use http::StatusCode;

use battery_core::exception::{BoxError, Error, Result};
use battery_core::types::MappedObject;

use crate::builder::build_request;
use crate::context::RpcContext;
use crate::request::RequestDescriptor;
use crate::response::decode_and_validate;

/// Raw HTTP response handed back by a [`Transport`].
#[derive(Debug, Clone)]
pub struct RawResponse {
	pub status: StatusCode,
	pub content_type: Option<String>,
	pub body: Bytes,
}

impl RawResponse {
	pub fn new(status: StatusCode, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
		Self {
			status,
			content_type: content_type.map(str::to_string),
			body: body.into(),
		}
	}
}

/// Sends built requests.
///
/// Implementations wrap an HTTP client; failures are reported as
/// [`Error::Transport`].
pub trait Transport: Send + Sync {
	fn send(&self, request: &RequestDescriptor) -> std::result::Result<RawResponse, BoxError>;
}

/// Non-success status returned by the server.
#[derive(Debug, thiserror::Error)]
#[error("unexpected response status {status}")]
pub struct StatusError {
	pub status: StatusCode,
	pub body: Bytes,
}

/// Builds the request for `object`, sends it and decodes the response back
/// into `object`.
///
/// A `204 No Content` response leaves `object` untouched.
///
/// # Errors
///
/// Everything [`build_request`] and [`decode_response`](crate::response::decode_response)
/// report, plus [`Error::Transport`] for send failures and non-2xx statuses
/// (wrapping a [`StatusError`]). Each failure is passed to the context's
/// error handlers once before it is returned.
pub fn invoke(context: &RpcContext, transport: &dyn Transport, object: &mut dyn MappedObject) -> Result<()> {
	exchange(context, transport, object).map_err(|error| context.dispatch_error(error))
}

fn exchange(context: &RpcContext, transport: &dyn Transport, object: &mut dyn MappedObject) -> Result<()> {
	let request = build_request(context, &*object)?;
	let response = transport.send(&request).map_err(Error::Transport)?;

	if !response.status.is_success() {
		tracing::warn!(
			status = response.status.as_u16(),
			uri = %request.full_uri(),
			"request failed"
		);
		return Err(Error::Transport(Box::new(StatusError {
			status: response.status,
			body: response.body,
		})));
	}
	if response.status == StatusCode::NO_CONTENT {
		return Ok(());
	}

	decode_and_validate(
		context,
		response.content_type.as_deref(),
		&response.body,
		object,
	)
}
