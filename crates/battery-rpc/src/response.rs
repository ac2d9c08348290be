//! Response decoding and validation.

use battery_core::exception::{BoxError, Error, Result};
use battery_core::metadata::RpcDeclaration;
use battery_core::types::MappedObject;

use crate::context::RpcContext;

/// Application-level check run on every decoded response object.
///
/// Typically used to turn error payloads delivered with a success status into
/// failures.
pub trait ResponseValidator: Send + Sync {
	fn validate(&self, object: &dyn MappedObject) -> std::result::Result<(), BoxError>;
}

/// Decodes a response body into `target` and validates it.
///
/// The decoder is picked by `content_type`; when the response carries none,
/// the type's declared expected content type is used instead.
///
/// # Errors
///
/// - [`Error::UnsupportedContentType`] if no decoder matches
/// - [`Error::MalformedDocument`] if the body cannot be parsed
/// - [`Error::Deserialization`] if the document does not fit `target`
/// - [`Error::ResponseValidation`] if the context's validator rejects the
///   result
///
/// Failures are passed to the context's error handlers before they are
/// returned.
pub fn decode_response(
	context: &RpcContext,
	content_type: Option<&str>,
	body: &[u8],
	target: &mut dyn MappedObject,
) -> Result<()> {
	decode_and_validate(context, content_type, body, target).map_err(|error| context.dispatch_error(error))
}

pub(crate) fn decode_and_validate(
	context: &RpcContext,
	content_type: Option<&str>,
	body: &[u8],
	target: &mut dyn MappedObject,
) -> Result<()> {
	let descriptor = context.describe(&*target);
	let declaration = descriptor.rpc();

	let content_type = content_type
		.filter(|value| !value.trim().is_empty())
		.or_else(|| declaration.and_then(RpcDeclaration::expected_content_type))
		.ok_or_else(|| Error::UnsupportedContentType("(none)".to_string()))?;
	let decoder = context.codecs().decoder(content_type)?;

	let translator = context.translator_for(declaration);
	let marshal = context.marshal_context(&translator);
	decoder.decode_into(body, target, &marshal)?;

	if let Some(validator) = context.validator() {
		validator.validate(&*target).map_err(Error::ResponseValidation)?;
	}
	Ok(())
}
