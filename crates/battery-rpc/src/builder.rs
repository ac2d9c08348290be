//! Request building: turns an annotated object into a [`RequestDescriptor`].

mod query;
mod uri;

use battery_core::exception::{Error, Result};
use battery_core::types::MappedObject;
use http::HeaderValue;
use http::header::{ACCEPT, CONTENT_TYPE};

use crate::context::RpcContext;
use crate::request::RequestDescriptor;

/// Builds the HTTP request for `object`.
///
/// The steps run in order:
///
/// 1. the context preprocessor may veto the call
/// 2. the URI template is taken from the type declaration or a URI member,
///    its placeholders are filled from the URI path members and it is joined
///    to the base URI
/// 3. query-string members are appended
/// 4. for body-carrying methods the request-body members are serialized with
///    the declared serializer, falling back to the context default
/// 5. `Accept` is set from the declared expected content type
/// 6. the preprocessor adjusts the finished request
///
/// # Errors
///
/// - [`Error::ContextValidation`] if the preprocessor rejects the object
/// - [`Error::InvalidDeclaration`] if the type has no RPC declaration
/// - [`Error::Build`] for URI and header problems
/// - [`Error::UnsupportedContentType`] if no serializer matches
/// - [`Error::Serialization`] if the body cannot be produced
pub fn build_request(context: &RpcContext, object: &dyn MappedObject) -> Result<RequestDescriptor> {
	if let Some(preprocessor) = context.preprocessor() {
		preprocessor
			.validate_context(object)
			.map_err(Error::ContextValidation)?;
	}

	let type_name = object.object_type().key().short_name();
	let descriptor = context.describe(object);
	let declaration = descriptor.rpc().ok_or_else(|| Error::InvalidDeclaration {
		type_name: type_name.to_string(),
		reason: "no rpc declaration".to_string(),
	})?;

	let translator = context.translator_for(Some(declaration));
	let marshal = context.marshal_context(&translator);

	let uri = uri::resolve_uri(context.base_uri(), object, declaration, &marshal)?;
	let mut request = RequestDescriptor::new(declaration.method().clone(), uri);
	query::append_query(&mut request, object, &marshal)?;

	if declaration.has_body() {
		match declaration.serializer().or(context.default_serializer()) {
			Some(content_type) => {
				let serializer = context.codecs().serializer(content_type)?;
				if let Some(body) = serializer.serialize(object, &marshal)? {
					request.set_header(CONTENT_TYPE, header_value(&body.content_type)?);
					request.set_body(Some(body.bytes));
				}
			}
			None => {
				tracing::error!(
					type_name,
					method = %declaration.method(),
					"no serializer declared and no default configured, sending without body"
				);
			}
		}
	}

	if let Some(expected) = declaration.expected_content_type() {
		request.set_header(ACCEPT, header_value(expected)?);
	}

	if let Some(preprocessor) = context.preprocessor() {
		preprocessor.process_request(&mut request);
	}

	tracing::debug!(
		type_name,
		method = %request.method(),
		uri = %request.full_uri(),
		has_body = request.body().is_some(),
		"built request"
	);
	Ok(request)
}

fn header_value(value: &str) -> Result<HeaderValue> {
	HeaderValue::from_str(value)
		.map_err(|error| Error::Build(format!("invalid header value '{}': {}", value, error)))
}
