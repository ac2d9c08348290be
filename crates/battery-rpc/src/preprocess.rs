//! Request preprocessing hook.

use battery_core::exception::BoxError;
use battery_core::types::MappedObject;

use crate::request::RequestDescriptor;

/// Application hook around request building.
///
/// `validate_context` runs before anything is built and can veto the call
/// (for example when a session is missing). `process_request` runs on the
/// finished descriptor and may add headers or rewrite the body.
///
/// # Examples
///
/// ```
/// use battery_core::exception::BoxError;
/// use battery_core::types::MappedObject;
/// use battery_rpc::preprocess::RequestPreprocessor;
/// use battery_rpc::request::RequestDescriptor;
/// use http::HeaderValue;
///
/// struct BearerToken(String);
///
/// impl RequestPreprocessor for BearerToken {
///     fn validate_context(&self, _object: &dyn MappedObject) -> Result<(), BoxError> {
///         if self.0.is_empty() {
///             return Err("not signed in".into());
///         }
///         Ok(())
///     }
///
///     fn process_request(&self, request: &mut RequestDescriptor) {
///         if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.0)) {
///             request.headers_mut().insert(http::header::AUTHORIZATION, value);
///         }
///     }
/// }
/// ```
pub trait RequestPreprocessor: Send + Sync {
	/// Checks that `object` may be sent now.
	fn validate_context(&self, _object: &dyn MappedObject) -> Result<(), BoxError> {
		Ok(())
	}

	/// Adjusts the finished request.
	fn process_request(&self, _request: &mut RequestDescriptor) {}
}
