//! Transport-agnostic HTTP request produced by the request builder.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue, IntoHeaderName};
use http::{HeaderMap, Method};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped in URI path segments and query components: everything
/// except RFC 3986 unreserved characters.
pub(crate) const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'.')
	.remove(b'_')
	.remove(b'~');

/// Percent-encodes a URI component (a space becomes `%20`).
pub fn encode_component(value: &str) -> String {
	utf8_percent_encode(value, COMPONENT).to_string()
}

/// A built request: method, URI, headers, query parameters and body.
///
/// Query parameters are kept unencoded and in insertion order; repeated keys
/// are allowed. [`full_uri`](Self::full_uri) renders them.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
	method: Method,
	uri: String,
	headers: HeaderMap,
	query: Vec<(String, String)>,
	body: Option<Bytes>,
}

impl RequestDescriptor {
	pub fn new(method: Method, uri: impl Into<String>) -> Self {
		Self {
			method,
			uri: uri.into(),
			headers: HeaderMap::new(),
			query: Vec::new(),
			body: None,
		}
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	/// URI without the query parameters.
	pub fn uri(&self) -> &str {
		&self.uri
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	pub fn headers_mut(&mut self) -> &mut HeaderMap {
		&mut self.headers
	}

	/// Sets a header, replacing existing values.
	pub fn set_header<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) {
		self.headers.insert(name, value);
	}

	pub fn query(&self) -> &[(String, String)] {
		&self.query
	}

	/// Appends a query parameter.
	pub fn add_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.query.push((key.into(), value.into()));
	}

	/// Removes every query parameter named `key`.
	pub fn remove_query(&mut self, key: &str) {
		self.query.retain(|(k, _)| k != key);
	}

	pub fn body(&self) -> Option<&Bytes> {
		self.body.as_ref()
	}

	pub fn set_body(&mut self, body: Option<Bytes>) {
		self.body = body;
	}

	/// Value of the `Content-Type` header, if set and valid UTF-8.
	pub fn content_type(&self) -> Option<&str> {
		self.headers
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
	}

	/// URI with the encoded query appended.
	///
	/// The query starts with `?`, or `&` if the URI already carries a query.
	///
	/// # Examples
	///
	/// ```
	/// use battery_rpc::request::RequestDescriptor;
	/// use http::Method;
	///
	/// let mut request = RequestDescriptor::new(Method::GET, "https://api.example.com/search?v=2");
	/// request.add_query("q", "a b");
	/// request.add_query("ids", "1");
	/// request.add_query("ids", "2");
	/// assert_eq!(request.full_uri(), "https://api.example.com/search?v=2&q=a%20b&ids=1&ids=2");
	/// ```
	pub fn full_uri(&self) -> String {
		let mut uri = self.uri.clone();
		let mut delimiter = if self.uri.contains('?') { '&' } else { '?' };
		for (key, value) in &self.query {
			uri.push(delimiter);
			uri.push_str(&encode_component(key));
			uri.push('=');
			uri.push_str(&encode_component(value));
			delimiter = '&';
		}
		uri
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("plain", "plain")]
	#[case("a b", "a%20b")]
	#[case("a/b?c=d&e", "a%2Fb%3Fc%3Dd%26e")]
	#[case("-._~", "-._~")]
	#[case("é", "%C3%A9")]
	fn test_encode_component(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(encode_component(input), expected);
	}

	#[rstest]
	fn test_full_uri_without_query() {
		let request = RequestDescriptor::new(Method::GET, "http://localhost/items");
		assert_eq!(request.full_uri(), "http://localhost/items");
	}

	#[rstest]
	fn test_remove_query() {
		let mut request = RequestDescriptor::new(Method::GET, "http://localhost/items");
		request.add_query("a", "1");
		request.add_query("b", "2");
		request.add_query("a", "3");
		request.remove_query("a");
		assert_eq!(request.full_uri(), "http://localhost/items?b=2");
	}

	#[rstest]
	fn test_content_type_header() {
		let mut request = RequestDescriptor::new(Method::POST, "http://localhost/items");
		assert_eq!(request.content_type(), None);
		request.set_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		assert_eq!(request.content_type(), Some("application/json"));
	}
}
